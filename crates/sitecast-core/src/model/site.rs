//! Site configuration model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A static site to provision and publish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Apex domain the site is served under; doubles as the bucket name.
    pub domain: String,

    /// Local directory holding the built site tree, relative to the
    /// project root unless absolute.
    pub source_dir: PathBuf,

    /// Object served for `/`.
    pub index_document: String,

    /// Object served for missing keys.
    pub error_document: String,

    /// Allow the bucket to be deleted even when it still holds objects.
    pub force_destroy: bool,

    pub provider: ProviderConfig,

    /// TLS certificate stage; `None` omits the stage from the run.
    pub certificate: Option<CertificateConfig>,

    /// CDN distribution stage; `None` omits the stage from the run.
    pub distribution: Option<DistributionConfig>,
}

impl SiteConfig {
    /// Configuration with defaults for everything except the domain.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            source_dir: PathBuf::from("./site"),
            index_document: "index.html".to_string(),
            error_document: "404.html".to_string(),
            force_destroy: false,
            provider: ProviderConfig::default(),
            certificate: None,
            distribution: None,
        }
    }

    /// Absolute source directory, resolved against `project_root`.
    pub fn resolved_source_dir(&self, project_root: &std::path::Path) -> PathBuf {
        if self.source_dir.is_absolute() {
            self.source_dir.clone()
        } else {
            project_root.join(&self.source_dir)
        }
    }
}

/// Cloud provider selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name ("aws").
    pub name: String,

    /// Bucket region.
    pub region: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "aws".to_string(),
            region: "us-east-1".to_string(),
        }
    }
}

/// TLS certificate request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateConfig {
    /// Validation method; only DNS validation is supported today.
    pub validation_method: String,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            validation_method: "DNS".to_string(),
        }
    }
}

/// CDN distribution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// CDN price class.
    pub price_class: String,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            price_class: "PriceClass_100".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_new_site_defaults() {
        let site = SiteConfig::new("example.com");
        assert_eq!(site.domain, "example.com");
        assert_eq!(site.source_dir, PathBuf::from("./site"));
        assert_eq!(site.index_document, "index.html");
        assert_eq!(site.error_document, "404.html");
        assert!(!site.force_destroy);
        assert_eq!(site.provider.name, "aws");
        assert!(site.certificate.is_none());
        assert!(site.distribution.is_none());
    }

    #[test]
    fn test_resolved_source_dir_relative() {
        let site = SiteConfig::new("example.com");
        assert_eq!(
            site.resolved_source_dir(Path::new("/home/me/project")),
            PathBuf::from("/home/me/project/./site")
        );
    }

    #[test]
    fn test_resolved_source_dir_absolute() {
        let mut site = SiteConfig::new("example.com");
        site.source_dir = PathBuf::from("/srv/www");
        assert_eq!(
            site.resolved_source_dir(Path::new("/home/me/project")),
            PathBuf::from("/srv/www")
        );
    }
}
