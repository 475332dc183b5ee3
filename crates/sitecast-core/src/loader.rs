//! Integrated loader.
//!
//! Ties root discovery and parsing together for callers that just want a
//! `SiteConfig`.

use crate::discovery::{find_project_root, find_site_file};
use crate::error::Result;
use crate::model::SiteConfig;
use crate::parser::parse_site_file;
use std::path::{Path, PathBuf};
use tracing::info;

/// Discover the project root and load its site configuration.
pub fn load_site() -> Result<(PathBuf, SiteConfig)> {
    let project_root = find_project_root()?;
    let site = load_site_from_root(&project_root)?;
    Ok((project_root, site))
}

/// Load the site configuration from a known project root.
pub fn load_site_from_root(project_root: &Path) -> Result<SiteConfig> {
    let site_file = find_site_file(project_root)?;
    let site = parse_site_file(&site_file)?;
    info!(
        domain = %site.domain,
        source = %site.source_dir.display(),
        "Site configuration loaded"
    );
    Ok(site)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_site_from_root() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(
            temp.path().join("site.kdl"),
            r#"
                site "example.com" {
                    source "./public"
                }
            "#,
        )
        .unwrap();

        let site = load_site_from_root(temp.path()).unwrap();
        assert_eq!(site.domain, "example.com");
        assert_eq!(site.source_dir.to_str(), Some("./public"));
    }

    #[test]
    fn test_load_site_from_root_without_config_fails() {
        let temp = tempfile::tempdir().unwrap();
        assert!(load_site_from_root(temp.path()).is_err());
    }
}
