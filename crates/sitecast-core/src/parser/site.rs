//! `site` node parsing.

use crate::error::{Result, SiteError};
use crate::model::{CertificateConfig, DistributionConfig, ProviderConfig, SiteConfig};
use kdl::KdlNode;
use std::path::PathBuf;

/// Parse a `site` node.
pub fn parse_site(node: &KdlNode) -> Result<SiteConfig> {
    let domain = node
        .entries()
        .first()
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| SiteError::InvalidConfig("site requires a domain".to_string()))?
        .to_string();

    if domain.is_empty() {
        return Err(SiteError::InvalidConfig(
            "site domain must not be empty".to_string(),
        ));
    }

    let mut site = SiteConfig::new(domain);

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "source" | "source_dir" | "source-dir" => {
                    if let Some(dir) = child.entries().first().and_then(|e| e.value().as_string()) {
                        site.source_dir = PathBuf::from(dir);
                    }
                }
                "index" | "index_document" | "index-document" => {
                    if let Some(doc) = child.entries().first().and_then(|e| e.value().as_string()) {
                        site.index_document = doc.to_string();
                    }
                }
                "error" | "error_document" | "error-document" => {
                    if let Some(doc) = child.entries().first().and_then(|e| e.value().as_string()) {
                        site.error_document = doc.to_string();
                    }
                }
                "force_destroy" | "force-destroy" => {
                    // A bare node enables it; an explicit bool wins.
                    site.force_destroy = child
                        .entries()
                        .first()
                        .and_then(|e| e.value().as_bool())
                        .unwrap_or(true);
                }
                "provider" => {
                    site.provider = parse_provider(child)?;
                }
                "certificate" => {
                    site.certificate = Some(parse_certificate(child));
                }
                "distribution" => {
                    site.distribution = Some(parse_distribution(child));
                }
                other => {
                    tracing::warn!(node = other, "Ignoring unknown site setting");
                }
            }
        }
    }

    Ok(site)
}

/// Parse a `provider` node.
fn parse_provider(node: &KdlNode) -> Result<ProviderConfig> {
    let name = node
        .entries()
        .first()
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| SiteError::InvalidConfig("provider requires a name".to_string()))?
        .to_string();

    let mut provider = ProviderConfig {
        name,
        ..Default::default()
    };

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "region" | "zone" => {
                    if let Some(region) = child.entries().first().and_then(|e| e.value().as_string())
                    {
                        provider.region = region.to_string();
                    }
                }
                other => {
                    tracing::warn!(node = other, "Ignoring unknown provider setting");
                }
            }
        }
    }

    Ok(provider)
}

/// Parse a `certificate` node.
fn parse_certificate(node: &KdlNode) -> CertificateConfig {
    let mut certificate = CertificateConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            if matches!(
                child.name().value(),
                "validation" | "validation_method" | "validation-method"
            ) && let Some(method) = child.entries().first().and_then(|e| e.value().as_string())
            {
                certificate.validation_method = method.to_string();
            }
        }
    }

    certificate
}

/// Parse a `distribution` node.
fn parse_distribution(node: &KdlNode) -> DistributionConfig {
    let mut distribution = DistributionConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            if matches!(child.name().value(), "price_class" | "price-class")
                && let Some(class) = child.entries().first().and_then(|e| e.value().as_string())
            {
                distribution.price_class = class.to_string();
            }
        }
    }

    distribution
}
