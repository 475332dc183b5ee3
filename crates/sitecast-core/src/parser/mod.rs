//! KDL parser for `site.kdl`.

mod site;

pub use site::parse_site;

use crate::error::{Result, SiteError};
use crate::model::SiteConfig;
use kdl::KdlDocument;
use std::fs;
use std::path::Path;

/// Parse a `site.kdl` file into a `SiteConfig`.
pub fn parse_site_file<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_site_string(&content)
}

/// Parse a KDL string into a `SiteConfig`.
pub fn parse_site_string(content: &str) -> Result<SiteConfig> {
    let doc: KdlDocument = content.parse()?;

    let site_node = doc
        .nodes()
        .iter()
        .find(|node| node.name().value() == "site")
        .ok_or_else(|| {
            SiteError::InvalidConfig("configuration must contain a `site` node".to_string())
        })?;

    parse_site(site_node)
}

#[cfg(test)]
mod tests;
