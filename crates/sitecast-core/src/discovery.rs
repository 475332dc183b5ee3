//! Project root discovery.
//!
//! Finds the directory a site configuration lives in, so the CLI can run
//! from anywhere inside the project.

use crate::error::{Result, SiteError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const SITE_FILE: &str = "site.kdl";
const SITE_DIR_FILE: &str = ".sitecast/site.kdl";

/// Locate the project root.
///
/// Search order:
/// 1. The `SITECAST_PROJECT_ROOT` environment variable.
/// 2. Upward from the current directory, looking for `site.kdl` or
///    `.sitecast/site.kdl`.
pub fn find_project_root() -> Result<PathBuf> {
    if let Ok(root) = std::env::var("SITECAST_PROJECT_ROOT") {
        let path = PathBuf::from(&root);
        debug!(env_root = %root, "Checking SITECAST_PROJECT_ROOT");
        if path.join(SITE_FILE).exists() || path.join(SITE_DIR_FILE).exists() {
            info!(project_root = %path.display(), "Found project root from environment variable");
            return Ok(path);
        }
    }

    let start_dir = std::env::current_dir()?;
    find_project_root_from(&start_dir)
}

/// Locate the project root by walking upward from `start_dir`.
pub fn find_project_root_from(start_dir: &Path) -> Result<PathBuf> {
    let mut current = start_dir.to_path_buf();
    debug!(start_dir = %start_dir.display(), "Searching for project root");

    loop {
        if current.join(SITE_FILE).exists() {
            info!(project_root = %current.display(), "Found project root (site.kdl)");
            return Ok(current);
        }

        if current.join(SITE_DIR_FILE).exists() {
            info!(project_root = %current.display(), "Found project root (.sitecast/site.kdl)");
            return Ok(current);
        }

        if !current.pop() {
            break;
        }
    }

    warn!(start_dir = %start_dir.display(), "Project root not found");
    Err(SiteError::ProjectRootNotFound(start_dir.to_path_buf()))
}

/// Resolve the site file inside a project root.
///
/// A root-level `site.kdl` wins over `.sitecast/site.kdl`.
pub fn find_site_file(project_root: &Path) -> Result<PathBuf> {
    let root_file = project_root.join(SITE_FILE);
    if root_file.exists() {
        return Ok(root_file);
    }

    let dir_file = project_root.join(SITE_DIR_FILE);
    if dir_file.exists() {
        return Ok(dir_file);
    }

    Err(SiteError::ProjectRootNotFound(project_root.to_path_buf()))
}
