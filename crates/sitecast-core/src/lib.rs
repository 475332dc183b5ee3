//! Core configuration for Sitecast.
//!
//! Defines the site model, parses `site.kdl`, and locates the project root
//! the configuration lives in. Everything network-facing lives in the
//! cloud crates; this crate is purely local.

mod discovery;
mod error;
mod loader;
mod model;
mod parser;

pub use discovery::{find_project_root, find_site_file};
pub use error::{Result, SiteError};
pub use loader::{load_site, load_site_from_root};
pub use model::*;
pub use parser::{parse_site_file, parse_site_string};
