//! AWS hosting provider.
//!
//! Implements [`sitecast_cloud::SiteHost`] on top of the `aws` CLI:
//! S3 for the bucket and objects, ACM for the certificate, CloudFront for
//! the distribution. Credentials and retry policy belong to the CLI and
//! its configuration, not to this crate.

mod awscli;
mod error;
mod host;
mod policy;

pub use awscli::AwsCli;
pub use error::{AwsError, Result};
pub use host::AwsSiteHost;
pub use policy::public_read_policy;
