//! Hosting provider trait definition.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Narrow capability interface a hosting provider implements.
///
/// The provisioning driver only ever talks to this trait; provider crates
/// supply the implementation. Every operation is idempotent against
/// already-converged remote state: re-creating an existing bucket is a
/// no-op, re-putting an object overwrites it.
#[async_trait]
pub trait SiteHost: Send + Sync {
    /// Provider name (e.g., "aws").
    fn name(&self) -> &str;

    /// Check that the provider is configured and authenticated.
    async fn check_auth(&self) -> Result<AuthStatus>;

    /// Create the bucket if needed and apply its website configuration.
    async fn create_or_update_bucket(&self, config: &BucketConfig) -> Result<BucketHandle>;

    /// Apply the bucket's public-access settings.
    async fn set_public_access(&self, bucket: &str, config: &PublicAccessConfig) -> Result<()>;

    /// Attach a policy document to the bucket.
    async fn set_bucket_policy(&self, bucket: &str, policy: &serde_json::Value) -> Result<()>;

    /// Request (or find) a TLS certificate for `domain`.
    async fn request_certificate(&self, domain: &str) -> Result<CertificateHandle>;

    /// Query issuance state and validation records for a certificate.
    async fn certificate_status(&self, arn: &str) -> Result<CertificateStatus>;

    /// Store one object. `source` is read here, never earlier.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        source: &Path,
        content_type: Option<&str>,
    ) -> Result<()>;

    /// Create the CDN distribution, or return the existing one.
    async fn create_or_update_distribution(
        &self,
        spec: &DistributionSpec,
    ) -> Result<DistributionHandle>;
}

/// Authentication status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether authentication is valid.
    pub authenticated: bool,

    /// Account/user information if available.
    pub account_info: Option<String>,

    /// Error message if not authenticated.
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}

/// Website bucket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Bucket name; for apex-domain hosting this is the domain itself.
    pub name: String,

    /// Object served for `/`.
    pub index_document: String,

    /// Object served for missing keys.
    pub error_document: String,

    /// Allow deletion even when the bucket still holds objects.
    pub force_destroy: bool,
}

/// Handle to a provisioned bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketHandle {
    pub name: String,

    /// Public website endpoint for the bucket.
    pub website_endpoint: String,
}

/// Public-access settings for a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicAccessConfig {
    pub block_public_acls: bool,
    pub ignore_public_acls: bool,
    pub block_public_policy: bool,
    pub restrict_public_buckets: bool,
}

impl PublicAccessConfig {
    /// Settings for a publicly readable website bucket: nothing blocked.
    pub fn public_website() -> Self {
        Self {
            block_public_acls: false,
            ignore_public_acls: false,
            block_public_policy: false,
            restrict_public_buckets: false,
        }
    }
}

/// Handle to a requested certificate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateHandle {
    pub arn: String,
}

/// Issuance state of a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateState {
    PendingValidation,
    Issued,
    Failed,
    Unknown,
}

impl std::fmt::Display for CertificateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CertificateState::PendingValidation => write!(f, "pending validation"),
            CertificateState::Issued => write!(f, "issued"),
            CertificateState::Failed => write!(f, "failed"),
            CertificateState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Full certificate status, including the DNS records the operator must
/// install to complete validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateStatus {
    pub state: CertificateState,
    pub validation_records: Vec<DnsValidationRecord>,
}

/// A DNS record required for certificate validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsValidationRecord {
    pub name: String,
    pub record_type: String,
    pub value: String,
}

/// CDN distribution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionSpec {
    /// Origin the distribution pulls from (the bucket website endpoint).
    pub origin_domain: String,

    /// Stable identifier for the origin.
    pub origin_id: String,

    /// Alternate domain names; requires `certificate_arn`.
    pub aliases: Vec<String>,

    /// Certificate backing the aliases, when issued.
    pub certificate_arn: Option<String>,

    /// CDN price class.
    pub price_class: String,

    /// Object served for `/`.
    pub default_root_object: String,
}

/// Handle to a provisioned distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionHandle {
    pub id: String,
    pub domain_name: String,
}

/// Read-only results of a completed provisioning run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteOutputs {
    pub bucket: Option<String>,
    pub website_endpoint: Option<String>,
    pub certificate_arn: Option<String>,
    pub certificate_validation: Vec<DnsValidationRecord>,
    pub distribution_id: Option<String>,
    pub distribution_domain: Option<String>,
}
