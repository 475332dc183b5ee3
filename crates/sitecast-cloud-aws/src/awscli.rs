//! aws CLI wrapper
//!
//! Wraps the AWS CLI for S3, ACM, and CloudFront operations.

use crate::error::{AwsError, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Certificates for CloudFront must live in us-east-1 regardless of where
/// the bucket is.
const CERTIFICATE_REGION: &str = "us-east-1";

/// aws CLI wrapper
pub struct AwsCli {
    region: String,
}

impl AwsCli {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    /// Check that the CLI is installed and credentials resolve.
    pub async fn check_auth(&self) -> Result<CallerIdentity> {
        let which = Command::new("which").arg("aws").output().await?;
        if !which.status.success() {
            return Err(AwsError::AwsCliNotFound);
        }

        let output = self.run(&["sts", "get-caller-identity"]).await?;
        let identity: CallerIdentity = serde_json::from_str(&output)?;
        Ok(identity)
    }

    /// Run an aws command in the configured region and return stdout.
    async fn run(&self, args: &[&str]) -> Result<String> {
        self.run_in(&self.region, args).await
    }

    /// Run an aws command in an explicit region and return stdout.
    async fn run_in(&self, region: &str, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("aws");
        cmd.args(args);
        cmd.arg("--region").arg(region);
        cmd.arg("--output").arg("json");
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: aws {} --region {}", args.join(" "), region);

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AwsError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Whether the bucket exists and is accessible.
    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        let output = Command::new("aws")
            .args(["s3api", "head-bucket", "--bucket", bucket])
            .arg("--region")
            .arg(&self.region)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(output.status.success())
    }

    /// Create a bucket in the configured region.
    pub async fn create_bucket(&self, bucket: &str) -> Result<()> {
        // us-east-1 rejects an explicit location constraint.
        let constraint = format!("LocationConstraint={}", self.region);
        let mut args = vec!["s3api", "create-bucket", "--bucket", bucket];
        if self.region != "us-east-1" {
            args.push("--create-bucket-configuration");
            args.push(constraint.as_str());
        }

        self.run(&args).await?;
        Ok(())
    }

    /// Apply website configuration to a bucket.
    pub async fn put_bucket_website(&self, bucket: &str, index: &str, error: &str) -> Result<()> {
        let config = serde_json::json!({
            "IndexDocument": { "Suffix": index },
            "ErrorDocument": { "Key": error },
        })
        .to_string();

        self.run(&[
            "s3api",
            "put-bucket-website",
            "--bucket",
            bucket,
            "--website-configuration",
            &config,
        ])
        .await?;
        Ok(())
    }

    /// Apply a public-access-block configuration to a bucket.
    pub async fn put_public_access_block(&self, bucket: &str, config: &str) -> Result<()> {
        self.run(&[
            "s3api",
            "put-public-access-block",
            "--bucket",
            bucket,
            "--public-access-block-configuration",
            config,
        ])
        .await?;
        Ok(())
    }

    /// Attach a bucket policy.
    pub async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()> {
        self.run(&[
            "s3api",
            "put-bucket-policy",
            "--bucket",
            bucket,
            "--policy",
            policy,
        ])
        .await?;
        Ok(())
    }

    /// Store one object, reading its content from `source`.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        source: &Path,
        content_type: Option<&str>,
    ) -> Result<()> {
        let body = source.to_string_lossy();
        let mut args = vec![
            "s3api",
            "put-object",
            "--bucket",
            bucket,
            "--key",
            key,
            "--body",
            body.as_ref(),
        ];
        if let Some(content_type) = content_type {
            args.push("--content-type");
            args.push(content_type);
        }

        self.run(&args).await?;
        Ok(())
    }

    /// List certificates in the certificate region.
    pub async fn list_certificates(&self) -> Result<Vec<CertificateSummary>> {
        let output = self
            .run_in(CERTIFICATE_REGION, &["acm", "list-certificates"])
            .await?;

        let list: CertificateList = serde_json::from_str(&output)?;
        Ok(list.certificate_summary_list)
    }

    /// Request a DNS-validated certificate; returns its ARN.
    pub async fn request_certificate(&self, domain: &str) -> Result<String> {
        let output = self
            .run_in(
                CERTIFICATE_REGION,
                &[
                    "acm",
                    "request-certificate",
                    "--domain-name",
                    domain,
                    "--validation-method",
                    "DNS",
                ],
            )
            .await?;

        let requested: RequestedCertificate = serde_json::from_str(&output)?;
        Ok(requested.certificate_arn)
    }

    /// Read issuance status and validation records for a certificate.
    pub async fn describe_certificate(&self, arn: &str) -> Result<CertificateDetail> {
        let output = self
            .run_in(
                CERTIFICATE_REGION,
                &["acm", "describe-certificate", "--certificate-arn", arn],
            )
            .await?;

        let described: DescribedCertificate = serde_json::from_str(&output)?;
        Ok(described.certificate)
    }

    /// Find a distribution previously created with `comment`.
    pub async fn find_distribution_by_comment(
        &self,
        comment: &str,
    ) -> Result<Option<DistributionInfo>> {
        let output = self.run(&["cloudfront", "list-distributions"]).await?;

        let list: ListDistributions = serde_json::from_str(&output)?;
        Ok(list
            .distribution_list
            .items
            .into_iter()
            .find(|d| d.comment == comment))
    }

    /// Create a distribution from a full distribution-config document.
    pub async fn create_distribution(
        &self,
        config: &serde_json::Value,
    ) -> Result<DistributionInfo> {
        let config = config.to_string();
        let output = self
            .run(&[
                "cloudfront",
                "create-distribution",
                "--distribution-config",
                &config,
            ])
            .await?;

        let created: CreatedDistribution = serde_json::from_str(&output)?;
        Ok(created.distribution)
    }
}

/// `sts get-caller-identity` output.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallerIdentity {
    pub account: String,
    pub arn: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CertificateList {
    #[serde(default)]
    certificate_summary_list: Vec<CertificateSummary>,
}

/// One entry of `acm list-certificates`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateSummary {
    pub certificate_arn: String,
    pub domain_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RequestedCertificate {
    certificate_arn: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribedCertificate {
    certificate: CertificateDetail,
}

/// `acm describe-certificate` detail.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateDetail {
    pub status: String,
    #[serde(default)]
    pub domain_validation_options: Vec<DomainValidationOption>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainValidationOption {
    pub resource_record: Option<ResourceRecord>,
}

/// DNS record ACM asks the operator to install.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRecord {
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListDistributions {
    #[serde(default)]
    distribution_list: DistributionItems,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DistributionItems {
    #[serde(default)]
    items: Vec<DistributionInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreatedDistribution {
    distribution: DistributionInfo,
}

/// The fields of a distribution this crate cares about.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionInfo {
    pub id: String,
    pub domain_name: String,
    #[serde(default)]
    pub comment: String,
}
