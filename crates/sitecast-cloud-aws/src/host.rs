//! AWS implementation of the `SiteHost` trait.

use crate::awscli::AwsCli;
use crate::error::AwsError;
use async_trait::async_trait;
use sitecast_cloud::{
    AuthStatus, BucketConfig, BucketHandle, CertificateHandle, CertificateState,
    CertificateStatus, CloudError, DistributionHandle, DistributionSpec, DnsValidationRecord,
    PublicAccessConfig, SiteHost,
};
use std::path::Path;

fn api_err(err: AwsError) -> CloudError {
    CloudError::Host(err.to_string())
}

/// AWS provider: S3 bucket, ACM certificate, CloudFront distribution.
pub struct AwsSiteHost {
    cli: AwsCli,
    region: String,
}

impl AwsSiteHost {
    pub fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            cli: AwsCli::new(&region),
            region,
        }
    }

    fn website_endpoint(&self, bucket: &str) -> String {
        format!("{}.s3-website-{}.amazonaws.com", bucket, self.region)
    }
}

#[async_trait]
impl SiteHost for AwsSiteHost {
    fn name(&self) -> &str {
        "aws"
    }

    async fn check_auth(&self) -> sitecast_cloud::Result<AuthStatus> {
        match self.cli.check_auth().await {
            Ok(identity) => Ok(AuthStatus::ok(format!(
                "{} ({})",
                identity.arn, identity.account
            ))),
            Err(AwsError::AwsCliNotFound) => {
                Ok(AuthStatus::failed("aws CLI is not installed"))
            }
            Err(err) => Ok(AuthStatus::failed(err.to_string())),
        }
    }

    async fn create_or_update_bucket(
        &self,
        config: &BucketConfig,
    ) -> sitecast_cloud::Result<BucketHandle> {
        if self.cli.bucket_exists(&config.name).await.map_err(api_err)? {
            tracing::debug!(bucket = %config.name, "Bucket already exists");
        } else {
            tracing::info!(bucket = %config.name, region = %self.region, "Creating bucket");
            self.cli.create_bucket(&config.name).await.map_err(api_err)?;
        }

        // Re-applying the same website configuration is a no-op.
        self.cli
            .put_bucket_website(&config.name, &config.index_document, &config.error_document)
            .await
            .map_err(api_err)?;

        Ok(BucketHandle {
            name: config.name.clone(),
            website_endpoint: self.website_endpoint(&config.name),
        })
    }

    async fn set_public_access(
        &self,
        bucket: &str,
        config: &PublicAccessConfig,
    ) -> sitecast_cloud::Result<()> {
        let block = serde_json::json!({
            "BlockPublicAcls": config.block_public_acls,
            "IgnorePublicAcls": config.ignore_public_acls,
            "BlockPublicPolicy": config.block_public_policy,
            "RestrictPublicBuckets": config.restrict_public_buckets,
        })
        .to_string();

        self.cli
            .put_public_access_block(bucket, &block)
            .await
            .map_err(api_err)
    }

    async fn set_bucket_policy(
        &self,
        bucket: &str,
        policy: &serde_json::Value,
    ) -> sitecast_cloud::Result<()> {
        self.cli
            .put_bucket_policy(bucket, &policy.to_string())
            .await
            .map_err(api_err)
    }

    async fn request_certificate(
        &self,
        domain: &str,
    ) -> sitecast_cloud::Result<CertificateHandle> {
        // Reuse an existing certificate for the domain; requesting again
        // every run would pile up duplicates.
        let existing = self
            .cli
            .list_certificates()
            .await
            .map_err(api_err)?
            .into_iter()
            .find(|c| c.domain_name == domain);

        if let Some(certificate) = existing {
            tracing::debug!(arn = %certificate.certificate_arn, "Certificate already requested");
            return Ok(CertificateHandle {
                arn: certificate.certificate_arn,
            });
        }

        tracing::info!(domain = %domain, "Requesting certificate");
        let arn = self
            .cli
            .request_certificate(domain)
            .await
            .map_err(api_err)?;
        Ok(CertificateHandle { arn })
    }

    async fn certificate_status(&self, arn: &str) -> sitecast_cloud::Result<CertificateStatus> {
        let detail = self.cli.describe_certificate(arn).await.map_err(api_err)?;

        let state = match detail.status.as_str() {
            "ISSUED" => CertificateState::Issued,
            "PENDING_VALIDATION" => CertificateState::PendingValidation,
            "FAILED" | "VALIDATION_TIMED_OUT" | "REVOKED" | "EXPIRED" => CertificateState::Failed,
            _ => CertificateState::Unknown,
        };

        let validation_records = detail
            .domain_validation_options
            .into_iter()
            .filter_map(|option| option.resource_record)
            .map(|record| DnsValidationRecord {
                name: record.name,
                record_type: record.record_type,
                value: record.value,
            })
            .collect();

        Ok(CertificateStatus {
            state,
            validation_records,
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        source: &Path,
        content_type: Option<&str>,
    ) -> sitecast_cloud::Result<()> {
        self.cli
            .put_object(bucket, key, source, content_type)
            .await
            .map_err(api_err)
    }

    async fn create_or_update_distribution(
        &self,
        spec: &DistributionSpec,
    ) -> sitecast_cloud::Result<DistributionHandle> {
        let comment = format!("sitecast:{}", spec.origin_id);

        if let Some(existing) = self
            .cli
            .find_distribution_by_comment(&comment)
            .await
            .map_err(api_err)?
        {
            tracing::debug!(id = %existing.id, "Distribution already exists");
            return Ok(DistributionHandle {
                id: existing.id,
                domain_name: existing.domain_name,
            });
        }

        tracing::info!(origin = %spec.origin_domain, "Creating distribution");
        let config = distribution_config(spec, &comment);
        let created = self
            .cli
            .create_distribution(&config)
            .await
            .map_err(api_err)?;

        Ok(DistributionHandle {
            id: created.id,
            domain_name: created.domain_name,
        })
    }
}

/// Build the full CloudFront distribution-config document.
///
/// The origin is the bucket *website* endpoint, which only speaks HTTP;
/// viewers are still redirected to HTTPS at the edge.
fn distribution_config(spec: &DistributionSpec, comment: &str) -> serde_json::Value {
    let viewer_certificate = match &spec.certificate_arn {
        Some(arn) => serde_json::json!({
            "ACMCertificateArn": arn,
            "SSLSupportMethod": "sni-only",
            "MinimumProtocolVersion": "TLSv1.2_2021",
            "CloudFrontDefaultCertificate": false,
        }),
        None => serde_json::json!({
            "CloudFrontDefaultCertificate": true,
        }),
    };

    serde_json::json!({
        "CallerReference": comment,
        "Comment": comment,
        "Enabled": true,
        "DefaultRootObject": spec.default_root_object,
        "PriceClass": spec.price_class,
        "Origins": {
            "Quantity": 1,
            "Items": [
                {
                    "Id": spec.origin_id,
                    "DomainName": spec.origin_domain,
                    "CustomOriginConfig": {
                        "HTTPPort": 80,
                        "HTTPSPort": 443,
                        "OriginProtocolPolicy": "http-only",
                        "OriginSslProtocols": {
                            "Quantity": 1,
                            "Items": ["TLSv1.2"],
                        },
                    },
                }
            ],
        },
        "DefaultCacheBehavior": {
            "TargetOriginId": spec.origin_id,
            "ViewerProtocolPolicy": "redirect-to-https",
            "AllowedMethods": {
                "Quantity": 2,
                "Items": ["GET", "HEAD"],
                "CachedMethods": {
                    "Quantity": 2,
                    "Items": ["GET", "HEAD"],
                },
            },
            "ForwardedValues": {
                "QueryString": false,
                "Cookies": { "Forward": "none" },
            },
            "MinTTL": 0,
        },
        "Aliases": {
            "Quantity": spec.aliases.len(),
            "Items": spec.aliases,
        },
        "ViewerCertificate": viewer_certificate,
        "Restrictions": {
            "GeoRestriction": {
                "RestrictionType": "none",
                "Quantity": 0,
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spec(certificate_arn: Option<&str>) -> DistributionSpec {
        DistributionSpec {
            origin_domain: "example.com.s3-website-us-east-1.amazonaws.com".to_string(),
            origin_id: "example.com".to_string(),
            aliases: if certificate_arn.is_some() {
                vec!["example.com".to_string()]
            } else {
                Vec::new()
            },
            certificate_arn: certificate_arn.map(String::from),
            price_class: "PriceClass_100".to_string(),
            default_root_object: "index.html".to_string(),
        }
    }

    #[test]
    fn test_distribution_config_with_certificate() {
        let spec = sample_spec(Some("arn:aws:acm:us-east-1:123456789012:certificate/abc"));
        let config = distribution_config(&spec, "sitecast:example.com");

        assert_eq!(config["CallerReference"], "sitecast:example.com");
        assert_eq!(config["Aliases"]["Quantity"], 1);
        assert_eq!(config["Aliases"]["Items"][0], "example.com");
        assert_eq!(
            config["ViewerCertificate"]["ACMCertificateArn"],
            "arn:aws:acm:us-east-1:123456789012:certificate/abc"
        );
        assert_eq!(config["ViewerCertificate"]["SSLSupportMethod"], "sni-only");
    }

    #[test]
    fn test_distribution_config_without_certificate() {
        let spec = sample_spec(None);
        let config = distribution_config(&spec, "sitecast:example.com");

        assert_eq!(config["Aliases"]["Quantity"], 0);
        assert_eq!(
            config["ViewerCertificate"]["CloudFrontDefaultCertificate"],
            true
        );
    }

    #[test]
    fn test_distribution_config_origin_is_http_only() {
        let spec = sample_spec(None);
        let config = distribution_config(&spec, "sitecast:example.com");

        let origin = &config["Origins"]["Items"][0];
        assert_eq!(
            origin["DomainName"],
            "example.com.s3-website-us-east-1.amazonaws.com"
        );
        assert_eq!(
            origin["CustomOriginConfig"]["OriginProtocolPolicy"],
            "http-only"
        );
        assert_eq!(
            config["DefaultCacheBehavior"]["ViewerProtocolPolicy"],
            "redirect-to-https"
        );
    }
}
