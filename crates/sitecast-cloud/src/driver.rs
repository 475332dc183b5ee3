//! Dependency-ordered execution of the provisioning pipeline.

use crate::error::{CloudError, Result};
use crate::host::{
    BucketConfig, CertificateState, DistributionSpec, DnsValidationRecord, PublicAccessConfig,
    SiteHost, SiteOutputs,
};
use crate::stage::{RunStatus, Stage, StageGraph, StageKind, StageStatus};
use futures_util::TryStreamExt;
use futures_util::future::join_all;
use futures_util::stream;
use sitecast_sync::SyncPlan;
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Execution settings.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Maximum concurrent object uploads within the upload stage.
    pub upload_concurrency: usize,

    /// Deadline applied to each stage; `None` waits indefinitely.
    pub stage_timeout: Option<Duration>,

    /// Cooperative abort signal; cancelling fails the in-flight stage and
    /// leaves everything downstream pending.
    pub cancel: CancellationToken,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            upload_concurrency: 8,
            stage_timeout: None,
            cancel: CancellationToken::new(),
        }
    }
}

/// The concrete values stages draw on.
#[derive(Debug, Clone)]
pub struct SiteSpec {
    /// Domain the site is served under.
    pub domain: String,

    /// Destination bucket name.
    pub bucket: String,

    pub index_document: String,
    pub error_document: String,
    pub force_destroy: bool,

    /// Policy document attached by the policy stage.
    pub policy: serde_json::Value,

    /// CDN price class for the distribution stage.
    pub price_class: String,
}

/// First failure of an aborted run.
#[derive(Debug, Clone)]
pub struct StageFailure {
    pub stage: String,
    pub message: String,
}

/// Outcome of one provisioning run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: RunStatus,

    /// Final stage statuses, in declaration order.
    pub stages: Vec<(String, StageStatus)>,

    /// First failing stage, when aborted.
    pub failure: Option<StageFailure>,

    /// Stages that never started, in declaration order.
    pub never_ran: Vec<String>,

    /// Available once the run completed.
    pub outputs: Option<SiteOutputs>,
}

/// What a stage contributes to the run outputs.
enum StageOutput {
    None,
    Bucket {
        name: String,
        website_endpoint: String,
    },
    Certificate {
        arn: String,
        validation: Vec<DnsValidationRecord>,
    },
    Distribution {
        id: String,
        domain_name: String,
    },
}

/// Executes a stage graph against a hosting provider.
///
/// Scheduling is by readiness: every pending stage whose dependencies
/// have succeeded runs in the next batch, and batch members run
/// concurrently. The current pipeline is a chain, so batches degenerate
/// to one stage each; the driver does not rely on that.
///
/// A failed stage aborts the run. Stages that already succeeded are left
/// in place; a later re-run converges the rest.
pub struct ProvisioningDriver<H: SiteHost> {
    host: H,
    graph: StageGraph,
    spec: SiteSpec,
    plan: SyncPlan,
    options: DriverOptions,
}

impl<H: SiteHost> ProvisioningDriver<H> {
    pub fn new(
        host: H,
        graph: StageGraph,
        spec: SiteSpec,
        plan: SyncPlan,
        options: DriverOptions,
    ) -> Self {
        Self {
            host,
            graph,
            spec,
            plan,
            options,
        }
    }

    pub fn graph(&self) -> &StageGraph {
        &self.graph
    }

    /// Execute the whole run.
    ///
    /// Never rolls back: on failure the report names the failed stage and
    /// every stage that never started, so the caller can diagnose and
    /// re-invoke. Re-running is safe because every stage apply is
    /// idempotent.
    pub async fn run(&self) -> RunReport {
        let mut statuses: HashMap<String, StageStatus> = self
            .graph
            .stages()
            .iter()
            .map(|s| (s.name.clone(), StageStatus::Pending))
            .collect();
        let mut outputs = SiteOutputs::default();
        let mut failure: Option<StageFailure> = None;

        info!(
            provider = self.host.name(),
            stages = self.graph.len(),
            uploads = self.plan.len(),
            "Provisioning run starting"
        );

        loop {
            let batch: Vec<Stage> = self
                .graph
                .ready(&statuses)
                .into_iter()
                .cloned()
                .collect();
            if batch.is_empty() {
                break;
            }

            for stage in &batch {
                statuses.insert(stage.name.clone(), StageStatus::Running);
            }

            let results = join_all(batch.iter().map(|stage| {
                let outputs = &outputs;
                async move { (stage.name.clone(), self.apply_stage(stage, outputs).await) }
            }))
            .await;

            let mut batch_failed = false;
            for (name, result) in results {
                match result {
                    Ok(output) => {
                        info!(stage = %name, "Stage succeeded");
                        statuses.insert(name, StageStatus::Succeeded);
                        merge_output(&mut outputs, output);
                    }
                    Err(err) => {
                        tracing::error!(stage = %name, error = %err, "Stage failed");
                        statuses.insert(name.clone(), StageStatus::Failed);
                        if failure.is_none() {
                            failure = Some(StageFailure {
                                stage: name,
                                message: err.to_string(),
                            });
                        }
                        batch_failed = true;
                    }
                }
            }

            if batch_failed {
                break;
            }
        }

        let completed = statuses.values().all(|s| *s == StageStatus::Succeeded);
        let status = if failure.is_none() && completed {
            RunStatus::Completed
        } else {
            RunStatus::Aborted
        };

        let stage_report: Vec<(String, StageStatus)> = self
            .graph
            .stages()
            .iter()
            .map(|s| {
                let stage_status = statuses
                    .get(&s.name)
                    .copied()
                    .unwrap_or(StageStatus::Pending);
                (s.name.clone(), stage_status)
            })
            .collect();

        let never_ran: Vec<String> = stage_report
            .iter()
            .filter(|(_, s)| *s == StageStatus::Pending)
            .map(|(name, _)| name.clone())
            .collect();

        match status {
            RunStatus::Completed => info!("Provisioning run completed"),
            _ => warn!(
                skipped = never_ran.len(),
                "Provisioning run aborted"
            ),
        }

        RunReport {
            status,
            stages: stage_report,
            failure,
            never_ran,
            outputs: (status == RunStatus::Completed).then(|| outputs.clone()),
        }
    }

    /// Run one stage under the cancellation token and optional deadline.
    async fn apply_stage(&self, stage: &Stage, outputs: &SiteOutputs) -> Result<StageOutput> {
        info!(stage = %stage.name, kind = %stage.kind, "Stage starting");

        let work = async {
            tokio::select! {
                biased;
                _ = self.options.cancel.cancelled() => Err(CloudError::Cancelled {
                    stage: stage.name.clone(),
                }),
                result = self.apply_kind(stage, outputs) => result,
            }
        };

        match self.options.stage_timeout {
            Some(limit) => match tokio::time::timeout(limit, work).await {
                Ok(result) => result,
                Err(_) => Err(CloudError::Timeout {
                    stage: stage.name.clone(),
                    seconds: limit.as_secs(),
                }),
            },
            None => work.await,
        }
    }

    async fn apply_kind(&self, stage: &Stage, outputs: &SiteOutputs) -> Result<StageOutput> {
        match stage.kind {
            StageKind::Bucket => {
                let config = BucketConfig {
                    name: self.spec.bucket.clone(),
                    index_document: self.spec.index_document.clone(),
                    error_document: self.spec.error_document.clone(),
                    force_destroy: self.spec.force_destroy,
                };
                let handle = self.host.create_or_update_bucket(&config).await?;
                Ok(StageOutput::Bucket {
                    name: handle.name,
                    website_endpoint: handle.website_endpoint,
                })
            }
            StageKind::PublicAccess => {
                self.host
                    .set_public_access(&self.spec.bucket, &PublicAccessConfig::public_website())
                    .await?;
                Ok(StageOutput::None)
            }
            StageKind::BucketPolicy => {
                self.host
                    .set_bucket_policy(&self.spec.bucket, &self.spec.policy)
                    .await?;
                Ok(StageOutput::None)
            }
            StageKind::Certificate => {
                let handle = self.host.request_certificate(&self.spec.domain).await?;
                let status = self.host.certificate_status(&handle.arn).await?;
                if status.state == CertificateState::PendingValidation {
                    warn!(
                        arn = %handle.arn,
                        records = status.validation_records.len(),
                        "Certificate awaits DNS validation"
                    );
                }
                Ok(StageOutput::Certificate {
                    arn: handle.arn,
                    validation: status.validation_records,
                })
            }
            StageKind::Upload => self.apply_upload().await,
            StageKind::Distribution => self.apply_distribution(stage, outputs).await,
        }
    }

    /// Apply every planned upload, concurrently up to the configured
    /// bound. The first failure stops issuing further uploads and fails
    /// the stage with the offending key.
    async fn apply_upload(&self) -> Result<StageOutput> {
        let bucket = self.spec.bucket.as_str();

        stream::iter(self.plan.operations.iter().map(Ok))
            .try_for_each_concurrent(self.options.upload_concurrency, |op| async move {
                debug!(key = %op.remote_key, "Uploading object");
                self.host
                    .put_object(bucket, &op.remote_key, &op.source, op.content_type)
                    .await
                    .map_err(|err| CloudError::Upload {
                        key: op.remote_key.clone(),
                        message: err.to_string(),
                    })
            })
            .await?;

        info!(objects = self.plan.len(), "All objects uploaded");
        Ok(StageOutput::None)
    }

    async fn apply_distribution(
        &self,
        stage: &Stage,
        outputs: &SiteOutputs,
    ) -> Result<StageOutput> {
        let origin_domain =
            outputs
                .website_endpoint
                .clone()
                .ok_or_else(|| CloudError::Stage {
                    stage: stage.name.clone(),
                    message: "bucket website endpoint is not available".to_string(),
                })?;

        // Aliases need a custom certificate; fall back to the provider's
        // default certificate until ours is issued.
        let certificate_arn = match &outputs.certificate_arn {
            Some(arn) => {
                let status = self.host.certificate_status(arn).await?;
                if status.state == CertificateState::Issued {
                    Some(arn.clone())
                } else {
                    warn!(
                        arn = %arn,
                        state = %status.state,
                        "Certificate not issued yet; distribution starts without aliases"
                    );
                    None
                }
            }
            None => None,
        };

        let aliases = if certificate_arn.is_some() {
            vec![self.spec.domain.clone()]
        } else {
            Vec::new()
        };

        let spec = DistributionSpec {
            origin_domain,
            origin_id: self.spec.bucket.clone(),
            aliases,
            certificate_arn,
            price_class: self.spec.price_class.clone(),
            default_root_object: self.spec.index_document.clone(),
        };

        let handle = self.host.create_or_update_distribution(&spec).await?;
        Ok(StageOutput::Distribution {
            id: handle.id,
            domain_name: handle.domain_name,
        })
    }
}

fn merge_output(outputs: &mut SiteOutputs, output: StageOutput) {
    match output {
        StageOutput::None => {}
        StageOutput::Bucket {
            name,
            website_endpoint,
        } => {
            outputs.bucket = Some(name);
            outputs.website_endpoint = Some(website_endpoint);
        }
        StageOutput::Certificate { arn, validation } => {
            outputs.certificate_arn = Some(arn);
            outputs.certificate_validation = validation;
        }
        StageOutput::Distribution { id, domain_name } => {
            outputs.distribution_id = Some(id);
            outputs.distribution_domain = Some(domain_name);
        }
    }
}
