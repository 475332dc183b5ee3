//! Static-site hosting infrastructure.
//!
//! This crate turns a site configuration and an upload plan into one
//! ordered provisioning run: bucket, public access, bucket policy,
//! certificate, object sync, distribution. Providers implement the
//! [`SiteHost`] trait; the [`driver::ProvisioningDriver`] only ever talks
//! to that trait, so the pipeline itself never touches a provider SDK.
//!
//! Stages are data: each carries a name and an explicit `depends_on`
//! list, and the driver executes any stage whose dependencies have
//! succeeded. Disabling the certificate or distribution stage is a matter
//! of leaving it out of the graph, not of editing code.

pub mod driver;
pub mod error;
pub mod host;
pub mod stage;
pub mod state;

// Re-exports
pub use driver::{DriverOptions, ProvisioningDriver, RunReport, SiteSpec, StageFailure};
pub use error::{CloudError, Result};
pub use host::{
    AuthStatus, BucketConfig, BucketHandle, CertificateHandle, CertificateState,
    CertificateStatus, DistributionHandle, DistributionSpec, DnsValidationRecord,
    PublicAccessConfig, SiteHost, SiteOutputs,
};
pub use stage::{
    PipelineOptions, RunStatus, Stage, StageGraph, StageKind, StageStatus, site_pipeline,
};
pub use state::{RunRecord, StateManager};
