//! Local-to-remote synchronization planning.
//!
//! Walks a site directory, derives a stable remote key and content type for
//! every file, and turns the result into an inspectable list of upload
//! operations that can be executed (or just printed) before any network
//! call is made.

mod enumerate;
mod error;
mod plan;
mod resolve;

pub use enumerate::enumerate;
pub use error::{Result, SyncError};
pub use plan::{PlanSummary, SyncPlan, UploadOperation, plan, plan_files};
pub use resolve::{content_type_for, remote_key};
