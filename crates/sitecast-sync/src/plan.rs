//! Upload planning.

use crate::enumerate::enumerate;
use crate::error::{Result, SyncError};
use crate::resolve::{content_type_for, remote_key};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// One object upload.
///
/// `source` is a handle, not content: bytes are read by the provider when
/// the operation is applied, so planning a large tree never buffers it.
/// Re-applying an operation overwrites the object under the same key,
/// which is what makes a whole plan safe to re-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOperation {
    /// Object key in the destination bucket, forward-slash separated.
    pub remote_key: String,

    /// Local file backing the upload.
    pub source: PathBuf,

    /// Content-type hint; `None` means the upload carries no hint.
    pub content_type: Option<&'static str>,
}

/// The full ordered set of uploads for one site tree.
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    pub operations: Vec<UploadOperation>,
}

impl SyncPlan {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            uploads: self.operations.len(),
            untyped: self
                .operations
                .iter()
                .filter(|op| op.content_type.is_none())
                .count(),
        }
    }
}

/// Summary of a plan for human output.
#[derive(Debug, Clone, Copy)]
pub struct PlanSummary {
    pub uploads: usize,
    pub untyped: usize,
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} object(s) to upload", self.uploads)?;
        if self.untyped > 0 {
            write!(f, ", {} without a content type", self.untyped)?;
        }
        Ok(())
    }
}

/// Enumerate `root` and plan one upload per file.
pub fn plan(root: &Path) -> Result<SyncPlan> {
    let files = enumerate(root)?;
    plan_files(root, files)
}

/// Plan uploads for an explicit file sequence.
///
/// Every file becomes exactly one operation. Any enumeration or
/// resolution error aborts the whole plan, and a remote-key collision
/// fails with `DuplicateKey` before a single operation is returned; a
/// partially planned tree must never reach the network.
pub fn plan_files<I>(root: &Path, files: I) -> Result<SyncPlan>
where
    I: IntoIterator<Item = Result<PathBuf>>,
{
    let mut operations = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for file in files {
        let file = file?;
        let key = remote_key(root, &file)?;

        if let Some(first) = seen.get(&key) {
            return Err(SyncError::DuplicateKey {
                key,
                first: first.clone(),
                second: file,
            });
        }
        seen.insert(key.clone(), file.clone());

        let content_type = content_type_for(&file);
        operations.push(UploadOperation {
            remote_key: key,
            source: file,
            content_type,
        });
    }

    tracing::debug!(uploads = operations.len(), "Upload plan ready");
    Ok(SyncPlan { operations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_plan_site_with_index_and_image() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();

        fs::write(root.join("index.html"), "<html></html>").unwrap();
        fs::create_dir_all(root.join("images")).unwrap();
        fs::write(root.join("images/logo.png"), [137u8, 80, 78, 71]).unwrap();

        let plan = plan(root).unwrap();
        assert_eq!(plan.len(), 2);

        let index = plan
            .operations
            .iter()
            .find(|op| op.remote_key == "index.html")
            .unwrap();
        assert_eq!(index.content_type, Some("text/html"));
        assert_eq!(index.source, root.join("index.html"));

        let logo = plan
            .operations
            .iter()
            .find(|op| op.remote_key == "images/logo.png")
            .unwrap();
        assert_eq!(logo.content_type, Some("image/png"));
        assert_eq!(logo.source, root.join("images/logo.png"));
    }

    #[test]
    fn test_plan_unknown_extension_has_no_content_type() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("download.bin"), [0u8; 8]).unwrap();

        let plan = plan(root).unwrap();
        assert_eq!(plan.operations[0].content_type, None);
        assert_eq!(plan.summary().untyped, 1);
    }

    #[test]
    fn test_plan_empty_tree_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let plan = plan(temp.path()).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_plan_files_duplicate_key_fails_with_no_operations() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::write(root.join("assets/app.js"), "x").unwrap();

        // Two spellings of the same file: distinct source paths, one key.
        let plain = root.join("assets/app.js");
        let doubled = PathBuf::from(format!("{}//assets/app.js", root.display()));

        let err = plan_files(root, vec![Ok(plain), Ok(doubled)]).unwrap_err();
        match err {
            SyncError::DuplicateKey { key, .. } => assert_eq!(key, "assets/app.js"),
            other => panic!("expected DuplicateKey, got {other}"),
        }
    }

    #[test]
    fn test_plan_files_outside_root_aborts_planning() {
        let temp = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let stray = outside.path().join("stray.html");
        fs::write(&stray, "x").unwrap();

        let err = plan_files(temp.path(), vec![Ok(stray)]).unwrap_err();
        assert!(matches!(err, SyncError::InvalidPath { .. }));
    }

    #[test]
    fn test_plan_summary_display() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("index.html"), "x").unwrap();
        fs::write(root.join("blob"), "x").unwrap();

        let summary = plan(root).unwrap().summary();
        let text = summary.to_string();
        assert!(text.contains("2 object(s) to upload"));
        assert!(text.contains("1 without a content type"));
    }
}
