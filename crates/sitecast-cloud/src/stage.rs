//! Provisioning stages and their dependency graph.

use crate::error::{CloudError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// What a stage does when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Create the bucket and apply website configuration.
    Bucket,
    /// Open public access on the bucket.
    PublicAccess,
    /// Attach the public-read bucket policy.
    BucketPolicy,
    /// Request the TLS certificate.
    Certificate,
    /// Push the planned objects into the bucket.
    Upload,
    /// Create the CDN distribution.
    Distribution,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Bucket => write!(f, "bucket"),
            StageKind::PublicAccess => write!(f, "public-access"),
            StageKind::BucketPolicy => write!(f, "bucket-policy"),
            StageKind::Certificate => write!(f, "certificate"),
            StageKind::Upload => write!(f, "upload"),
            StageKind::Distribution => write!(f, "distribution"),
        }
    }
}

/// One provisioning stage: a name, what it does, and the stages that must
/// succeed before it may start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub kind: StageKind,
    pub depends_on: Vec<String>,
}

impl Stage {
    pub fn new(name: impl Into<String>, kind: StageKind) -> Self {
        Self {
            name: name.into(),
            kind,
            depends_on: Vec::new(),
        }
    }

    /// Declare that this stage runs only after `dependency` has succeeded.
    pub fn after(mut self, dependency: impl Into<String>) -> Self {
        self.depends_on.push(dependency.into());
        self
    }
}

/// Per-stage execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStatus::Pending => write!(f, "pending"),
            StageStatus::Running => write!(f, "running"),
            StageStatus::Succeeded => write!(f, "succeeded"),
            StageStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Whole-run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    NotStarted,
    InProgress,
    Completed,
    Aborted,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::NotStarted => write!(f, "not started"),
            RunStatus::InProgress => write!(f, "in progress"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Aborted => write!(f, "aborted"),
        }
    }
}

/// A validated set of stages forming a directed acyclic graph.
///
/// The current pipeline happens to be a chain, but nothing here assumes
/// that: any partial order validates and executes.
#[derive(Debug, Clone, Default)]
pub struct StageGraph {
    stages: Vec<Stage>,
}

impl StageGraph {
    /// Build a graph, rejecting duplicate names, unknown dependencies,
    /// and cycles up front; a malformed graph must never start running.
    pub fn new(stages: Vec<Stage>) -> Result<Self> {
        let mut names = HashSet::new();
        for stage in &stages {
            if !names.insert(stage.name.as_str()) {
                return Err(CloudError::DuplicateStage(stage.name.clone()));
            }
        }

        for stage in &stages {
            for dependency in &stage.depends_on {
                if !names.contains(dependency.as_str()) {
                    return Err(CloudError::UnknownDependency {
                        stage: stage.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        // Kahn's algorithm; whatever cannot be ordered is part of a cycle.
        let mut in_degree: HashMap<&str, usize> = stages
            .iter()
            .map(|s| (s.name.as_str(), s.depends_on.len()))
            .collect();
        let mut ordered = 0;
        let mut queue: Vec<&str> = in_degree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(n, _)| *n)
            .collect();

        while let Some(name) = queue.pop() {
            ordered += 1;
            for stage in &stages {
                let edges = stage.depends_on.iter().filter(|d| *d == name).count();
                if edges > 0
                    && let Some(degree) = in_degree.get_mut(stage.name.as_str())
                {
                    *degree -= edges;
                    if *degree == 0 {
                        queue.push(stage.name.as_str());
                    }
                }
            }
        }

        if ordered != stages.len() {
            let stuck: Vec<&str> = in_degree
                .iter()
                .filter(|(_, d)| **d > 0)
                .map(|(n, _)| *n)
                .collect();
            return Err(CloudError::DependencyCycle(stuck.join(", ")));
        }

        Ok(Self { stages })
    }

    /// Stages in declaration order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn get(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Pending stages whose dependencies have all succeeded, in
    /// declaration order.
    pub fn ready(&self, statuses: &HashMap<String, StageStatus>) -> Vec<&Stage> {
        self.stages
            .iter()
            .filter(|stage| {
                statuses.get(&stage.name) == Some(&StageStatus::Pending)
                    && stage
                        .depends_on
                        .iter()
                        .all(|dep| statuses.get(dep) == Some(&StageStatus::Succeeded))
            })
            .collect()
    }
}

/// Which optional stages the pipeline carries.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub with_certificate: bool,
    pub with_distribution: bool,
}

/// The static-site pipeline: bucket → public-access → policy
/// [→ certificate] → upload [→ distribution].
///
/// Optional stages are omitted from the graph entirely, so a disabled
/// certificate never runs and never blocks anything.
pub fn site_pipeline(options: &PipelineOptions) -> Result<StageGraph> {
    let mut stages = vec![
        Stage::new("bucket", StageKind::Bucket),
        Stage::new("public-access", StageKind::PublicAccess).after("bucket"),
        Stage::new("policy", StageKind::BucketPolicy).after("public-access"),
    ];

    let mut upload_after = "policy";
    if options.with_certificate {
        stages.push(Stage::new("certificate", StageKind::Certificate).after("policy"));
        upload_after = "certificate";
    }

    stages.push(Stage::new("upload", StageKind::Upload).after(upload_after));

    if options.with_distribution {
        stages.push(Stage::new("distribution", StageKind::Distribution).after("upload"));
    }

    StageGraph::new(stages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses_for(graph: &StageGraph) -> HashMap<String, StageStatus> {
        graph
            .stages()
            .iter()
            .map(|s| (s.name.clone(), StageStatus::Pending))
            .collect()
    }

    #[test]
    fn test_full_pipeline_shape() {
        let graph = site_pipeline(&PipelineOptions {
            with_certificate: true,
            with_distribution: true,
        })
        .unwrap();

        let names: Vec<&str> = graph.stages().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "bucket",
                "public-access",
                "policy",
                "certificate",
                "upload",
                "distribution"
            ]
        );

        let upload = graph.get("upload").unwrap();
        assert_eq!(upload.depends_on, vec!["certificate"]);
    }

    #[test]
    fn test_minimal_pipeline_omits_optional_stages() {
        let graph = site_pipeline(&PipelineOptions::default()).unwrap();

        assert!(graph.get("certificate").is_none());
        assert!(graph.get("distribution").is_none());
        assert_eq!(graph.get("upload").unwrap().depends_on, vec!["policy"]);
    }

    #[test]
    fn test_ready_respects_dependencies() {
        let graph = site_pipeline(&PipelineOptions::default()).unwrap();
        let mut statuses = statuses_for(&graph);

        let ready: Vec<&str> = graph.ready(&statuses).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(ready, vec!["bucket"]);

        statuses.insert("bucket".to_string(), StageStatus::Succeeded);
        let ready: Vec<&str> = graph.ready(&statuses).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(ready, vec!["public-access"]);
    }

    #[test]
    fn test_ready_supports_independent_stages() {
        let graph = StageGraph::new(vec![
            Stage::new("bucket", StageKind::Bucket),
            Stage::new("certificate", StageKind::Certificate),
            Stage::new("upload", StageKind::Upload)
                .after("bucket")
                .after("certificate"),
        ])
        .unwrap();

        let mut statuses = statuses_for(&graph);
        let ready: Vec<&str> = graph.ready(&statuses).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(ready, vec!["bucket", "certificate"]);

        statuses.insert("bucket".to_string(), StageStatus::Succeeded);
        statuses.insert("certificate".to_string(), StageStatus::Succeeded);
        let ready: Vec<&str> = graph.ready(&statuses).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(ready, vec!["upload"]);
    }

    #[test]
    fn test_duplicate_stage_name_rejected() {
        let err = StageGraph::new(vec![
            Stage::new("bucket", StageKind::Bucket),
            Stage::new("bucket", StageKind::Upload),
        ])
        .unwrap_err();
        assert!(matches!(err, CloudError::DuplicateStage(_)));
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let err = StageGraph::new(vec![
            Stage::new("upload", StageKind::Upload).after("bucket"),
        ])
        .unwrap_err();
        assert!(matches!(err, CloudError::UnknownDependency { .. }));
    }

    #[test]
    fn test_dependency_cycle_rejected() {
        let err = StageGraph::new(vec![
            Stage::new("a", StageKind::Bucket).after("b"),
            Stage::new("b", StageKind::Upload).after("a"),
        ])
        .unwrap_err();
        assert!(matches!(err, CloudError::DependencyCycle(_)));
    }
}
