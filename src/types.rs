use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use k8s_openapi::api::core::v1::Pod;

pub const CODE_REPO_ANNOTATION: &str = "app/code-repo";
pub const CODE_REPO_VERSION_ANNOTATION: &str = "app/code-repo-version";
pub const CHART_REPO_VERSION_ANNOTATION: &str = "helm/chart-repo-version";
pub const TEAM_LABEL: &str = "app/team";

#[derive(Debug, Clone)]
pub struct Config {
    pub namespace: String,
    pub kubeconfig_path: Option<PathBuf>,
    pub repo_host: String,
    pub resync_interval: Option<Duration>,
    pub reap_succeeded: bool,
    pub log_pod_diff: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    #[default]
    Unknown,
}

impl PodPhase {
    pub fn parse(phase: &str) -> Self {
        match phase {
            "Pending" => PodPhase::Pending,
            "Running" => PodPhase::Running,
            "Succeeded" => PodPhase::Succeeded,
            "Failed" => PodPhase::Failed,
            _ => PodPhase::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PodPhase::Pending => "Pending",
            PodPhase::Running => "Running",
            PodPhase::Succeeded => "Succeeded",
            PodPhase::Failed => "Failed",
            PodPhase::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PodPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionSnapshot {
    pub type_: String,
    pub status: String,
}

impl ConditionSnapshot {
    pub fn new(type_: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            status: status.into(),
        }
    }
}

/// The subset of a Pod that the reconciler reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PodSnapshot {
    pub name: String,
    pub namespace: String,
    pub phase: PodPhase,
    pub conditions: Vec<ConditionSnapshot>,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

impl PodSnapshot {
    pub fn new(name: impl Into<String>, phase: PodPhase) -> Self {
        Self {
            name: name.into(),
            phase,
            ..Default::default()
        }
    }

    pub fn with_condition(mut self, type_: &str, status: &str) -> Self {
        self.conditions.push(ConditionSnapshot::new(type_, status));
        self
    }

    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_annotation(mut self, key: &str, value: &str) -> Self {
        self.annotations.insert(key.to_string(), value.to_string());
        self
    }

    /// Missing annotations read as the empty string.
    pub fn annotation(&self, key: &str) -> &str {
        self.annotations.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn team(&self) -> &str {
        self.labels.get(TEAM_LABEL).map(String::as_str).unwrap_or("")
    }
}

impl From<&Pod> for PodSnapshot {
    fn from(pod: &Pod) -> Self {
        let status = pod.status.as_ref();
        let phase = status
            .and_then(|s| s.phase.as_deref())
            .map(PodPhase::parse)
            .unwrap_or_default();
        let conditions = status
            .and_then(|s| s.conditions.as_ref())
            .map(|conditions| {
                conditions
                    .iter()
                    .map(|c| ConditionSnapshot::new(c.type_.clone(), c.status.clone()))
                    .collect()
            })
            .unwrap_or_default();

        PodSnapshot {
            name: pod.metadata.name.clone().unwrap_or_default(),
            namespace: pod.metadata.namespace.clone().unwrap_or_default(),
            phase,
            conditions,
            labels: pod.metadata.labels.clone().unwrap_or_default(),
            annotations: pod.metadata.annotations.clone().unwrap_or_default(),
        }
    }
}

impl From<Pod> for PodSnapshot {
    fn from(pod: Pod) -> Self {
        PodSnapshot::from(&pod)
    }
}

/// What a delete notification carries: the object itself, or a tombstone
/// holding the last state seen before the object left the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum DeletedPod {
    Live(PodSnapshot),
    Tombstone { key: String, last_known: PodSnapshot },
}

impl DeletedPod {
    pub fn pod(&self) -> &PodSnapshot {
        match self {
            DeletedPod::Live(pod) => pod,
            DeletedPod::Tombstone { last_known, .. } => last_known,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealthCounts {
    pub healthy: usize,
    pub unhealthy: usize,
}

impl HealthCounts {
    pub fn total(&self) -> usize {
        self.healthy + self.unhealthy
    }
}

impl fmt::Display for HealthCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.healthy, self.unhealthy)
    }
}
