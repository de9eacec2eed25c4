use std::fmt;

use tracing::{error, info, warn, Level};

use crate::types::{HealthCounts, PodPhase};

/// A line-worthy outcome of handling a pod notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Reaped {
        pod: String,
    },
    ReapFailed {
        pod: String,
        error: String,
    },
    IncompleteAnnotations {
        pod: String,
        team: String,
        repo: String,
        version: String,
    },
    Added {
        pod: String,
        ready: bool,
        total: usize,
    },
    RepositoryUpdated {
        pod: String,
        team: String,
        repo: String,
        from: String,
        to: String,
        health: HealthCounts,
    },
    MeetsAllCriteria {
        pod: String,
        health: HealthCounts,
    },
    Failed {
        namespace: String,
        pod: String,
    },
    Succeeded {
        pod: String,
        from: PodPhase,
        to: PodPhase,
    },
    UnhandledPhase {
        pod: String,
        from: PodPhase,
        to: PodPhase,
    },
    Deleted {
        pod: String,
        team: String,
        total: usize,
        health: HealthCounts,
    },
}

impl Notice {
    pub fn level(&self) -> Level {
        match self {
            Notice::ReapFailed { .. } | Notice::Failed { .. } => Level::ERROR,
            Notice::UnhandledPhase { .. } => Level::WARN,
            _ => Level::INFO,
        }
    }

    pub fn emit(&self) {
        let level = self.level();
        if level == Level::ERROR {
            error!("{}", self);
        } else if level == Level::WARN {
            warn!("{}", self);
        } else {
            info!("{}", self);
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Reaped { pod } => write!(f, "Deleted pod {}", pod),
            Notice::ReapFailed { pod, error } => write!(f, "Error deleting pod {}: {}", pod, error),
            Notice::IncompleteAnnotations { pod, team, repo, version } => {
                write!(f, "Pod: {} {} {}:{}", pod, team, repo, version)
            }
            Notice::Added { pod, ready: true, total } => {
                write!(f, "New pod added: {} currently {} pods.", pod, total)
            }
            Notice::Added { pod, ready: false, total } => {
                write!(f, "New pod unready: {} currently {} pods.", pod, total)
            }
            Notice::RepositoryUpdated { pod, team, repo, from, to, health } => {
                write!(f, "{} updated {} {} ⇢ {} {} pod: {}", team, repo, from, to, health, pod)
            }
            Notice::MeetsAllCriteria { pod, health } => {
                write!(f, "Pod meets all criteria: {} {}", pod, health)
            }
            Notice::Failed { namespace, pod } => write!(f, "Pod Failed: {}/{}", namespace, pod),
            Notice::Succeeded { pod, from, to } => write!(f, "Pod Succeeded: {} {}/{}", pod, from, to),
            Notice::UnhandledPhase { pod, from, to } => {
                write!(f, "Pod status changed to unhandled status: {} {}/{}", pod, from, to)
            }
            Notice::Deleted { pod, team, total, health } => {
                write!(f, "{} deleted: {} currently {} pods {}.", team, pod, total, health)
            }
        }
    }
}

/// Startup census line printed once the bulk list is absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CensusSummary {
    pub pods: usize,
    pub health: HealthCounts,
    pub unique_repos: usize,
}

impl fmt::Display for CensusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Number of pods: {} ({}) unique repos: {}",
            self.pods, self.health, self.unique_repos
        )
    }
}
