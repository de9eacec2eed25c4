use tracing::debug;

use crate::census::{CensusTable, VersionTable};
use crate::kubernetes::PodApi;
use crate::parsing::{repo_version, IdentityExtractor};
use crate::readiness::is_ready;
use crate::report::{CensusSummary, Notice};
use crate::types::{DeletedPod, HealthCounts, PodPhase, PodSnapshot};

/// Owns the census and version tables and applies pod notifications to
/// them. Handlers take `&mut self`, so callers serialize them by
/// construction.
#[derive(Debug)]
pub struct Reconciler {
    census: CensusTable,
    versions: VersionTable,
    extractor: IdentityExtractor,
}

impl Reconciler {
    pub fn new(extractor: IdentityExtractor) -> Self {
        Self {
            census: CensusTable::new(),
            versions: VersionTable::new(),
            extractor,
        }
    }

    pub fn census(&self) -> &CensusTable {
        &self.census
    }

    pub fn versions(&self) -> &VersionTable {
        &self.versions
    }

    pub fn count_health(&self) -> HealthCounts {
        self.census.count_health()
    }

    pub fn summary(&self) -> CensusSummary {
        CensusSummary {
            pods: self.census.len(),
            health: self.count_health(),
            unique_repos: self.versions.len(),
        }
    }

    /// Absorbs the startup bulk list. With `reap` set, pods that already
    /// succeeded are deleted instead of tracked; each delete is attempted
    /// once and a failure only affects its own pod.
    pub async fn observe_initial<A: PodApi + ?Sized>(
        &mut self,
        api: &A,
        pods: Vec<PodSnapshot>,
        reap: bool,
    ) -> Vec<Notice> {
        let mut notices = Vec::new();

        for pod in pods {
            if reap && pod.phase == PodPhase::Succeeded {
                let result = api.delete_pod(&pod.namespace, &pod.name).await;
                let notice = match result {
                    Ok(()) => Notice::Reaped { pod: pod.name },
                    Err(e) => Notice::ReapFailed {
                        pod: pod.name,
                        error: e.to_string(),
                    },
                };
                notices.push(notice);
                continue;
            }

            self.census.set(&pod.name, is_ready(&pod.conditions));

            let repo = self.extractor.pod_identity(&pod);
            let version = repo_version(&pod);
            let team = pod.team();
            if repo.is_empty() || version.is_empty() {
                notices.push(Notice::IncompleteAnnotations {
                    pod: pod.name.clone(),
                    team: team.to_string(),
                    repo: repo.clone(),
                    version: version.to_string(),
                });
            }
            self.versions.record(&repo, version, team);
        }

        notices
    }

    /// Replayed adds for known pods are ignored.
    pub fn on_add(&mut self, pod: &PodSnapshot) -> Option<Notice> {
        let ready = is_ready(&pod.conditions);
        if !self.census.insert_if_absent(&pod.name, ready) {
            debug!(pod = %pod.name, "ignoring add for known pod");
            return None;
        }
        Some(Notice::Added {
            pod: pod.name.clone(),
            ready,
            total: self.census.len(),
        })
    }

    /// Reports at most one notice per update. A pod becoming ready wins over
    /// a phase change delivered in the same update.
    pub fn on_update(&mut self, old: &PodSnapshot, new: &PodSnapshot) -> Option<Notice> {
        if !self.census.is_ready(&new.name) && is_ready(&new.conditions) {
            return Some(self.mark_ready(new));
        }
        phase_change(old, new)
    }

    pub fn on_delete(&mut self, deleted: &DeletedPod) -> Notice {
        let pod = deleted.pod();
        self.census.remove(&pod.name);
        Notice::Deleted {
            pod: pod.name.clone(),
            team: pod.team().to_string(),
            total: self.census.len(),
            health: self.count_health(),
        }
    }

    fn mark_ready(&mut self, pod: &PodSnapshot) -> Notice {
        self.census.set(&pod.name, true);
        let health = self.count_health();

        let repo = self.extractor.pod_identity(pod);
        let baseline = self.versions.version(&repo);
        let version = repo_version(pod);

        if !baseline.is_empty() && !version.is_empty() && baseline != version {
            let notice = Notice::RepositoryUpdated {
                pod: pod.name.clone(),
                team: pod.team().to_string(),
                repo: repo.clone(),
                from: baseline.to_string(),
                to: version.to_string(),
                health,
            };
            self.versions.set_version(&repo, version);
            notice
        } else {
            Notice::MeetsAllCriteria {
                pod: pod.name.clone(),
                health,
            }
        }
    }
}

fn phase_change(old: &PodSnapshot, new: &PodSnapshot) -> Option<Notice> {
    if old.phase == new.phase {
        return None;
    }
    match new.phase {
        PodPhase::Failed => Some(Notice::Failed {
            namespace: new.namespace.clone(),
            pod: new.name.clone(),
        }),
        PodPhase::Succeeded => Some(Notice::Succeeded {
            pod: new.name.clone(),
            from: old.phase,
            to: new.phase,
        }),
        // still starting up; not ready yet is expected
        PodPhase::Running => None,
        _ => Some(Notice::UnhandledPhase {
            pod: new.name.clone(),
            from: old.phase,
            to: new.phase,
        }),
    }
}
