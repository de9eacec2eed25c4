//! Informer-style adapter over `kube::runtime::watcher`.
//!
//! The watcher only reports the latest state of an object. The cache kept
//! here remembers the last snapshot per pod so the stream can be replayed
//! as add / update(old, new) / delete notifications, with tombstones for
//! pods that vanished while the watch was re-listing.

pub mod watch;

use std::collections::{HashMap, HashSet};

use k8s_openapi::api::core::v1::Pod;
use kube::runtime::watcher;

use crate::reconciler::Reconciler;
use crate::report::Notice;
use crate::types::{DeletedPod, PodSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum PodEvent {
    Added(PodSnapshot),
    Updated { old: PodSnapshot, new: PodSnapshot },
    Deleted(DeletedPod),
}

impl PodEvent {
    pub fn name(&self) -> &str {
        match self {
            PodEvent::Added(pod) => &pod.name,
            PodEvent::Updated { new, .. } => &new.name,
            PodEvent::Deleted(deleted) => &deleted.pod().name,
        }
    }

    pub fn dispatch(&self, reconciler: &mut Reconciler) -> Option<Notice> {
        match self {
            PodEvent::Added(pod) => reconciler.on_add(pod),
            PodEvent::Updated { old, new } => reconciler.on_update(old, new),
            PodEvent::Deleted(deleted) => Some(reconciler.on_delete(deleted)),
        }
    }
}

#[derive(Debug, Default)]
pub struct InformerCache {
    namespace: String,
    pods: HashMap<String, PodSnapshot>,
}

impl InformerCache {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            pods: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pods.is_empty()
    }

    pub fn apply(&mut self, event: watcher::Event<Pod>) -> Vec<PodEvent> {
        match event {
            watcher::Event::Applied(pod) => vec![self.upsert(PodSnapshot::from(pod))],
            watcher::Event::Deleted(pod) => {
                let pod = PodSnapshot::from(pod);
                self.pods.remove(&pod.name);
                vec![PodEvent::Deleted(DeletedPod::Live(pod))]
            }
            watcher::Event::Restarted(pods) => {
                let listed: Vec<PodSnapshot> = pods.into_iter().map(PodSnapshot::from).collect();
                self.relist(listed)
            }
        }
    }

    /// Replays every cached pod as an update to itself.
    pub fn resync(&self) -> Vec<PodEvent> {
        let mut names: Vec<&String> = self.pods.keys().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| {
                let pod = &self.pods[name];
                PodEvent::Updated {
                    old: pod.clone(),
                    new: pod.clone(),
                }
            })
            .collect()
    }

    fn upsert(&mut self, pod: PodSnapshot) -> PodEvent {
        match self.pods.insert(pod.name.clone(), pod.clone()) {
            Some(old) => PodEvent::Updated { old, new: pod },
            None => PodEvent::Added(pod),
        }
    }

    fn relist(&mut self, listed: Vec<PodSnapshot>) -> Vec<PodEvent> {
        let present: HashSet<String> = listed.iter().map(|p| p.name.clone()).collect();

        let mut vanished: Vec<String> = self
            .pods
            .keys()
            .filter(|name| !present.contains(*name))
            .cloned()
            .collect();
        vanished.sort();

        let mut events = Vec::with_capacity(listed.len() + vanished.len());
        for name in vanished {
            if let Some(last_known) = self.pods.remove(&name) {
                events.push(PodEvent::Deleted(DeletedPod::Tombstone {
                    key: format!("{}/{}", self.namespace, name),
                    last_known,
                }));
            }
        }
        for pod in listed {
            events.push(self.upsert(pod));
        }
        events
    }
}
