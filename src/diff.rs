use std::collections::BTreeMap;
use std::fmt;

use crate::types::PodSnapshot;

/// One difference between two snapshots of the same pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Added { field: &'static str, key: String, value: String },
    Removed { field: &'static str, key: String, value: String },
    Changed { field: &'static str, key: String, old: String, new: String },
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldChange::Added { field, key, value } => write!(f, "+{}[{}]: {:?}", field, key, value),
            FieldChange::Removed { field, key, value } => write!(f, "-{}[{}]: {:?}", field, key, value),
            FieldChange::Changed { field, key, old, new } if key.is_empty() => {
                write!(f, "~{}: {:?} -> {:?}", field, old, new)
            }
            FieldChange::Changed { field, key, old, new } => {
                write!(f, "~{}[{}]: {:?} -> {:?}", field, key, old, new)
            }
        }
    }
}

/// Compares only what the reconciler reads: labels, annotations, phase and
/// conditions (keyed by type).
pub fn diff_pods(old: &PodSnapshot, new: &PodSnapshot) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    diff_maps("labels", &old.labels, &new.labels, &mut changes);
    diff_maps("annotations", &old.annotations, &new.annotations, &mut changes);

    if old.phase != new.phase {
        changes.push(FieldChange::Changed {
            field: "phase",
            key: String::new(),
            old: old.phase.to_string(),
            new: new.phase.to_string(),
        });
    }

    let conditions = |pod: &PodSnapshot| -> BTreeMap<String, String> {
        pod.conditions
            .iter()
            .map(|c| (c.type_.clone(), c.status.clone()))
            .collect()
    };
    diff_maps("conditions", &conditions(old), &conditions(new), &mut changes);

    changes
}

fn diff_maps(
    field: &'static str,
    old: &BTreeMap<String, String>,
    new: &BTreeMap<String, String>,
    changes: &mut Vec<FieldChange>,
) {
    for (key, old_value) in old {
        match new.get(key) {
            None => changes.push(FieldChange::Removed {
                field,
                key: key.clone(),
                value: old_value.clone(),
            }),
            Some(new_value) if new_value != old_value => changes.push(FieldChange::Changed {
                field,
                key: key.clone(),
                old: old_value.clone(),
                new: new_value.clone(),
            }),
            Some(_) => {}
        }
    }
    for (key, value) in new {
        if !old.contains_key(key) {
            changes.push(FieldChange::Added {
                field,
                key: key.clone(),
                value: value.clone(),
            });
        }
    }
}
