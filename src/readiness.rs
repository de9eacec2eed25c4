use crate::types::ConditionSnapshot;

const READY: &str = "Ready";
const CONTAINERS_READY: &str = "ContainersReady";
const TRUE: &str = "True";

/// A pod counts as ready when `Ready` is `True`, or failing that when
/// `ContainersReady` is `True`. Some pods report container readiness
/// without ever publishing an aggregate `Ready` condition.
pub fn is_ready(conditions: &[ConditionSnapshot]) -> bool {
    has_true_condition(conditions, READY) || has_true_condition(conditions, CONTAINERS_READY)
}

fn has_true_condition(conditions: &[ConditionSnapshot], type_: &str) -> bool {
    conditions
        .iter()
        .any(|c| c.type_ == type_ && c.status == TRUE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(list: &[(&str, &str)]) -> Vec<ConditionSnapshot> {
        list.iter().map(|(t, s)| ConditionSnapshot::new(*t, *s)).collect()
    }

    #[test]
    fn test_ready_condition() {
        assert!(is_ready(&conditions(&[("Ready", "True")])));
        assert!(is_ready(&conditions(&[("PodScheduled", "True"), ("Ready", "True")])));
    }

    #[test]
    fn test_containers_ready_fallback() {
        assert!(is_ready(&conditions(&[("Ready", "False"), ("ContainersReady", "True")])));
        assert!(is_ready(&conditions(&[("ContainersReady", "True")])));
    }

    #[test]
    fn test_not_ready() {
        assert!(!is_ready(&[]));
        assert!(!is_ready(&conditions(&[("Ready", "False"), ("ContainersReady", "False")])));
        assert!(!is_ready(&conditions(&[("Ready", "Unknown")])));
        assert!(!is_ready(&conditions(&[("PodScheduled", "True"), ("Initialized", "True")])));
    }
}
