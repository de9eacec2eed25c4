use std::collections::HashMap;

use crate::types::HealthCounts;

/// Pod name -> readiness for every pod observed and not yet deleted.
#[derive(Debug, Default, Clone)]
pub struct CensusTable {
    pods: HashMap<String, bool>,
}

impl CensusTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pods.contains_key(name)
    }

    /// Absent names read as not ready.
    pub fn is_ready(&self, name: &str) -> bool {
        self.pods.get(name).copied().unwrap_or(false)
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.pods.get(name).copied()
    }

    pub fn set(&mut self, name: &str, ready: bool) {
        self.pods.insert(name.to_string(), ready);
    }

    /// Inserts only when absent. Returns whether the entry was new.
    pub fn insert_if_absent(&mut self, name: &str, ready: bool) -> bool {
        if self.pods.contains_key(name) {
            return false;
        }
        self.pods.insert(name.to_string(), ready);
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<bool> {
        self.pods.remove(name)
    }

    pub fn len(&self) -> usize {
        self.pods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pods.is_empty()
    }

    pub fn count_health(&self) -> HealthCounts {
        let healthy = self.pods.values().filter(|ready| **ready).count();
        HealthCounts {
            healthy,
            unhealthy: self.pods.len() - healthy,
        }
    }
}

/// Repository identity -> last observed version and owning team.
/// Entries live for the whole process.
#[derive(Debug, Default, Clone)]
pub struct VersionTable {
    versions: HashMap<String, String>,
    teams: HashMap<String, String>,
}

impl VersionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, repo: &str, version: &str, team: &str) {
        self.versions.insert(repo.to_string(), version.to_string());
        self.teams.insert(repo.to_string(), team.to_string());
    }

    pub fn set_version(&mut self, repo: &str, version: &str) {
        self.versions.insert(repo.to_string(), version.to_string());
    }

    /// Unknown repositories read as the empty version.
    pub fn version(&self, repo: &str) -> &str {
        self.versions.get(repo).map(String::as_str).unwrap_or("")
    }

    pub fn team(&self, repo: &str) -> Option<&str> {
        self.teams.get(repo).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_if_absent_is_idempotent() {
        let mut census = CensusTable::new();
        assert!(census.insert_if_absent("p1", false));
        assert!(!census.insert_if_absent("p1", true));
        assert_eq!(census.len(), 1);
        assert_eq!(census.get("p1"), Some(false));
    }

    #[test]
    fn test_count_health_partitions_table() {
        let mut census = CensusTable::new();
        assert_eq!(census.count_health(), HealthCounts::default());

        census.set("a", true);
        census.set("b", false);
        census.set("c", true);
        let counts = census.count_health();
        assert_eq!(counts, HealthCounts { healthy: 2, unhealthy: 1 });
        assert_eq!(counts.total(), census.len());

        census.remove("a");
        census.remove("missing");
        let counts = census.count_health();
        assert_eq!(counts, HealthCounts { healthy: 1, unhealthy: 1 });
        assert_eq!(counts.total(), census.len());
    }

    #[test]
    fn test_absent_pod_reads_not_ready() {
        let census = CensusTable::new();
        assert!(!census.is_ready("nobody"));
        assert!(!census.contains("nobody"));
    }

    #[test]
    fn test_version_table_record_and_overwrite() {
        let mut versions = VersionTable::new();
        assert_eq!(versions.version("team/repo"), "");
        assert_eq!(versions.team("team/repo"), None);

        versions.record("team/repo", "v1", "payments");
        assert_eq!(versions.version("team/repo"), "v1");
        assert_eq!(versions.team("team/repo"), Some("payments"));

        versions.set_version("team/repo", "v2");
        assert_eq!(versions.version("team/repo"), "v2");
        assert_eq!(versions.team("team/repo"), Some("payments"));
        assert_eq!(versions.len(), 1);
    }
}
