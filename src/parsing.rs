use regex::Regex;

use crate::types::{PodSnapshot, CHART_REPO_VERSION_ANNOTATION, CODE_REPO_ANNOTATION, CODE_REPO_VERSION_ANNOTATION};

/// Canonicalizes `app/code-repo` values such as
/// `git@gitlab.example.com:team/repo.git` into `team/repo`.
#[derive(Debug, Clone)]
pub struct IdentityExtractor {
    host_prefix: Regex,
}

impl IdentityExtractor {
    pub fn new(host: &str) -> Result<Self, regex::Error> {
        let host_prefix = Regex::new(&format!("^git@{}[:/]+", regex::escape(host)))?;
        Ok(Self { host_prefix })
    }

    /// Strips the SSH host prefix and the first `.git`. Anything else,
    /// the empty string included, passes through unchanged.
    pub fn identity(&self, raw: &str) -> String {
        let stripped = self.host_prefix.replace(raw, "");
        stripped.replacen(".git", "", 1)
    }

    pub fn pod_identity(&self, pod: &PodSnapshot) -> String {
        self.identity(pod.annotation(CODE_REPO_ANNOTATION))
    }
}

/// The deployed version: the code repo version, or the chart version when
/// the former is missing or empty.
pub fn repo_version(pod: &PodSnapshot) -> &str {
    match pod.annotation(CODE_REPO_VERSION_ANNOTATION) {
        "" => pod.annotation(CHART_REPO_VERSION_ANNOTATION),
        version => version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PodPhase;

    fn extractor() -> IdentityExtractor {
        IdentityExtractor::new("gitlab.example.com").unwrap()
    }

    #[test]
    fn test_identity_strips_prefix_and_suffix() {
        let ex = extractor();
        assert_eq!(ex.identity("git@gitlab.example.com:team/repo.git"), "team/repo");
        assert_eq!(ex.identity("git@gitlab.example.com/team/repo.git"), "team/repo");
        assert_eq!(ex.identity("git@gitlab.example.com://team/repo"), "team/repo");
    }

    #[test]
    fn test_identity_passes_through_non_matching() {
        let ex = extractor();
        assert_eq!(ex.identity(""), "");
        assert_eq!(ex.identity("team/repo"), "team/repo");
        assert_eq!(ex.identity("git@github.com:team/repo"), "git@github.com:team/repo");
        // prefix only matches at the start
        assert_eq!(
            ex.identity("https://git@gitlab.example.com:team/repo"),
            "https://git@gitlab.example.com:team/repo"
        );
    }

    #[test]
    fn test_identity_strips_suffix_once() {
        let ex = extractor();
        assert_eq!(ex.identity("team/repo.git.git"), "team/repo.git");
        assert_eq!(ex.identity("team/my.github-repo"), "team/myhub-repo");
    }

    #[test]
    fn test_identity_host_is_literal() {
        let ex = extractor();
        // the dots in the host must not match arbitrary characters
        assert_eq!(ex.identity("git@gitlabXexampleXcom:team/repo"), "git@gitlabXexampleXcom:team/repo");
    }

    #[test]
    fn test_repo_version_fallback() {
        let pod = PodSnapshot::new("p", PodPhase::Running)
            .with_annotation(CHART_REPO_VERSION_ANNOTATION, "1.4.0");
        assert_eq!(repo_version(&pod), "1.4.0");

        let pod = pod.with_annotation(CODE_REPO_VERSION_ANNOTATION, "deadbeef");
        assert_eq!(repo_version(&pod), "deadbeef");

        let pod = PodSnapshot::new("p", PodPhase::Running)
            .with_annotation(CODE_REPO_VERSION_ANNOTATION, "")
            .with_annotation(CHART_REPO_VERSION_ANNOTATION, "2.0.1");
        assert_eq!(repo_version(&pod), "2.0.1");

        assert_eq!(repo_version(&PodSnapshot::new("p", PodPhase::Running)), "");
    }
}
