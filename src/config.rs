use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use crate::types::Config;

pub const DEFAULT_REPO_HOST: &str = "gitlab.example.com";
pub const DEFAULT_RESYNC_SECONDS: u64 = 30;

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn load_config() -> Result<Config> {
    load_config_with_env(&SystemEnvironment)
}

pub fn load_config_with_env<E: EnvironmentProvider>(env: &E) -> Result<Config> {
    let namespace = env
        .get_var("NAMESPACE")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("NAMESPACE env var must be set"))?;
    validate_namespace(&namespace)?;

    let kubeconfig_path = match env.get_var("KUBECONFIG_PATH").filter(|s| !s.trim().is_empty()) {
        Some(path) => {
            let path = PathBuf::from(path.trim());
            if !path.is_file() {
                return Err(anyhow!("KUBECONFIG_PATH {} does not exist", path.display()));
            }
            Some(path)
        }
        None => None,
    };

    let repo_host = env
        .get_var("REPO_HOST")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_REPO_HOST.to_string());

    let resync_seconds: u64 = env.get_var("RESYNC_SECONDS")
        .unwrap_or_else(|| DEFAULT_RESYNC_SECONDS.to_string())
        .trim()
        .parse()
        .unwrap_or(DEFAULT_RESYNC_SECONDS);
    let resync_interval = (resync_seconds > 0).then(|| Duration::from_secs(resync_seconds));

    let reap_succeeded = env.get_var("REAP_SUCCEEDED")
        .map(|v| parse_bool(&v))
        .unwrap_or(true);

    let log_pod_diff = env.get_var("LOG_POD_DIFF")
        .map(|v| parse_bool(&v))
        .unwrap_or(false);

    Ok(Config {
        namespace,
        kubeconfig_path,
        repo_host,
        resync_interval,
        reap_succeeded,
        log_pod_diff,
    })
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "True")
}

// RFC 1123 label, which is what the API server accepts for namespaces.
fn validate_namespace(namespace: &str) -> Result<()> {
    let valid = namespace.len() <= 63
        && namespace
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !namespace.starts_with('-')
        && !namespace.ends_with('-');
    if valid {
        Ok(())
    } else {
        Err(anyhow!("NAMESPACE {:?} is not a valid namespace name", namespace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_loading_with_env() {
        let mut kubeconfig = tempfile::NamedTempFile::new().unwrap();
        writeln!(kubeconfig, "apiVersion: v1").unwrap();

        let env = MockEnvironment::new()
            .with_var("NAMESPACE", "deploy-int")
            .with_var("KUBECONFIG_PATH", kubeconfig.path().to_string_lossy())
            .with_var("REPO_HOST", "git.internal.example")
            .with_var("RESYNC_SECONDS", "10")
            .with_var("REAP_SUCCEEDED", "false")
            .with_var("LOG_POD_DIFF", "true");

        let config = load_config_with_env(&env).unwrap();

        assert_eq!(config.namespace, "deploy-int");
        assert_eq!(config.kubeconfig_path.as_deref(), Some(kubeconfig.path()));
        assert_eq!(config.repo_host, "git.internal.example");
        assert_eq!(config.resync_interval, Some(Duration::from_secs(10)));
        assert!(!config.reap_succeeded);
        assert!(config.log_pod_diff);
    }

    #[test]
    fn test_config_loading_defaults() {
        let env = MockEnvironment::new().with_var("NAMESPACE", "default");

        let config = load_config_with_env(&env).unwrap();

        assert_eq!(config.namespace, "default");
        assert_eq!(config.kubeconfig_path, None);
        assert_eq!(config.repo_host, DEFAULT_REPO_HOST);
        assert_eq!(config.resync_interval, Some(Duration::from_secs(30)));
        assert!(config.reap_succeeded);
        assert!(!config.log_pod_diff);
    }

    #[test]
    fn test_config_loading_missing_namespace() {
        let result = load_config_with_env(&MockEnvironment::new());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("NAMESPACE"));

        let env = MockEnvironment::new().with_var("NAMESPACE", "   ");
        assert!(load_config_with_env(&env).is_err());
    }

    #[test]
    fn test_config_loading_missing_kubeconfig_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config");
        let env = MockEnvironment::new()
            .with_var("NAMESPACE", "default")
            .with_var("KUBECONFIG_PATH", missing.to_string_lossy());

        let result = load_config_with_env(&env);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("KUBECONFIG_PATH"));
    }

    #[test]
    fn test_resync_parsing() {
        let env = MockEnvironment::new()
            .with_var("NAMESPACE", "default")
            .with_var("RESYNC_SECONDS", "0");
        assert_eq!(load_config_with_env(&env).unwrap().resync_interval, None);

        // invalid values fall back to the default
        let env = MockEnvironment::new()
            .with_var("NAMESPACE", "default")
            .with_var("RESYNC_SECONDS", "soon");
        assert_eq!(
            load_config_with_env(&env).unwrap().resync_interval,
            Some(Duration::from_secs(DEFAULT_RESYNC_SECONDS))
        );
    }

    #[test]
    fn test_boolean_parsing() {
        for val in ["1", "true", "TRUE", "True"] {
            let env = MockEnvironment::new()
                .with_var("NAMESPACE", "test")
                .with_var("LOG_POD_DIFF", val);
            assert!(load_config_with_env(&env).unwrap().log_pod_diff, "Failed for value: {}", val);
        }

        for val in ["0", "false", "FALSE", "False", "no", "off", ""] {
            let env = MockEnvironment::new()
                .with_var("NAMESPACE", "test")
                .with_var("REAP_SUCCEEDED", val);
            assert!(!load_config_with_env(&env).unwrap().reap_succeeded, "Failed for value: {}", val);
        }
    }

    #[test]
    fn test_namespace_name_validation() {
        assert!(validate_namespace("riplf-test-int").is_ok());
        assert!(validate_namespace("-leading").is_err());
        assert!(validate_namespace(&"a".repeat(64)).is_err());

        let env = MockEnvironment::new().with_var("NAMESPACE", "Bad_Name");
        let result = load_config_with_env(&env);
        assert!(result.unwrap_err().to_string().contains("NAMESPACE"));
    }
}
