use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{DeleteParams, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig, KubeconfigError};
use kube::{Api, Client};
use thiserror::Error;

use crate::types::PodSnapshot;

#[derive(Debug, Error)]
pub enum PodApiError {
    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] KubeconfigError),

    #[error("failed to create Kubernetes client: {0}")]
    Client(#[source] kube::Error),

    #[error("failed to list pods in {namespace}: {source}")]
    List {
        namespace: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to delete pod {namespace}/{name}: {source}")]
    Delete {
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },
}

/// The slice of the cluster API the watcher needs.
#[async_trait]
pub trait PodApi: Send + Sync {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSnapshot>, PodApiError>;
    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), PodApiError>;
}

/// Builds a client from an explicit kubeconfig file, or infers one from the
/// environment (in-cluster service account or `~/.kube/config`).
pub async fn build_client(kubeconfig: Option<&Path>) -> Result<Client, PodApiError> {
    match kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path)?;
            let config = kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
            Client::try_from(config).map_err(PodApiError::Client)
        }
        None => Client::try_default().await.map_err(PodApiError::Client),
    }
}

/// Production implementation backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubePodApi {
    client: Client,
}

impl KubePodApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PodApi for KubePodApi {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSnapshot>, PodApiError> {
        let pod_api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pods = pod_api
            .list(&ListParams::default())
            .await
            .map_err(|source| PodApiError::List {
                namespace: namespace.to_string(),
                source,
            })?;
        Ok(pods.items.iter().map(PodSnapshot::from).collect())
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), PodApiError> {
        let pod_api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        pod_api
            .delete(name, &DeleteParams::default())
            .await
            .map_err(|source| PodApiError::Delete {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source,
            })?;
        Ok(())
    }
}

/// In-memory implementation for testing. Records every delete request and
/// rejects deletes for names registered with `fail_delete_of`.
#[derive(Debug, Default)]
pub struct MockPodApi {
    pods: Vec<PodSnapshot>,
    failing_deletes: Vec<String>,
    deleted: Mutex<Vec<(String, String)>>,
}

impl MockPodApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pod(mut self, pod: PodSnapshot) -> Self {
        self.pods.push(pod);
        self
    }

    pub fn fail_delete_of(mut self, name: &str) -> Self {
        self.failing_deletes.push(name.to_string());
        self
    }

    /// (namespace, name) of every delete request, in call order.
    pub fn delete_requests(&self) -> Vec<(String, String)> {
        self.deleted.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PodApi for MockPodApi {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSnapshot>, PodApiError> {
        Ok(self
            .pods
            .iter()
            .filter(|p| p.namespace.is_empty() || p.namespace == namespace)
            .cloned()
            .collect())
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), PodApiError> {
        if let Ok(mut deleted) = self.deleted.lock() {
            deleted.push((namespace.to_string(), name.to_string()));
        }
        if self.failing_deletes.iter().any(|n| n == name) {
            return Err(PodApiError::Delete {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source: kube::Error::Api(kube::error::ErrorResponse {
                    status: "Failure".to_string(),
                    message: format!("pods \"{}\" is forbidden", name),
                    reason: "Forbidden".to_string(),
                    code: 403,
                }),
            });
        }
        Ok(())
    }
}
