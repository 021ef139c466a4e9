use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolumeClaim, Pod, Service};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum ClusterError {
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Resource already exists: {0}")]
    Conflict(String),
    #[error("Cluster is unavailable: {0}")]
    Unavailable(String),
    #[error("Cluster request timed out.")]
    Timeout,
    #[error("Cluster rejected the request ({code}): {message}")]
    Api { code: u16, message: String },
    #[error("Unexpected cluster error: {0}")]
    Unknown(String),
}

impl ClusterError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClusterError::Unavailable(_) | ClusterError::Timeout)
    }
}

/// Namespaced operations on the four resource kinds a project owns, plus its pods.
#[async_trait]
pub trait ClusterClient {
    async fn create_pvc(
        &self,
        pvc: PersistentVolumeClaim,
    ) -> Result<PersistentVolumeClaim, ClusterError>;
    async fn get_pvc(&self, name: &str) -> Result<PersistentVolumeClaim, ClusterError>;
    async fn delete_pvc(&self, name: &str) -> Result<(), ClusterError>;

    async fn create_config_map(&self, config_map: ConfigMap) -> Result<ConfigMap, ClusterError>;
    async fn get_config_map(&self, name: &str) -> Result<ConfigMap, ClusterError>;
    async fn replace_config_map(&self, config_map: ConfigMap)
        -> Result<ConfigMap, ClusterError>;
    async fn delete_config_map(&self, name: &str) -> Result<(), ClusterError>;

    async fn create_deployment(&self, deployment: Deployment)
        -> Result<Deployment, ClusterError>;
    async fn get_deployment(&self, name: &str) -> Result<Deployment, ClusterError>;
    async fn replace_deployment(
        &self,
        deployment: Deployment,
    ) -> Result<Deployment, ClusterError>;
    async fn scale_deployment(&self, name: &str, replicas: i32) -> Result<(), ClusterError>;
    async fn delete_deployment(&self, name: &str) -> Result<(), ClusterError>;

    async fn create_service(&self, service: Service) -> Result<Service, ClusterError>;
    async fn get_service(&self, name: &str) -> Result<Service, ClusterError>;
    async fn delete_service(&self, name: &str) -> Result<(), ClusterError>;

    async fn list_pods(&self, label_selector: &str) -> Result<Vec<Pod>, ClusterError>;
    async fn pod_logs(&self, pod_name: &str, tail_lines: u32) -> Result<String, ClusterError>;
}

/// Turns a 404 into `None`, leaving every other outcome untouched.
pub fn optional<T>(result: Result<T, ClusterError>) -> Result<Option<T>, ClusterError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ClusterError::NotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}
