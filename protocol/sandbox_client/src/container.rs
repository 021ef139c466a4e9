use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resources::{
    ConfigMapSummary, DeploymentSummary, PodSummary, PvcSummary, ResourcesSnapshot,
    ServiceSummary,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContainerStatus {
    NotCreated,
    Creating,
    Running,
    Stopped,
    Deleted,
    Unknown,
    Error(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectFile {
    pub name: String,
    pub content: String,
    pub language: Option<String>,
}

/// Overrides applied on top of the language defaults when provisioning a container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerConfig {
    pub image: Option<String>,
    pub port: Option<u16>,
    pub command: Option<Vec<String>>,
    pub args: Option<Vec<String>>,
    pub env_vars: Option<Vec<EnvVar>>,
    pub cpu_limit: Option<String>,
    pub memory_limit: Option<String>,
    pub cpu_request: Option<String>,
    pub memory_request: Option<String>,
    pub storage_size: Option<String>,
    pub storage_class: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerDescription {
    pub project_id: Uuid,
    pub language: Option<String>,
    pub deployment_name: Option<String>,
    pub service_name: Option<String>,
    pub pvc_name: Option<String>,
    pub configmap_name: Option<String>,
    pub container_image: Option<String>,
    pub container_port: Option<u16>,
    pub running: bool,
    pub status: ContainerStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub last_started_at: Option<DateTime<Utc>>,
    pub resources: Option<ResourcesSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusReport {
    pub project_id: Uuid,
    pub exists: bool,
    pub running: bool,
    pub status: ContainerStatus,
    pub deployment: Option<DeploymentSummary>,
    pub service: Option<ServiceSummary>,
    pub pvc: Option<PvcSummary>,
    pub configmap: Option<ConfigMapSummary>,
    pub pods: Vec<PodSummary>,
    pub stale: bool,
    pub error: Option<String>,
}
