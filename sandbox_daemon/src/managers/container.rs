use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sandbox_client::resources::{ConfigMapSummary, DeletionReport, ResourceKind, ResourcesSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::cluster::ClusterError;
use super::container_configuration::{ContainerConfig, ProjectFile};
use super::naming::ResourceNames;
use super::status_aggregator::StatusReport;

#[derive(Debug, Error, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum ContainerError {
    #[error("Container resources don't exist for project: {0}")]
    NotProvisioned(Uuid),
    #[error("Operation on {kind} of project {project_id} failed: {source}")]
    ClusterOperation {
        kind: ResourceKind,
        project_id: Uuid,
        source: ClusterError,
    },
    #[error("Container restarted, but stopping it failed: {0}")]
    RestartStopFail(String),
    #[error("Container couldn't be started during restart: {0}")]
    RestartStartFail(String),
    #[error("Failed to save project record: {0}")]
    RecordSave(String),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub enum State {
    NotCreated,
    Creating,
    Running,
    Stopped,
    Deleted,
    Unknown,
    Error(String),
}

/// What the daemon last knew about the cluster objects of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub project_id: Uuid,
    pub deployment_name: Option<String>,
    pub service_name: Option<String>,
    pub pvc_name: Option<String>,
    pub configmap_name: Option<String>,
    pub container_image: Option<String>,
    pub container_port: Option<u16>,
    pub running: bool,
    pub status: State,
    pub created_at: Option<DateTime<Utc>>,
    pub last_started_at: Option<DateTime<Utc>>,
    pub resources_snapshot: Option<ResourcesSnapshot>,
}

impl ContainerRecord {
    pub fn new(project_id: Uuid) -> Self {
        Self {
            project_id,
            deployment_name: None,
            service_name: None,
            pvc_name: None,
            configmap_name: None,
            container_image: None,
            container_port: None,
            running: false,
            status: State::NotCreated,
            created_at: None,
            last_started_at: None,
            resources_snapshot: None,
        }
    }

    /// Sets all four resource names at once, or clears all of them.
    pub fn assign_names(&mut self, names: Option<&ResourceNames>) {
        self.deployment_name = names.map(|names| names.deployment.clone());
        self.service_name = names.map(|names| names.service.clone());
        self.pvc_name = names.map(|names| names.pvc.clone());
        self.configmap_name = names.map(|names| names.configmap.clone());
    }

    pub fn is_provisioned(&self) -> bool {
        self.deployment_name.is_some()
    }
}

/// Persisted document of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub language: Option<String>,
    pub files: Vec<ProjectFile>,
    pub container: ContainerRecord,
}

impl ProjectRecord {
    pub fn new(project_id: Uuid, language: Option<String>, files: Vec<ProjectFile>) -> Self {
        Self {
            language,
            files,
            container: ContainerRecord::new(project_id),
        }
    }
}

#[async_trait]
pub trait ProjectContainer {
    async fn create(
        &mut self,
        files: Option<Vec<ProjectFile>>,
        config: ContainerConfig,
    ) -> Result<(), ContainerError>;
    async fn start(&mut self) -> Result<(), ContainerError>;
    async fn stop(&mut self) -> Result<(), ContainerError>;
    async fn restart(&mut self) -> Result<(), ContainerError>;
    async fn delete(&mut self) -> DeletionReport;
    async fn status(&mut self) -> StatusReport;
    async fn logs(&self, tail_lines: Option<u32>) -> String;
    async fn update_files(
        &mut self,
        files: Vec<ProjectFile>,
    ) -> Result<ConfigMapSummary, ContainerError>;
    fn get_record(&self) -> ProjectRecord;
}

#[cfg(test)]
mod test {
    use super::{ContainerRecord, State};
    use crate::managers::naming::ResourceNames;
    use crate::utils::test_utilities::create_example_uuid;

    #[test]
    fn new_record() {
        let record = ContainerRecord::new(create_example_uuid());
        assert_eq!(record.status, State::NotCreated);
        assert!(!record.running);
        assert!(!record.is_provisioned());
    }

    #[test]
    fn names_assigned_together() {
        let mut record = ContainerRecord::new(create_example_uuid());
        let names = ResourceNames::for_project(&create_example_uuid());
        record.assign_names(Some(&names));
        assert_eq!(record.deployment_name.as_ref(), Some(&names.deployment));
        assert_eq!(record.service_name.as_ref(), Some(&names.service));
        assert_eq!(record.pvc_name.as_ref(), Some(&names.pvc));
        assert_eq!(record.configmap_name.as_ref(), Some(&names.configmap));
        record.assign_names(None);
        assert!(record.deployment_name.is_none());
        assert!(record.service_name.is_none());
        assert!(record.pvc_name.is_none());
        assert!(record.configmap_name.is_none());
    }
}
