use std::sync::Arc;

use async_trait::async_trait;
use sandbox_client::resources::DeletionReport;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::container::{ProjectContainer, ProjectRecord};
use super::container_configuration::ProjectFile;

pub type ContainerHandle = Arc<Mutex<Box<dyn ProjectContainer + Send + Sync>>>;

#[derive(Error, Debug, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum SandboxError {
    #[error("Project with uuid: '{0}' doesn't exist.")]
    NoSuchProject(Uuid),
    #[error("Project with uuid: '{0}' already exists.")]
    ProjectAlreadyExists(Uuid),
    #[error("Failed to create project: {0}")]
    ProjectCreationFail(String),
    #[error("Can't remove the project: {0}")]
    RemoveFail(String),
}

/// Registry of projects. Implementations synchronize internally, lookups never wait
/// on a project that is busy.
#[async_trait]
pub trait Sandbox {
    async fn register_project(
        &self,
        project_id: Uuid,
        language: Option<String>,
        files: Vec<ProjectFile>,
    ) -> Result<ContainerHandle, SandboxError>;
    async fn get_project(&self, project_id: &Uuid) -> Result<ContainerHandle, SandboxError>;
    async fn inspect_project(&self, project_id: &Uuid) -> Result<ProjectRecord, SandboxError>;
    async fn list_projects(&self) -> Vec<ProjectRecord>;
    async fn remove_project(&self, project_id: &Uuid) -> Result<DeletionReport, SandboxError>;
}

#[async_trait]
pub trait ContainerCreator {
    async fn create_container(
        &self,
        project_id: Uuid,
        language: Option<String>,
        files: Vec<ProjectFile>,
    ) -> Result<Box<dyn ProjectContainer + Send + Sync>, SandboxError>;
    async fn load_container(
        &self,
        project_id: &Uuid,
    ) -> Result<Box<dyn ProjectContainer + Send + Sync>, SandboxError>;
    async fn clean_up_container(&self, project_id: &Uuid) -> Result<(), SandboxError>;
}
