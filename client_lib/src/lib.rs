use std::path::PathBuf;

use request_handlers::{connect_to_sandbox_socket, Communicator};
use sandbox_client::{
    container::{ContainerConfig, ContainerDescription, ProjectFile, StatusReport},
    resources::{ConfigMapSummary, DeletionReport},
};
use sandbox_client_error::SandboxClientError;
use uuid::Uuid;

pub mod request_handlers;
pub mod sandbox_client_error;

/// Connection to the sandbox daemon's unix socket. Requests are answered one at a time
/// in the order they were sent.
pub struct SandboxConnection {
    communicator: Communicator,
}

impl SandboxConnection {
    pub async fn connect(sandbox_socket_path: PathBuf) -> Result<Self, SandboxClientError> {
        let stream = connect_to_sandbox_socket(sandbox_socket_path).await?;
        Ok(Self {
            communicator: Communicator::new(stream),
        })
    }

    /// Registers a project. With `provision` set the container is created in the
    /// background and this returns before it is ready.
    pub async fn create_project(
        &mut self,
        project_id: Uuid,
        language: Option<String>,
        files: Vec<ProjectFile>,
        config: ContainerConfig,
        provision: bool,
    ) -> Result<(), SandboxClientError> {
        request_handlers::create_project(
            &mut self.communicator,
            project_id,
            language,
            files,
            config,
            provision,
        )
        .await
    }

    pub async fn create_container(
        &mut self,
        project_id: Uuid,
        files: Option<Vec<ProjectFile>>,
        config: ContainerConfig,
    ) -> Result<ContainerDescription, SandboxClientError> {
        request_handlers::create_container(&mut self.communicator, project_id, files, config).await
    }

    pub async fn start_container(
        &mut self,
        project_id: Uuid,
    ) -> Result<ContainerDescription, SandboxClientError> {
        request_handlers::start_container(&mut self.communicator, project_id).await
    }

    pub async fn stop_container(
        &mut self,
        project_id: Uuid,
    ) -> Result<ContainerDescription, SandboxClientError> {
        request_handlers::stop_container(&mut self.communicator, project_id).await
    }

    pub async fn restart_container(
        &mut self,
        project_id: Uuid,
    ) -> Result<ContainerDescription, SandboxClientError> {
        request_handlers::restart_container(&mut self.communicator, project_id).await
    }

    pub async fn container_status(
        &mut self,
        project_id: Uuid,
    ) -> Result<StatusReport, SandboxClientError> {
        request_handlers::container_status(&mut self.communicator, project_id).await
    }

    pub async fn container_logs(
        &mut self,
        project_id: Uuid,
        tail_lines: Option<u32>,
    ) -> Result<String, SandboxClientError> {
        request_handlers::container_logs(&mut self.communicator, project_id, tail_lines).await
    }

    pub async fn delete_container(
        &mut self,
        project_id: Uuid,
    ) -> Result<DeletionReport, SandboxClientError> {
        request_handlers::delete_container(&mut self.communicator, project_id).await
    }

    pub async fn update_files(
        &mut self,
        project_id: Uuid,
        files: Vec<ProjectFile>,
    ) -> Result<ConfigMapSummary, SandboxClientError> {
        request_handlers::update_files(&mut self.communicator, project_id, files).await
    }

    pub async fn inspect_project(
        &mut self,
        project_id: Uuid,
    ) -> Result<ContainerDescription, SandboxClientError> {
        request_handlers::inspect_project(&mut self.communicator, project_id).await
    }

    pub async fn list_projects(&mut self) -> Result<Vec<ContainerDescription>, SandboxClientError> {
        request_handlers::list_projects(&mut self.communicator).await
    }

    pub async fn remove_project(
        &mut self,
        project_id: Uuid,
    ) -> Result<DeletionReport, SandboxClientError> {
        request_handlers::remove_project(&mut self.communicator, project_id).await
    }
}
