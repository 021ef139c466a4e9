use std::path::PathBuf;

use sandbox_client::{
    client::{SandboxCommand, SandboxResponse},
    container::{ContainerConfig, ContainerDescription, ProjectFile, StatusReport},
    resources::{ConfigMapSummary, DeletionReport},
};
use tokio::net::UnixStream;
use utils::serde::json_framed::JsonFramed;
use uuid::Uuid;

use crate::sandbox_client_error::SandboxClientError;

pub type Communicator = JsonFramed<UnixStream, SandboxResponse, SandboxCommand>;

pub async fn create_project(
    communicator: &mut Communicator,
    project_id: Uuid,
    language: Option<String>,
    files: Vec<ProjectFile>,
    config: ContainerConfig,
    provision: bool,
) -> Result<(), SandboxClientError> {
    match communicate(
        communicator,
        SandboxCommand::CreateProject {
            project_id,
            language,
            files,
            config,
            provision,
        },
    )
    .await?
    {
        SandboxResponse::Ok => Ok(()),
        response => Err(handle_error_response(response)),
    }
}

pub async fn create_container(
    communicator: &mut Communicator,
    project_id: Uuid,
    files: Option<Vec<ProjectFile>>,
    config: ContainerConfig,
) -> Result<ContainerDescription, SandboxClientError> {
    match communicate(
        communicator,
        SandboxCommand::CreateContainer {
            project_id,
            files,
            config,
        },
    )
    .await?
    {
        SandboxResponse::Created { description } => Ok(description),
        response => Err(handle_error_response(response)),
    }
}

pub async fn start_container(
    communicator: &mut Communicator,
    project_id: Uuid,
) -> Result<ContainerDescription, SandboxClientError> {
    match communicate(communicator, SandboxCommand::StartContainer { project_id }).await? {
        SandboxResponse::Updated { description } => Ok(description),
        response => Err(handle_error_response(response)),
    }
}

pub async fn stop_container(
    communicator: &mut Communicator,
    project_id: Uuid,
) -> Result<ContainerDescription, SandboxClientError> {
    match communicate(communicator, SandboxCommand::StopContainer { project_id }).await? {
        SandboxResponse::Updated { description } => Ok(description),
        response => Err(handle_error_response(response)),
    }
}

pub async fn restart_container(
    communicator: &mut Communicator,
    project_id: Uuid,
) -> Result<ContainerDescription, SandboxClientError> {
    match communicate(communicator, SandboxCommand::RestartContainer { project_id }).await? {
        SandboxResponse::Updated { description } => Ok(description),
        response => Err(handle_error_response(response)),
    }
}

pub async fn container_status(
    communicator: &mut Communicator,
    project_id: Uuid,
) -> Result<StatusReport, SandboxClientError> {
    match communicate(communicator, SandboxCommand::ContainerStatus { project_id }).await? {
        SandboxResponse::Status { report } => Ok(report),
        response => Err(handle_error_response(response)),
    }
}

pub async fn container_logs(
    communicator: &mut Communicator,
    project_id: Uuid,
    tail_lines: Option<u32>,
) -> Result<String, SandboxClientError> {
    match communicate(
        communicator,
        SandboxCommand::ContainerLogs {
            project_id,
            tail_lines,
        },
    )
    .await?
    {
        SandboxResponse::Logs { logs } => Ok(logs),
        response => Err(handle_error_response(response)),
    }
}

pub async fn delete_container(
    communicator: &mut Communicator,
    project_id: Uuid,
) -> Result<DeletionReport, SandboxClientError> {
    match communicate(communicator, SandboxCommand::DeleteContainer { project_id }).await? {
        SandboxResponse::Deleted { report } => Ok(report),
        response => Err(handle_error_response(response)),
    }
}

pub async fn update_files(
    communicator: &mut Communicator,
    project_id: Uuid,
    files: Vec<ProjectFile>,
) -> Result<ConfigMapSummary, SandboxClientError> {
    match communicate(communicator, SandboxCommand::UpdateFiles { project_id, files }).await? {
        SandboxResponse::FilesUpdated { summary } => Ok(summary),
        response => Err(handle_error_response(response)),
    }
}

pub async fn inspect_project(
    communicator: &mut Communicator,
    project_id: Uuid,
) -> Result<ContainerDescription, SandboxClientError> {
    match communicate(communicator, SandboxCommand::InspectProject { project_id }).await? {
        SandboxResponse::Inspected { description } => Ok(description),
        response => Err(handle_error_response(response)),
    }
}

pub async fn list_projects(
    communicator: &mut Communicator,
) -> Result<Vec<ContainerDescription>, SandboxClientError> {
    match communicate(communicator, SandboxCommand::ListProjects).await? {
        SandboxResponse::Listed { descriptions } => Ok(descriptions),
        response => Err(handle_error_response(response)),
    }
}

pub async fn remove_project(
    communicator: &mut Communicator,
    project_id: Uuid,
) -> Result<DeletionReport, SandboxClientError> {
    match communicate(communicator, SandboxCommand::RemoveProject { project_id }).await? {
        SandboxResponse::Deleted { report } => Ok(report),
        response => Err(handle_error_response(response)),
    }
}

pub async fn connect_to_sandbox_socket(
    sandbox_socket_path: PathBuf,
) -> Result<UnixStream, SandboxClientError> {
    UnixStream::connect(&sandbox_socket_path)
        .await
        .map_err(|err| SandboxClientError::ConnectionFailed {
            socket_path: sandbox_socket_path,
            details: err,
        })
}

async fn communicate(
    communicator: &mut Communicator,
    command: SandboxCommand,
) -> Result<SandboxResponse, SandboxClientError> {
    communicator
        .request(command)
        .await
        .map_err(SandboxClientError::CommunicationFail)
}

fn handle_error_response(response: SandboxResponse) -> SandboxClientError {
    match response {
        SandboxResponse::Error { sandbox_error } => {
            SandboxClientError::SandboxOperationFail(sandbox_error)
        }
        response => SandboxClientError::InvalidResponse { response },
    }
}
