use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::container::{ContainerConfig, ContainerDescription, ProjectFile, StatusReport};
use crate::resources::{ConfigMapSummary, DeletionReport};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SandboxCommand {
    CreateProject {
        project_id: Uuid,
        language: Option<String>,
        files: Vec<ProjectFile>,
        config: ContainerConfig,
        provision: bool,
    },
    CreateContainer {
        project_id: Uuid,
        files: Option<Vec<ProjectFile>>,
        config: ContainerConfig,
    },
    StartContainer {
        project_id: Uuid,
    },
    StopContainer {
        project_id: Uuid,
    },
    RestartContainer {
        project_id: Uuid,
    },
    ContainerStatus {
        project_id: Uuid,
    },
    ContainerLogs {
        project_id: Uuid,
        tail_lines: Option<u32>,
    },
    DeleteContainer {
        project_id: Uuid,
    },
    UpdateFiles {
        project_id: Uuid,
        files: Vec<ProjectFile>,
    },
    InspectProject {
        project_id: Uuid,
    },
    ListProjects,
    RemoveProject {
        project_id: Uuid,
    },
}

#[derive(Debug, Error, Clone, Serialize, Deserialize, PartialEq)]
pub enum SandboxDaemonError {
    #[error("Failed to read request.")]
    ReadingRequestFail,
    #[error("Can't recognise a command.")]
    UnknownCommand,
    #[error("Container resources don't exist for project: {project_id}")]
    NotProvisioned { project_id: Uuid },
    #[error("Error occured: {message}")]
    SandboxDaemonFail { message: String },
    #[error("Failed to send response.")]
    SendingResponseFail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SandboxResponse {
    Ok,
    Created { description: ContainerDescription },
    Updated { description: ContainerDescription },
    Status { report: StatusReport },
    Logs { logs: String },
    Deleted { report: DeletionReport },
    FilesUpdated { summary: ConfigMapSummary },
    Inspected { description: ContainerDescription },
    Listed { descriptions: Vec<ContainerDescription> },
    Error { sandbox_error: SandboxDaemonError },
}
