use sandbox_client::client::SandboxDaemonError;
use sandbox_client::container::ContainerStatus;

use super::client_command_handler::ClientError;
use crate::managers::{
    container::{ContainerError, ProjectRecord, State},
    container_configuration::{ContainerConfig, EnvVar, ProjectFile},
    status_aggregator::StatusReport,
};

impl From<sandbox_client::container::EnvVar> for EnvVar {
    fn from(value: sandbox_client::container::EnvVar) -> Self {
        Self {
            name: value.name,
            value: value.value,
        }
    }
}

impl From<sandbox_client::container::ProjectFile> for ProjectFile {
    fn from(value: sandbox_client::container::ProjectFile) -> Self {
        Self {
            name: value.name,
            content: value.content,
            language: value.language,
        }
    }
}

impl From<sandbox_client::container::ContainerConfig> for ContainerConfig {
    fn from(value: sandbox_client::container::ContainerConfig) -> Self {
        Self {
            image: value.image,
            port: value.port,
            command: value.command,
            args: value.args,
            env_vars: value
                .env_vars
                .map(|env_vars| env_vars.into_iter().map(|env| env.into()).collect()),
            cpu_limit: value.cpu_limit,
            memory_limit: value.memory_limit,
            cpu_request: value.cpu_request,
            memory_request: value.memory_request,
            storage_size: value.storage_size,
            storage_class: value.storage_class,
        }
    }
}

impl From<State> for ContainerStatus {
    fn from(state: State) -> Self {
        match state {
            State::NotCreated => ContainerStatus::NotCreated,
            State::Creating => ContainerStatus::Creating,
            State::Running => ContainerStatus::Running,
            State::Stopped => ContainerStatus::Stopped,
            State::Deleted => ContainerStatus::Deleted,
            State::Unknown => ContainerStatus::Unknown,
            State::Error(message) => ContainerStatus::Error(message),
        }
    }
}

impl From<ProjectRecord> for sandbox_client::container::ContainerDescription {
    fn from(record: ProjectRecord) -> Self {
        let container = record.container;
        Self {
            project_id: container.project_id,
            language: record.language,
            deployment_name: container.deployment_name,
            service_name: container.service_name,
            pvc_name: container.pvc_name,
            configmap_name: container.configmap_name,
            container_image: container.container_image,
            container_port: container.container_port,
            running: container.running,
            status: container.status.into(),
            created_at: container.created_at,
            last_started_at: container.last_started_at,
            resources: container.resources_snapshot,
        }
    }
}

impl From<StatusReport> for sandbox_client::container::StatusReport {
    fn from(report: StatusReport) -> Self {
        Self {
            project_id: report.project_id,
            exists: report.exists,
            running: report.running,
            status: report.status.into(),
            deployment: report.deployment,
            service: report.service,
            pvc: report.pvc,
            configmap: report.configmap,
            pods: report.pods,
            stale: report.stale,
            error: report.error,
        }
    }
}

impl From<ClientError> for SandboxDaemonError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ReadingRequestFail => SandboxDaemonError::ReadingRequestFail,
            ClientError::UnknownCommand => SandboxDaemonError::UnknownCommand,
            ClientError::SendingResponseFail => SandboxDaemonError::SendingResponseFail,
            ClientError::ContainerError(ContainerError::NotProvisioned(project_id)) => {
                SandboxDaemonError::NotProvisioned { project_id }
            }
            err => SandboxDaemonError::SandboxDaemonFail {
                message: err.to_string(),
            },
        }
    }
}
