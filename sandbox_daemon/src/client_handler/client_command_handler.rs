use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info, trace};
use sandbox_client::client::{SandboxCommand, SandboxResponse};
use sandbox_client::container::ContainerConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{net::UnixStream, select};
use tokio_util::sync::CancellationToken;
use utils::serde::json_framed::{JsonFramed, JsonFramedError};
use uuid::Uuid;

use crate::managers::container::ContainerError;
use crate::managers::container_configuration::ProjectFile;
use crate::managers::sandbox::{ContainerHandle, Sandbox, SandboxError};

#[derive(Debug, Error, Serialize, Deserialize, PartialEq, PartialOrd)]
pub enum ClientError {
    #[error("Failed to read request.")]
    ReadingRequestFail,
    #[error("Can't recognise a command.")]
    UnknownCommand,
    #[error("Sandbox error occured: {0}")]
    SandboxError(#[from] SandboxError),
    #[error("Container error occured: {0}")]
    ContainerError(#[from] ContainerError),
    #[error("Failed to send response.")]
    SendingResponseFail,
}

#[async_trait]
pub trait Client {
    async fn handle_connection(
        sandbox: Arc<dyn Sandbox + Send + Sync>,
        socket: UnixStream,
        token: Arc<CancellationToken>,
    ) -> Result<(), ClientError>;
}

pub struct ClientHandler {
    sandbox: Arc<dyn Sandbox + Send + Sync>,
    connection: JsonFramed<UnixStream, SandboxCommand, SandboxResponse>,
    token: Arc<CancellationToken>,
}

impl ClientHandler {
    pub async fn handle_requests(&mut self) -> Result<(), ClientError> {
        loop {
            select! {
                request = self.connection.recv() => {
                    let response = match request {
                        Ok(command) => {
                            trace!("Received command: {:?}", command);
                            self.handle_command(command).await.unwrap_or_else(|err| {
                                error!("Error has occured while handling client command: {}", err);
                                SandboxResponse::Error { sandbox_error: err.into() }
                            })
                        }
                        Err(JsonFramedError::StreamIsClosed()) => break,
                        Err(JsonFramedError::SerdeReadError(err))
                            if err.kind() == io::ErrorKind::InvalidData =>
                        {
                            error!("Received malformed command: {}", err);
                            SandboxResponse::Error {
                                sandbox_error: ClientError::UnknownCommand.into(),
                            }
                        }
                        Err(err) => {
                            error!("Failed to read command: {}", err);
                            return Err(ClientError::ReadingRequestFail);
                        }
                    };
                    trace!("Sending response: {:?}", response);
                    self.connection
                        .send(response)
                        .await
                        .map_err(|_| ClientError::SendingResponseFail)?;
                }
                _ = self.token.cancelled() => {
                    break;
                }
            }
        }
        Ok(())
    }

    async fn handle_command(
        &mut self,
        command: SandboxCommand,
    ) -> Result<SandboxResponse, ClientError> {
        match command {
            SandboxCommand::CreateProject {
                project_id,
                language,
                files,
                config,
                provision,
            } => {
                info!("Creating project: {project_id}");
                let handle = self
                    .sandbox
                    .register_project(project_id, language, Self::into_files(files))
                    .await?;
                if provision {
                    Self::provision_in_background(project_id, handle, config).await;
                }
                info!("Project: {project_id} created");
                Ok(SandboxResponse::Ok)
            }
            SandboxCommand::CreateContainer {
                project_id,
                files,
                config,
            } => {
                info!("Creating container of project: {project_id}");
                let handle = self.get_project(&project_id).await?;
                let mut container = handle.lock().await;
                container
                    .create(files.map(Self::into_files), config.into())
                    .await?;
                info!("Container of project: {project_id} created");
                Ok(SandboxResponse::Created {
                    description: container.get_record().into(),
                })
            }
            SandboxCommand::StartContainer { project_id } => {
                info!("Starting container of project: {project_id}");
                let handle = self.get_project(&project_id).await?;
                let mut container = handle.lock().await;
                container.start().await?;
                Ok(SandboxResponse::Updated {
                    description: container.get_record().into(),
                })
            }
            SandboxCommand::StopContainer { project_id } => {
                info!("Stopping container of project: {project_id}");
                let handle = self.get_project(&project_id).await?;
                let mut container = handle.lock().await;
                container.stop().await?;
                Ok(SandboxResponse::Updated {
                    description: container.get_record().into(),
                })
            }
            SandboxCommand::RestartContainer { project_id } => {
                info!("Restarting container of project: {project_id}");
                let handle = self.get_project(&project_id).await?;
                let mut container = handle.lock().await;
                container.restart().await?;
                Ok(SandboxResponse::Updated {
                    description: container.get_record().into(),
                })
            }
            SandboxCommand::ContainerStatus { project_id } => {
                debug!("Reading status of project: {project_id}");
                let handle = self.get_project(&project_id).await?;
                let report = handle.lock().await.status().await;
                Ok(SandboxResponse::Status {
                    report: report.into(),
                })
            }
            SandboxCommand::ContainerLogs {
                project_id,
                tail_lines,
            } => {
                debug!("Reading logs of project: {project_id}");
                let handle = self.get_project(&project_id).await?;
                let logs = handle.lock().await.logs(tail_lines).await;
                Ok(SandboxResponse::Logs { logs })
            }
            SandboxCommand::DeleteContainer { project_id } => {
                info!("Deleting container of project: {project_id}");
                let handle = self.get_project(&project_id).await?;
                let report = handle.lock().await.delete().await;
                info!("Container of project: {project_id} deleted");
                Ok(SandboxResponse::Deleted { report })
            }
            SandboxCommand::UpdateFiles { project_id, files } => {
                info!("Updating files of project: {project_id}");
                let handle = self.get_project(&project_id).await?;
                let summary = handle
                    .lock()
                    .await
                    .update_files(Self::into_files(files))
                    .await?;
                Ok(SandboxResponse::FilesUpdated { summary })
            }
            SandboxCommand::InspectProject { project_id } => {
                debug!("Inspecting project: {project_id}");
                let record = self.sandbox.inspect_project(&project_id).await?;
                Ok(SandboxResponse::Inspected {
                    description: record.into(),
                })
            }
            SandboxCommand::ListProjects => {
                debug!("Listing projects");
                let descriptions = self
                    .sandbox
                    .list_projects()
                    .await
                    .into_iter()
                    .map(|record| record.into())
                    .collect();
                Ok(SandboxResponse::Listed { descriptions })
            }
            SandboxCommand::RemoveProject { project_id } => {
                info!("Removing project: {project_id}");
                let report = self.sandbox.remove_project(&project_id).await?;
                info!("Project: {project_id} removed");
                Ok(SandboxResponse::Deleted { report })
            }
        }
    }

    /// The project lock is taken before spawning, so later commands on the project
    /// wait for provisioning to finish.
    async fn provision_in_background(
        project_id: Uuid,
        handle: ContainerHandle,
        config: ContainerConfig,
    ) {
        let mut container = handle.lock_owned().await;
        tokio::spawn(async move {
            match container.create(None, config.into()).await {
                Ok(()) => info!("Background provisioning of project: {project_id} finished"),
                Err(err) => error!("Background provisioning of project: {project_id} failed: {err}"),
            }
        });
    }

    fn into_files(files: Vec<sandbox_client::container::ProjectFile>) -> Vec<ProjectFile> {
        files.into_iter().map(|file| file.into()).collect()
    }

    async fn get_project(&self, project_id: &Uuid) -> Result<ContainerHandle, ClientError> {
        Ok(self.sandbox.get_project(project_id).await?)
    }
}

#[async_trait]
impl Client for ClientHandler {
    async fn handle_connection(
        sandbox: Arc<dyn Sandbox + Send + Sync>,
        socket: UnixStream,
        token: Arc<CancellationToken>,
    ) -> Result<(), ClientError> {
        let mut handler = ClientHandler {
            sandbox,
            connection: JsonFramed::new(socket),
            token,
        };
        handler.handle_requests().await
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use parameterized::parameterized;
    use sandbox_client::client::{SandboxCommand, SandboxDaemonError, SandboxResponse};
    use sandbox_client::container::ContainerConfig;
    use sandbox_client::resources::{DeletionOutcome, ResourceKind};
    use tokio::net::UnixStream;
    use tokio::sync::Mutex;
    use tokio_util::sync::CancellationToken;
    use utils::serde::json_framed::JsonFramed;

    use super::{ClientError, ClientHandler};
    use crate::managers::container::ContainerError;
    use crate::managers::container::ProjectContainer;
    use crate::managers::sandbox::{ContainerHandle, SandboxError};
    use crate::utils::test_utilities::{
        create_example_config_map_summary, create_example_deletion_report,
        create_example_project_record, create_example_status_report, create_example_uuid,
        MockProjectContainer, MockSandbox,
    };

    fn create_example_container() -> MockProjectContainer {
        let mut container = MockProjectContainer::new();
        container.expect_create().returning(|_, _| Ok(()));
        container.expect_start().returning(|| Ok(()));
        container.expect_stop().returning(|| Ok(()));
        container.expect_restart().returning(|| Ok(()));
        container
            .expect_delete()
            .returning(create_example_deletion_report);
        container
            .expect_status()
            .returning(create_example_status_report);
        container
            .expect_logs()
            .returning(|_| String::from("hello"));
        container
            .expect_update_files()
            .returning(|_| Ok(create_example_config_map_summary()));
        container
            .expect_get_record()
            .returning(create_example_project_record);
        container
    }

    fn handle_of(container: MockProjectContainer) -> ContainerHandle {
        let container: Box<dyn ProjectContainer + Send + Sync> = Box::new(container);
        Arc::new(Mutex::new(container))
    }

    fn create_example_sandbox(container: MockProjectContainer) -> MockSandbox {
        let handle = handle_of(container);
        let mut sandbox = MockSandbox::new();
        let registered = handle.clone();
        sandbox
            .expect_register_project()
            .returning(move |_, _, _| Ok(registered.clone()));
        sandbox
            .expect_get_project()
            .returning(move |_| Ok(handle.clone()));
        sandbox
            .expect_inspect_project()
            .returning(|_| Ok(create_example_project_record()));
        sandbox
            .expect_list_projects()
            .returning(|| vec![create_example_project_record()]);
        sandbox
            .expect_remove_project()
            .returning(|_| Ok(create_example_deletion_report()));
        sandbox
    }

    fn create_client_handler(
        sandbox: Option<MockSandbox>,
    ) -> (
        JsonFramed<UnixStream, SandboxResponse, SandboxCommand>,
        ClientHandler,
    ) {
        let sandbox =
            sandbox.unwrap_or_else(|| create_example_sandbox(create_example_container()));
        let (client_socket, daemon_socket) = UnixStream::pair().unwrap();
        (
            JsonFramed::new(client_socket),
            ClientHandler {
                sandbox: Arc::new(sandbox),
                connection: JsonFramed::new(daemon_socket),
                token: Arc::new(CancellationToken::new()),
            },
        )
    }

    #[tokio::test]
    async fn handle_requests_and_disconnect() {
        let (mut client, mut client_handler) = create_client_handler(None);
        let task = tokio::spawn(async move {
            let response = client.request(SandboxCommand::ListProjects).await.unwrap();
            drop(client);
            response
        });
        assert_eq!(client_handler.handle_requests().await, Ok(()));
        assert_eq!(
            task.await.unwrap(),
            SandboxResponse::Listed {
                descriptions: vec![create_example_project_record().into()]
            }
        );
    }

    #[tokio::test]
    async fn handle_requests_token_cancellation() {
        let (_client, mut client_handler) = create_client_handler(None);
        client_handler.token.cancel();
        assert_eq!(client_handler.handle_requests().await, Ok(()));
    }

    #[tokio::test]
    async fn handle_requests_invalid_command() {
        let (client_socket, daemon_socket) = UnixStream::pair().unwrap();
        let mut client_handler = ClientHandler {
            sandbox: Arc::new(MockSandbox::new()),
            connection: JsonFramed::new(daemon_socket),
            token: Arc::new(CancellationToken::new()),
        };
        let task = tokio::spawn(async move {
            let mut client =
                JsonFramed::<UnixStream, SandboxResponse, serde_json::Value>::new(client_socket);
            let response = client.request(serde_json::json!({})).await.unwrap();
            drop(client);
            response
        });
        assert_eq!(client_handler.handle_requests().await, Ok(()));
        assert_eq!(
            task.await.unwrap(),
            SandboxResponse::Error {
                sandbox_error: SandboxDaemonError::UnknownCommand
            }
        );
    }

    #[tokio::test]
    #[parameterized(input = {
        (SandboxCommand::CreateProject { project_id: create_example_uuid(), language: None, files: vec![], config: ContainerConfig::default(), provision: false }, SandboxResponse::Ok),
        (SandboxCommand::CreateContainer { project_id: create_example_uuid(), files: None, config: ContainerConfig::default() }, SandboxResponse::Created { description: create_example_project_record().into() }),
        (SandboxCommand::StartContainer { project_id: create_example_uuid() }, SandboxResponse::Updated { description: create_example_project_record().into() }),
        (SandboxCommand::StopContainer { project_id: create_example_uuid() }, SandboxResponse::Updated { description: create_example_project_record().into() }),
        (SandboxCommand::RestartContainer { project_id: create_example_uuid() }, SandboxResponse::Updated { description: create_example_project_record().into() }),
        (SandboxCommand::ContainerStatus { project_id: create_example_uuid() }, SandboxResponse::Status { report: create_example_status_report().into() }),
        (SandboxCommand::ContainerLogs { project_id: create_example_uuid(), tail_lines: Some(10) }, SandboxResponse::Logs { logs: String::from("hello") }),
        (SandboxCommand::DeleteContainer { project_id: create_example_uuid() }, SandboxResponse::Deleted { report: create_example_deletion_report() }),
        (SandboxCommand::UpdateFiles { project_id: create_example_uuid(), files: vec![] }, SandboxResponse::FilesUpdated { summary: create_example_config_map_summary() }),
        (SandboxCommand::InspectProject { project_id: create_example_uuid() }, SandboxResponse::Inspected { description: create_example_project_record().into() }),
        (SandboxCommand::ListProjects, SandboxResponse::Listed { descriptions: vec![create_example_project_record().into()] }),
        (SandboxCommand::RemoveProject { project_id: create_example_uuid() }, SandboxResponse::Deleted { report: create_example_deletion_report() }),
    })]
    async fn handle_command(input: (SandboxCommand, SandboxResponse)) {
        let (command, response) = input;
        let (_client, mut client_handler) = create_client_handler(None);
        assert_eq!(client_handler.handle_command(command).await, Ok(response));
    }

    #[tokio::test]
    async fn create_project_provisions_in_background() {
        let mut container = MockProjectContainer::new();
        container.expect_create().times(1).returning(|_, _| Ok(()));
        let handle = handle_of(container);
        let registered = handle.clone();
        let mut sandbox = MockSandbox::new();
        sandbox
            .expect_register_project()
            .returning(move |_, _, _| Ok(registered.clone()));
        let (_client, mut client_handler) = create_client_handler(Some(sandbox));

        let response = client_handler
            .handle_command(SandboxCommand::CreateProject {
                project_id: create_example_uuid(),
                language: Some(String::from("python")),
                files: vec![],
                config: ContainerConfig::default(),
                provision: true,
            })
            .await;
        assert_eq!(response, Ok(SandboxResponse::Ok));
        // Blocks until the provisioning task releases the project.
        drop(handle.lock().await);
    }

    #[tokio::test]
    async fn operations_on_same_project_run_one_after_another() {
        let handle = handle_of(create_example_container());
        let shared = handle.clone();
        let mut sandbox = MockSandbox::new();
        sandbox
            .expect_get_project()
            .returning(move |_| Ok(shared.clone()));
        let (_client, mut client_handler) = create_client_handler(Some(sandbox));
        let command = SandboxCommand::StopContainer {
            project_id: create_example_uuid(),
        };

        let in_flight = handle.lock().await;
        assert!(tokio::time::timeout(
            Duration::from_millis(100),
            client_handler.handle_command(command.clone())
        )
        .await
        .is_err());
        drop(in_flight);
        assert!(matches!(
            client_handler.handle_command(command).await,
            Ok(SandboxResponse::Updated { .. })
        ));
    }

    #[tokio::test]
    async fn create_duplicate_project() {
        let mut sandbox = MockSandbox::new();
        sandbox
            .expect_register_project()
            .returning(|project_id, _, _| Err(SandboxError::ProjectAlreadyExists(project_id)));
        let (_client, mut client_handler) = create_client_handler(Some(sandbox));
        assert_eq!(
            client_handler
                .handle_command(SandboxCommand::CreateProject {
                    project_id: create_example_uuid(),
                    language: None,
                    files: vec![],
                    config: ContainerConfig::default(),
                    provision: false,
                })
                .await,
            Err(ClientError::SandboxError(SandboxError::ProjectAlreadyExists(
                create_example_uuid()
            )))
        );
    }

    #[tokio::test]
    async fn start_not_provisioned_container() {
        let mut container = MockProjectContainer::new();
        container
            .expect_start()
            .returning(|| Err(ContainerError::NotProvisioned(create_example_uuid())));
        let (mut client, mut client_handler) =
            create_client_handler(Some(create_example_sandbox(container)));
        let task = tokio::spawn(async move {
            let response = client
                .request(SandboxCommand::StartContainer {
                    project_id: create_example_uuid(),
                })
                .await
                .unwrap();
            drop(client);
            response
        });
        assert_eq!(client_handler.handle_requests().await, Ok(()));
        assert_eq!(
            task.await.unwrap(),
            SandboxResponse::Error {
                sandbox_error: SandboxDaemonError::NotProvisioned {
                    project_id: create_example_uuid()
                }
            }
        );
    }

    #[tokio::test]
    async fn missing_project() {
        let mut sandbox = MockSandbox::new();
        sandbox
            .expect_get_project()
            .returning(|project_id| Err(SandboxError::NoSuchProject(*project_id)));
        let (_client, mut client_handler) = create_client_handler(Some(sandbox));
        assert_eq!(
            client_handler
                .handle_command(SandboxCommand::ContainerStatus {
                    project_id: create_example_uuid()
                })
                .await,
            Err(ClientError::SandboxError(SandboxError::NoSuchProject(
                create_example_uuid()
            )))
        );
    }

    #[tokio::test]
    async fn delete_reports_every_kind() {
        let (_client, mut client_handler) = create_client_handler(None);
        let response = client_handler
            .handle_command(SandboxCommand::DeleteContainer {
                project_id: create_example_uuid(),
            })
            .await
            .unwrap();
        let SandboxResponse::Deleted { report } = response else {
            panic!("Unexpected response: {response:?}");
        };
        for kind in ResourceKind::ALL {
            assert_eq!(report.get(&kind), Some(&DeletionOutcome::Deleted));
        }
    }
}
