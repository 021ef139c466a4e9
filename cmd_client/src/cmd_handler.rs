use client_lib::SandboxConnection;
use log::info;
use serde_json::to_string_pretty;
use uuid::Uuid;

use crate::commands::Command;
use crate::utils::{container_config, read_project_files};

pub struct CommandHandler {
    connection: SandboxConnection,
}

impl CommandHandler {
    pub fn new(connection: SandboxConnection) -> Self {
        Self { connection }
    }

    pub async fn handle_command(&mut self, command: Command) -> Result<(), anyhow::Error> {
        match command {
            Command::CreateProject(args) => {
                let project_id = args.project_id.unwrap_or_else(Uuid::new_v4);
                let files = read_project_files(&args.files, args.language.as_deref())?;
                let config = container_config(args.config)?;
                self.connection
                    .create_project(project_id, args.language, files, config, args.provision)
                    .await?;
                info!("Created project: {project_id}");
            }
            Command::CreateContainer(args) => {
                let files = if args.files.is_empty() {
                    None
                } else {
                    Some(read_project_files(&args.files, None)?)
                };
                let description = self
                    .connection
                    .create_container(args.project_id, files, container_config(args.config)?)
                    .await?;
                println!("{}", to_string_pretty(&description)?);
            }
            Command::StartContainer(args) => {
                let description = self.connection.start_container(args.project_id).await?;
                println!("{}", to_string_pretty(&description)?);
            }
            Command::StopContainer(args) => {
                let description = self.connection.stop_container(args.project_id).await?;
                println!("{}", to_string_pretty(&description)?);
            }
            Command::RestartContainer(args) => {
                let description = self.connection.restart_container(args.project_id).await?;
                println!("{}", to_string_pretty(&description)?);
            }
            Command::Status(args) => {
                let report = self.connection.container_status(args.project_id).await?;
                println!("{}", to_string_pretty(&report)?);
            }
            Command::Logs(args) => {
                let logs = self
                    .connection
                    .container_logs(args.project_id, args.tail_lines)
                    .await?;
                println!("{logs}");
            }
            Command::DeleteContainer(args) => {
                let report = self.connection.delete_container(args.project_id).await?;
                println!("{}", to_string_pretty(&report)?);
            }
            Command::UpdateFiles(args) => {
                let files = read_project_files(&args.files, None)?;
                let summary = self
                    .connection
                    .update_files(args.project_id, files)
                    .await?;
                println!("{}", to_string_pretty(&summary)?);
            }
            Command::Inspect(args) => {
                let description = self.connection.inspect_project(args.project_id).await?;
                println!("{}", to_string_pretty(&description)?);
            }
            Command::List => {
                let descriptions = self.connection.list_projects().await?;
                println!("{}", to_string_pretty(&descriptions)?);
            }
            Command::RemoveProject(args) => {
                let report = self.connection.remove_project(args.project_id).await?;
                println!("{}", to_string_pretty(&report)?);
            }
        }
        Ok(())
    }
}
