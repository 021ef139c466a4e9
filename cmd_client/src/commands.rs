use std::path::PathBuf;

use clap::{Args, Subcommand};
use uuid::Uuid;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Registers a project, optionally provisioning its container in the background
    CreateProject(CreateProjectArgs),
    /// Provisions the container of a registered project
    CreateContainer(CreateContainerArgs),
    StartContainer(ProjectArgs),
    StopContainer(ProjectArgs),
    RestartContainer(ProjectArgs),
    Status(ProjectArgs),
    Logs(LogsArgs),
    /// Removes the cluster resources but keeps the project registered
    DeleteContainer(ProjectArgs),
    UpdateFiles(UpdateFilesArgs),
    Inspect(ProjectArgs),
    List,
    /// Removes the cluster resources and forgets the project
    RemoveProject(ProjectArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ProjectArgs {
    #[arg(short, long)]
    pub project_id: Uuid,
}

#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct ContainerConfigArgs {
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    /// Environment variable in NAME=VALUE form
    #[arg(short, long = "env")]
    pub env_vars: Vec<String>,
    #[arg(long)]
    pub cpu_limit: Option<String>,
    #[arg(long)]
    pub memory_limit: Option<String>,
    #[arg(long)]
    pub storage_size: Option<String>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct CreateProjectArgs {
    #[arg(short, long)]
    pub project_id: Option<Uuid>,
    #[arg(short, long)]
    pub language: Option<String>,
    /// Local file uploaded under its file name
    #[arg(short, long = "file")]
    pub files: Vec<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub provision: bool,
    #[command(flatten)]
    pub config: ContainerConfigArgs,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct CreateContainerArgs {
    #[arg(short, long)]
    pub project_id: Uuid,
    #[arg(short, long = "file")]
    pub files: Vec<PathBuf>,
    #[command(flatten)]
    pub config: ContainerConfigArgs,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct LogsArgs {
    #[arg(short, long)]
    pub project_id: Uuid,
    #[arg(short, long)]
    pub tail_lines: Option<u32>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct UpdateFilesArgs {
    #[arg(short, long)]
    pub project_id: Uuid,
    #[arg(short, long = "file", required = true)]
    pub files: Vec<PathBuf>,
}
