use std::{collections::HashMap, path::PathBuf, sync::Arc};

use log::info;
use tokio::sync::Mutex;

use crate::{
    managers::{
        sandbox::{ContainerCreator, Sandbox},
        sandbox_manager::SandboxManager,
    },
    storage::read_subfolders_uuids,
};

pub struct SandboxFabric {
    sandbox_workdir_path: PathBuf,
}

impl SandboxFabric {
    pub async fn new(sandbox_workdir_path: PathBuf) -> Result<Self, anyhow::Error> {
        tokio::fs::create_dir_all(&sandbox_workdir_path).await?;
        Ok(Self {
            sandbox_workdir_path,
        })
    }

    /// Loads every project found in the work directory.
    pub async fn create_sandbox(
        &self,
        container_creator: Box<dyn ContainerCreator + Send + Sync>,
    ) -> Result<Arc<dyn Sandbox + Send + Sync>, anyhow::Error> {
        let mut projects = HashMap::new();

        for uuid in read_subfolders_uuids(&self.sandbox_workdir_path).await? {
            projects.insert(
                uuid,
                Arc::new(Mutex::new(container_creator.load_container(&uuid).await?)),
            );
        }
        info!("Loaded {} projects", projects.len());

        Ok(Arc::new(SandboxManager::new(projects, container_creator)))
    }
}
