use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::managers::cluster::ClusterClient;
use crate::managers::container::{ProjectContainer, ProjectRecord};
use crate::managers::container_configuration::{ProjectFile, ProvisioningDefaults};
use crate::managers::container_manager::ContainerManager;
use crate::managers::sandbox::{ContainerCreator, SandboxError};
use crate::storage::{create_record_path, create_workdir_path_with_uuid, YamlRecordRepository};

pub struct ContainerFabric {
    sandbox_workdir_path: PathBuf,
    cluster: Arc<dyn ClusterClient + Send + Sync>,
    defaults: Arc<ProvisioningDefaults>,
}

impl ContainerFabric {
    pub fn new(
        sandbox_workdir_path: PathBuf,
        cluster: Arc<dyn ClusterClient + Send + Sync>,
        defaults: Arc<ProvisioningDefaults>,
    ) -> Self {
        ContainerFabric {
            sandbox_workdir_path,
            cluster,
            defaults,
        }
    }
}

#[async_trait]
impl ContainerCreator for ContainerFabric {
    async fn create_container(
        &self,
        project_id: Uuid,
        language: Option<String>,
        files: Vec<ProjectFile>,
    ) -> Result<Box<dyn ProjectContainer + Send + Sync>, SandboxError> {
        let project_workdir =
            create_workdir_path_with_uuid(self.sandbox_workdir_path.clone(), &project_id);
        tokio::fs::create_dir(&project_workdir)
            .await
            .map_err(|err| SandboxError::ProjectCreationFail(err.to_string()))?;
        let repository = YamlRecordRepository::<ProjectRecord>::new(
            ProjectRecord::new(project_id, language, files),
            &create_record_path(project_workdir),
        )
        .await
        .map_err(|err| SandboxError::ProjectCreationFail(err.to_string()))?;
        Ok(Box::new(ContainerManager::new(
            Box::new(repository),
            self.cluster.clone(),
            self.defaults.clone(),
        )))
    }

    async fn load_container(
        &self,
        project_id: &Uuid,
    ) -> Result<Box<dyn ProjectContainer + Send + Sync>, SandboxError> {
        let project_workdir =
            create_workdir_path_with_uuid(self.sandbox_workdir_path.clone(), project_id);
        let repository =
            YamlRecordRepository::<ProjectRecord>::from(&create_record_path(project_workdir))
                .await
                .map_err(|err| SandboxError::ProjectCreationFail(err.to_string()))?;
        Ok(Box::new(ContainerManager::new(
            Box::new(repository),
            self.cluster.clone(),
            self.defaults.clone(),
        )))
    }

    async fn clean_up_container(&self, project_id: &Uuid) -> Result<(), SandboxError> {
        tokio::fs::remove_dir_all(create_workdir_path_with_uuid(
            self.sandbox_workdir_path.clone(),
            project_id,
        ))
        .await
        .map_err(|err| SandboxError::RemoveFail(err.to_string()))
    }
}
