use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use sandbox_client::resources::DeletionReport;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::container::ProjectRecord;
use super::container_configuration::ProjectFile;
use super::sandbox::{ContainerCreator, ContainerHandle, Sandbox, SandboxError};

pub struct SandboxManager {
    container_fabric: Box<dyn ContainerCreator + Send + Sync>,
    projects: Mutex<HashMap<Uuid, ContainerHandle>>,
}

impl SandboxManager {
    pub fn new(
        projects: HashMap<Uuid, ContainerHandle>,
        container_fabric: Box<dyn ContainerCreator + Send + Sync>,
    ) -> Self {
        SandboxManager {
            container_fabric,
            projects: Mutex::new(projects),
        }
    }

    async fn handles(&self) -> Vec<ContainerHandle> {
        self.projects.lock().await.values().cloned().collect()
    }
}

#[async_trait]
impl Sandbox for SandboxManager {
    async fn register_project(
        &self,
        project_id: Uuid,
        language: Option<String>,
        files: Vec<ProjectFile>,
    ) -> Result<ContainerHandle, SandboxError> {
        let mut projects = self.projects.lock().await;
        if projects.contains_key(&project_id) {
            return Err(SandboxError::ProjectAlreadyExists(project_id));
        }
        let handle: ContainerHandle = Arc::new(Mutex::new(
            self.container_fabric
                .create_container(project_id, language, files)
                .await?,
        ));
        projects.insert(project_id, handle.clone());
        info!("Registered project: {}", project_id);
        Ok(handle)
    }

    async fn get_project(&self, project_id: &Uuid) -> Result<ContainerHandle, SandboxError> {
        self.projects
            .lock()
            .await
            .get(project_id)
            .cloned()
            .ok_or(SandboxError::NoSuchProject(*project_id))
    }

    async fn inspect_project(&self, project_id: &Uuid) -> Result<ProjectRecord, SandboxError> {
        let handle = self.get_project(project_id).await?;
        let record = handle.lock().await.get_record();
        Ok(record)
    }

    async fn list_projects(&self) -> Vec<ProjectRecord> {
        let mut records = vec![];
        for handle in self.handles().await {
            records.push(handle.lock().await.get_record());
        }
        records.sort_by_key(|record| record.container.project_id);
        records
    }

    async fn remove_project(&self, project_id: &Uuid) -> Result<DeletionReport, SandboxError> {
        let handle = self.get_project(project_id).await?;
        let mut container = handle.lock().await;

        let mut projects = self.projects.lock().await;
        match projects.get(project_id) {
            Some(current) if Arc::ptr_eq(current, &handle) => {}
            _ => return Err(SandboxError::NoSuchProject(*project_id)),
        }
        drop(projects);

        let report = container.delete().await;
        self.projects.lock().await.remove(project_id);
        if let Err(err) = self.container_fabric.clean_up_container(project_id).await {
            warn!("Project: {} removed, but its files remain: {}", project_id, err);
            return Err(err);
        }
        info!("Removed project: {}", project_id);
        Ok(report)
    }
}
