use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{error, info, warn};
use sandbox_client::resources::{
    ConfigMapSummary, DeletionOutcome, DeletionReport, ResourceKind,
};
use uuid::Uuid;

use super::cluster::{ClusterClient, ClusterError};
use super::container::{ContainerError, ProjectContainer, ProjectRecord, State};
use super::container_configuration::{ContainerConfig, ProjectFile, ProvisioningDefaults};
use super::naming::{project_pods_selector, ResourceNames};
use super::provisioner::ResourceProvisioner;
use super::status_aggregator::{StatusAggregator, StatusReport};
use crate::utils::repository::Repository;

pub const DEFAULT_TAIL_LINES: u32 = 100;
pub const NO_PODS_MESSAGE: &str = "No pods found for this project";

type RecordRepository = Box<dyn Repository<Data = ProjectRecord> + Send + Sync>;

pub struct ContainerManager {
    project_id: Uuid,
    names: ResourceNames,
    record: RecordRepository,
    cluster: Arc<dyn ClusterClient + Send + Sync>,
    provisioner: ResourceProvisioner,
    aggregator: StatusAggregator,
}

impl ContainerManager {
    pub fn new(
        record: RecordRepository,
        cluster: Arc<dyn ClusterClient + Send + Sync>,
        defaults: Arc<ProvisioningDefaults>,
    ) -> Self {
        let project_id = record.get().container.project_id;
        ContainerManager {
            project_id,
            names: ResourceNames::for_project(&project_id),
            record,
            provisioner: ResourceProvisioner::new(project_id, cluster.clone(), defaults),
            aggregator: StatusAggregator::new(cluster.clone()),
            cluster,
        }
    }

    async fn save(&mut self) -> Result<(), ContainerError> {
        self.record
            .save()
            .await
            .map_err(|err| ContainerError::RecordSave(err.to_string()))
    }

    fn ensure_provisioned(&self) -> Result<(), ContainerError> {
        if self.record.get().container.is_provisioned() {
            Ok(())
        } else {
            Err(ContainerError::NotProvisioned(self.project_id))
        }
    }

    async fn scale(&self, replicas: i32) -> Result<(), ContainerError> {
        self.cluster
            .scale_deployment(&self.names.deployment, replicas)
            .await
            .map_err(|source| ContainerError::ClusterOperation {
                kind: ResourceKind::Deployment,
                project_id: self.project_id,
                source,
            })
    }

    fn mark_started(&mut self) {
        let container = &mut self.record.get_mut().container;
        container.running = true;
        container.status = State::Running;
        container.last_started_at = Some(Utc::now());
    }

    fn mark_stopped(&mut self) {
        let container = &mut self.record.get_mut().container;
        container.running = false;
        container.status = State::Stopped;
    }

    fn deletion_outcome(kind: ResourceKind, result: Result<(), ClusterError>) -> DeletionOutcome {
        match result {
            Ok(()) => DeletionOutcome::Deleted,
            Err(ClusterError::NotFound(_)) => DeletionOutcome::NotFound,
            Err(err) => {
                error!("Failed to delete {kind}: {err}");
                DeletionOutcome::Failed(err.to_string())
            }
        }
    }

    async fn read_logs(&self, tail_lines: u32) -> Result<String, ClusterError> {
        let pods = self
            .cluster
            .list_pods(&project_pods_selector(&self.project_id))
            .await?;
        match pods.first().and_then(|pod| pod.metadata.name.as_deref()) {
            Some(pod_name) => self.cluster.pod_logs(pod_name, tail_lines).await,
            None => Ok(String::from(NO_PODS_MESSAGE)),
        }
    }
}

#[async_trait]
impl ProjectContainer for ContainerManager {
    async fn create(
        &mut self,
        files: Option<Vec<ProjectFile>>,
        config: ContainerConfig,
    ) -> Result<(), ContainerError> {
        if let Some(files) = files {
            self.record.get_mut().files = files;
        }
        let record = self.record.get();
        let result = self
            .provisioner
            .provision(record.language.as_deref(), &record.files, &config)
            .await;

        let container = &mut self.record.get_mut().container;
        match result {
            Ok(project) => {
                let now = Utc::now();
                container.assign_names(Some(&project.names));
                container.container_image = Some(project.launch.image);
                container.container_port = Some(project.launch.port);
                container.running = true;
                container.status = State::Creating;
                container.created_at = Some(now);
                container.last_started_at = Some(now);
                container.resources_snapshot = Some(project.resources.snapshot());
                self.save().await?;
                info!("Provisioned container for project: {}", self.project_id);
                Ok(())
            }
            Err(err) => {
                error!(
                    "Failed to provision container for project: {}: {}",
                    self.project_id, err
                );
                // Names of resources that already exist are only cleared by delete.
                if !container.is_provisioned() {
                    container.assign_names(None);
                    container.running = false;
                    container.resources_snapshot = None;
                }
                container.status = State::Error(err.to_string());
                if let Err(save_err) = self.save().await {
                    warn!("{save_err}");
                }
                Err(err)
            }
        }
    }

    async fn start(&mut self) -> Result<(), ContainerError> {
        self.ensure_provisioned()?;
        self.scale(1).await?;
        self.mark_started();
        self.save().await?;
        info!("Started container for project: {}", self.project_id);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ContainerError> {
        self.ensure_provisioned()?;
        self.scale(0).await?;
        self.mark_stopped();
        self.save().await?;
        info!("Stopped container for project: {}", self.project_id);
        Ok(())
    }

    async fn restart(&mut self) -> Result<(), ContainerError> {
        if self.ensure_provisioned().is_err() {
            info!(
                "Project: {} has no container resources, creating them",
                self.project_id
            );
            return self.create(None, ContainerConfig::default()).await;
        }

        let stopped = self.scale(0).await;
        if stopped.is_ok() {
            self.mark_stopped();
        }
        let started = self.scale(1).await;
        if started.is_ok() {
            self.mark_started();
        }

        let outcome = match (stopped, started) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(stop), Ok(())) => Err(ContainerError::RestartStopFail(stop.to_string())),
            (Ok(()), Err(start)) => Err(ContainerError::RestartStartFail(start.to_string())),
            (Err(stop), Err(start)) => Err(ContainerError::RestartStartFail(format!(
                "{start}, stopping failed as well: {stop}"
            ))),
        };
        match &outcome {
            Ok(()) => info!("Restarted container for project: {}", self.project_id),
            Err(err) => error!("Restart of project: {} failed: {}", self.project_id, err),
        }
        let saved = self.save().await;
        outcome.and(saved)
    }

    async fn delete(&mut self) -> DeletionReport {
        let mut report = DeletionReport::new();
        report.insert(
            ResourceKind::Deployment,
            Self::deletion_outcome(
                ResourceKind::Deployment,
                self.cluster.delete_deployment(&self.names.deployment).await,
            ),
        );
        report.insert(
            ResourceKind::Service,
            Self::deletion_outcome(
                ResourceKind::Service,
                self.cluster.delete_service(&self.names.service).await,
            ),
        );
        report.insert(
            ResourceKind::ConfigMap,
            Self::deletion_outcome(
                ResourceKind::ConfigMap,
                self.cluster.delete_config_map(&self.names.configmap).await,
            ),
        );
        report.insert(
            ResourceKind::PersistentVolumeClaim,
            Self::deletion_outcome(
                ResourceKind::PersistentVolumeClaim,
                self.cluster.delete_pvc(&self.names.pvc).await,
            ),
        );

        let container = &mut self.record.get_mut().container;
        container.assign_names(None);
        container.running = false;
        container.resources_snapshot = None;
        container.status = State::Deleted;
        if let Err(err) = self.save().await {
            warn!("{err}");
        }
        info!("Deleted container resources of project: {}", self.project_id);
        report
    }

    async fn status(&mut self) -> StatusReport {
        let report = self.aggregator.aggregate(&self.record.get().container).await;
        if report.exists && !report.stale && !report.pods.is_empty() {
            let container = &mut self.record.get_mut().container;
            container.running = report.running;
            container.status = report.status.clone();
            if let Err(err) = self.save().await {
                warn!("Status of project: {} not persisted: {}", self.project_id, err);
            }
        }
        report
    }

    async fn logs(&self, tail_lines: Option<u32>) -> String {
        match self
            .read_logs(tail_lines.unwrap_or(DEFAULT_TAIL_LINES))
            .await
        {
            Ok(logs) => logs,
            Err(err) => {
                error!("Failed to read logs of project: {}: {}", self.project_id, err);
                format!("Error getting logs: {err}")
            }
        }
    }

    async fn update_files(
        &mut self,
        files: Vec<ProjectFile>,
    ) -> Result<ConfigMapSummary, ContainerError> {
        let summary = self.provisioner.apply_files(&files).await?;
        self.record.get_mut().files = files;
        self.save().await?;
        info!("Updated files of project: {}", self.project_id);
        Ok(summary)
    }

    fn get_record(&self) -> ProjectRecord {
        self.record.get().clone()
    }
}
