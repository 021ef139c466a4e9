use std::future::Future;
use std::sync::Arc;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolumeClaim, Service};
use log::{debug, info};
use sandbox_client::resources::{ConfigMapSummary, ResourceKind, ResourcesSnapshot};
use uuid::Uuid;

use super::cluster::{ClusterClient, ClusterError};
use super::container::ContainerError;
use super::container_configuration::{ContainerConfig, ProjectFile, ProvisioningDefaults};
use super::image_policy::{resolve, LaunchSpec};
use super::manifests::ProjectManifests;
use super::naming::ResourceNames;
use super::summary::{
    summarize_config_map, summarize_deployment, summarize_pvc, summarize_service,
};

/// Result of a create call that tolerates the object already being there.
#[derive(Debug, Clone, PartialEq)]
pub enum Provisioned<T> {
    Created(T),
    Adopted(T),
}

impl<T> Provisioned<T> {
    pub fn resource(&self) -> &T {
        match self {
            Provisioned::Created(resource) | Provisioned::Adopted(resource) => resource,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Provisioned::Created(_))
    }

    fn describe(&self) -> &'static str {
        if self.is_created() {
            "created"
        } else {
            "adopted"
        }
    }
}

async fn create_or_adopt<T, Adopt, AdoptFuture>(
    created: Result<T, ClusterError>,
    adopt: Adopt,
) -> Result<Provisioned<T>, ClusterError>
where
    Adopt: FnOnce() -> AdoptFuture,
    AdoptFuture: Future<Output = Result<T, ClusterError>>,
{
    match created {
        Ok(resource) => Ok(Provisioned::Created(resource)),
        Err(ClusterError::Conflict(message)) => {
            debug!("Adopting existing resource: {message}");
            adopt().await.map(Provisioned::Adopted)
        }
        Err(err) => Err(err),
    }
}

pub struct ProvisionedResources {
    pub pvc: Provisioned<PersistentVolumeClaim>,
    pub config_map: Provisioned<ConfigMap>,
    pub deployment: Provisioned<Deployment>,
    pub service: Provisioned<Service>,
}

impl ProvisionedResources {
    pub fn snapshot(&self) -> ResourcesSnapshot {
        ResourcesSnapshot {
            deployment: summarize_deployment(self.deployment.resource()),
            service: summarize_service(self.service.resource()),
            pvc: summarize_pvc(self.pvc.resource()),
            configmap: summarize_config_map(self.config_map.resource()),
        }
    }
}

pub struct ProvisionedProject {
    pub names: ResourceNames,
    pub launch: LaunchSpec,
    pub resources: ProvisionedResources,
}

/// Creates or adopts the volume, file map, deployment and service of one project.
pub struct ResourceProvisioner {
    project_id: Uuid,
    names: ResourceNames,
    cluster: Arc<dyn ClusterClient + Send + Sync>,
    defaults: Arc<ProvisioningDefaults>,
}

impl ResourceProvisioner {
    pub fn new(
        project_id: Uuid,
        cluster: Arc<dyn ClusterClient + Send + Sync>,
        defaults: Arc<ProvisioningDefaults>,
    ) -> Self {
        Self {
            project_id,
            names: ResourceNames::for_project(&project_id),
            cluster,
            defaults,
        }
    }

    fn manifests(&self) -> ProjectManifests<'_> {
        ProjectManifests::new(&self.project_id, &self.names, &self.defaults)
    }

    fn cluster_error(&self, kind: ResourceKind) -> impl Fn(ClusterError) -> ContainerError {
        let project_id = self.project_id;
        move |source| ContainerError::ClusterOperation {
            kind,
            project_id,
            source,
        }
    }

    pub async fn provision(
        &self,
        language: Option<&str>,
        files: &[ProjectFile],
        config: &ContainerConfig,
    ) -> Result<ProvisionedProject, ContainerError> {
        let launch = resolve(language, config);
        let manifests = self.manifests();
        info!(
            "Provisioning project: {} with image: {}",
            self.project_id, launch.image
        );

        let (pvc, config_map) = tokio::try_join!(
            self.provision_pvc(&manifests, config),
            self.provision_config_map(&manifests, files)
        )?;
        let deployment = self
            .provision_deployment(manifests.deployment(&launch, config))
            .await?;
        let service = self.provision_service(manifests.service(launch.port)).await?;

        Ok(ProvisionedProject {
            names: self.names.clone(),
            launch,
            resources: ProvisionedResources {
                pvc,
                config_map,
                deployment,
                service,
            },
        })
    }

    async fn provision_pvc(
        &self,
        manifests: &ProjectManifests<'_>,
        config: &ContainerConfig,
    ) -> Result<Provisioned<PersistentVolumeClaim>, ContainerError> {
        let pvc = create_or_adopt(
            self.cluster
                .create_pvc(manifests.persistent_volume_claim(config))
                .await,
            || self.cluster.get_pvc(&self.names.pvc),
        )
        .await
        .map_err(self.cluster_error(ResourceKind::PersistentVolumeClaim))?;
        info!("Pvc: {} {}", self.names.pvc, pvc.describe());
        Ok(pvc)
    }

    async fn provision_config_map(
        &self,
        manifests: &ProjectManifests<'_>,
        files: &[ProjectFile],
    ) -> Result<Provisioned<ConfigMap>, ContainerError> {
        let config_map = manifests.config_map(files);
        let config_map = create_or_adopt(
            self.cluster.create_config_map(config_map.clone()).await,
            || self.cluster.replace_config_map(config_map),
        )
        .await
        .map_err(self.cluster_error(ResourceKind::ConfigMap))?;
        info!("Configmap: {} {}", self.names.configmap, config_map.describe());
        Ok(config_map)
    }

    async fn provision_deployment(
        &self,
        deployment: Deployment,
    ) -> Result<Provisioned<Deployment>, ContainerError> {
        let deployment = create_or_adopt(
            self.cluster.create_deployment(deployment.clone()).await,
            || self.cluster.replace_deployment(deployment),
        )
        .await
        .map_err(self.cluster_error(ResourceKind::Deployment))?;
        info!(
            "Deployment: {} {}",
            self.names.deployment,
            deployment.describe()
        );
        Ok(deployment)
    }

    async fn provision_service(
        &self,
        service: Service,
    ) -> Result<Provisioned<Service>, ContainerError> {
        let service = create_or_adopt(self.cluster.create_service(service).await, || {
            self.cluster.get_service(&self.names.service)
        })
        .await
        .map_err(self.cluster_error(ResourceKind::Service))?;
        info!("Service: {} {}", self.names.service, service.describe());
        Ok(service)
    }

    /// Replaces the injected files, creating the file map when it is missing.
    pub async fn apply_files(
        &self,
        files: &[ProjectFile],
    ) -> Result<ConfigMapSummary, ContainerError> {
        let config_map = self.manifests().config_map(files);
        let applied = match self.cluster.replace_config_map(config_map.clone()).await {
            Err(ClusterError::NotFound(_)) => {
                info!(
                    "Configmap: {} not found, creating it",
                    self.names.configmap
                );
                self.cluster.create_config_map(config_map).await
            }
            result => result,
        }
        .map_err(self.cluster_error(ResourceKind::ConfigMap))?;
        Ok(summarize_config_map(&applied))
    }
}
