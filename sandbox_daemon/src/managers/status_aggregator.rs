use std::sync::Arc;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolumeClaim, Pod, Service};
use log::warn;
use sandbox_client::resources::{
    ConfigMapSummary, DeploymentSummary, PodSummary, PvcSummary, ServiceSummary,
};
use uuid::Uuid;

use super::cluster::{optional, ClusterClient, ClusterError};
use super::container::{ContainerRecord, State};
use super::naming::{project_pods_selector, ResourceNames};
use super::summary::{
    desired_replicas, pod_containers_ready, pod_phase, summarize_config_map,
    summarize_deployment, summarize_pod, summarize_pvc, summarize_service,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub project_id: Uuid,
    pub exists: bool,
    pub running: bool,
    pub status: State,
    pub deployment: Option<DeploymentSummary>,
    pub service: Option<ServiceSummary>,
    pub pvc: Option<PvcSummary>,
    pub configmap: Option<ConfigMapSummary>,
    pub pods: Vec<PodSummary>,
    pub stale: bool,
    pub error: Option<String>,
}

impl StatusReport {
    /// Report built from the record alone, without asking the cluster.
    fn cached(record: &ContainerRecord, error: Option<String>) -> Self {
        Self {
            project_id: record.project_id,
            exists: record.is_provisioned(),
            running: record.running,
            status: record.status.clone(),
            deployment: None,
            service: None,
            pvc: None,
            configmap: None,
            pods: vec![],
            stale: error.is_some(),
            error,
        }
    }
}

/// Cluster objects of a project as read in one pass.
#[derive(Debug, Default)]
pub struct Observation {
    pub deployment: Option<Deployment>,
    pub service: Option<Service>,
    pub pvc: Option<PersistentVolumeClaim>,
    pub config_map: Option<ConfigMap>,
    pub pods: Vec<Pod>,
}

impl Observation {
    pub fn running(&self) -> bool {
        self.pods
            .first()
            .is_some_and(|pod| pod_phase(pod) == "Running" && pod_containers_ready(pod))
    }

    pub fn effective_status(&self) -> State {
        match (&self.deployment, self.pods.first()) {
            (None, _) => State::NotCreated,
            (Some(deployment), None) if desired_replicas(deployment) == 0 => State::Stopped,
            (Some(_), None) => State::Creating,
            (Some(_), Some(pod)) => Self::pod_state(pod),
        }
    }

    fn pod_state(pod: &Pod) -> State {
        match pod_phase(pod) {
            "Running" if pod_containers_ready(pod) => State::Running,
            "Running" | "Pending" => State::Creating,
            "Succeeded" => State::Stopped,
            "Failed" => {
                let reason = pod
                    .status
                    .as_ref()
                    .and_then(|status| status.reason.clone().or(status.message.clone()))
                    .unwrap_or_else(|| String::from("unknown reason"));
                State::Error(format!(
                    "pod {} failed: {}",
                    pod.metadata.name.as_deref().unwrap_or_default(),
                    reason
                ))
            }
            _ => State::Unknown,
        }
    }

    fn into_report(self, project_id: Uuid) -> StatusReport {
        StatusReport {
            project_id,
            exists: self.deployment.is_some(),
            running: self.running(),
            status: self.effective_status(),
            deployment: self.deployment.as_ref().map(summarize_deployment),
            service: self.service.as_ref().map(summarize_service),
            pvc: self.pvc.as_ref().map(summarize_pvc),
            configmap: self.config_map.as_ref().map(summarize_config_map),
            pods: self.pods.iter().map(summarize_pod).collect(),
            stale: false,
            error: None,
        }
    }
}

/// Reduces the cluster objects of a project to a single status.
pub struct StatusAggregator {
    cluster: Arc<dyn ClusterClient + Send + Sync>,
}

impl StatusAggregator {
    pub fn new(cluster: Arc<dyn ClusterClient + Send + Sync>) -> Self {
        Self { cluster }
    }

    pub async fn observe(&self, project_id: &Uuid) -> Result<Observation, ClusterError> {
        let names = ResourceNames::for_project(project_id);
        let selector = project_pods_selector(project_id);
        let (deployment, service, pvc, config_map, pods) = tokio::try_join!(
            async { optional(self.cluster.get_deployment(&names.deployment).await) },
            async { optional(self.cluster.get_service(&names.service).await) },
            async { optional(self.cluster.get_pvc(&names.pvc).await) },
            async { optional(self.cluster.get_config_map(&names.configmap).await) },
            self.cluster.list_pods(&selector),
        )?;
        Ok(Observation {
            deployment,
            service,
            pvc,
            config_map,
            pods,
        })
    }

    /// Never fails: a project without resources is reported from its record, and
    /// read errors fall back to the record's cached view.
    pub async fn aggregate(&self, record: &ContainerRecord) -> StatusReport {
        if !record.is_provisioned() {
            let error = match &record.status {
                State::Error(detail) => Some(detail.clone()),
                _ => None,
            };
            let mut report = StatusReport::cached(record, error);
            report.running = false;
            report.stale = false;
            if !matches!(report.status, State::Deleted | State::Error(_)) {
                report.status = State::NotCreated;
            }
            return report;
        }

        match self.observe(&record.project_id).await {
            Ok(observation) => observation.into_report(record.project_id),
            Err(err) => {
                warn!(
                    "Failed to read status of project: {}, reporting cached state: {}",
                    record.project_id, err
                );
                StatusReport::cached(record, Some(err.to_string()))
            }
        }
    }
}
