use std::str::FromStr;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    ConfigMap, ContainerStatus, PersistentVolumeClaim, Pod, PodStatus, Service,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use mockall::mock;
use sandbox_client::resources::{
    ConfigMapSummary, DeletionOutcome, DeletionReport, ResourceKind,
};
use uuid::Uuid;

use super::repository::{Repository, RepositoryError};
use crate::managers::cluster::{ClusterClient, ClusterError};
use crate::managers::container::{ContainerError, ProjectContainer, ProjectRecord, State};
use crate::managers::container_configuration::{ContainerConfig, ProjectFile};
use crate::managers::naming::ResourceNames;
use crate::managers::sandbox::{ContainerCreator, ContainerHandle, Sandbox, SandboxError};
use crate::managers::status_aggregator::StatusReport;

pub fn create_example_uuid() -> Uuid {
    Uuid::from_str("a46289a4-5902-4586-81a3-908bdd62e7a1").unwrap()
}

/// One injectable file followed by two entries the file map must skip.
pub fn create_example_files() -> Vec<ProjectFile> {
    vec![
        ProjectFile {
            name: String::from("main.py"),
            content: String::from("print('hello')"),
            language: Some(String::from("python")),
        },
        ProjectFile {
            name: String::new(),
            content: String::from("orphan"),
            language: None,
        },
        ProjectFile {
            name: String::from("empty.py"),
            content: String::new(),
            language: Some(String::from("python")),
        },
    ]
}

pub fn create_example_project_record() -> ProjectRecord {
    ProjectRecord::new(
        create_example_uuid(),
        Some(String::from("python")),
        create_example_files(),
    )
}

pub fn create_example_deployment(replicas: Option<i32>) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            name: Some(ResourceNames::for_project(&create_example_uuid()).deployment),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas,
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn create_example_pod(name: &str, phase: &str, ready: &[bool]) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        status: Some(PodStatus {
            phase: Some(phase.to_string()),
            container_statuses: Some(
                ready
                    .iter()
                    .enumerate()
                    .map(|(index, ready)| ContainerStatus {
                        name: format!("container-{index}"),
                        ready: *ready,
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn create_example_failed_pod(name: &str, reason: &str) -> Pod {
    let mut pod = create_example_pod(name, "Failed", &[false]);
    if let Some(status) = pod.status.as_mut() {
        status.reason = Some(reason.to_string());
    }
    pod
}

pub fn create_example_status_report() -> StatusReport {
    StatusReport {
        project_id: create_example_uuid(),
        exists: true,
        running: true,
        status: State::Running,
        deployment: None,
        service: None,
        pvc: None,
        configmap: Some(create_example_config_map_summary()),
        pods: vec![],
        stale: false,
        error: None,
    }
}

pub fn create_example_config_map_summary() -> ConfigMapSummary {
    ConfigMapSummary {
        name: ResourceNames::for_project(&create_example_uuid()).configmap,
        data_keys: vec![String::from("main.py")],
    }
}

pub fn create_example_deletion_report() -> DeletionReport {
    ResourceKind::ALL
        .into_iter()
        .map(|kind| (kind, DeletionOutcome::Deleted))
        .collect()
}

/// Cluster that accepts every create and hands the object back.
pub fn echo_cluster_client() -> MockClusterClient {
    let mut cluster = MockClusterClient::new();
    cluster.expect_create_pvc().returning(|pvc| Ok(pvc));
    cluster
        .expect_create_config_map()
        .returning(|config_map| Ok(config_map));
    cluster
        .expect_create_deployment()
        .returning(|deployment| Ok(deployment));
    cluster
        .expect_create_service()
        .returning(|service| Ok(service));
    cluster
}

/// In-memory record store.
pub struct FakeRecordRepository {
    record: ProjectRecord,
    fail_saves: bool,
}

impl FakeRecordRepository {
    pub fn new(record: ProjectRecord) -> Self {
        Self {
            record,
            fail_saves: false,
        }
    }

    pub fn failing(record: ProjectRecord) -> Self {
        Self {
            record,
            fail_saves: true,
        }
    }
}

#[async_trait]
impl Repository for FakeRecordRepository {
    type Data = ProjectRecord;

    fn get(&self) -> &Self::Data {
        &self.record
    }

    fn get_mut(&mut self) -> &mut Self::Data {
        &mut self.record
    }

    async fn save(&mut self) -> Result<(), RepositoryError> {
        if self.fail_saves {
            return Err(RepositoryError::SaveFail(String::from("read-only")));
        }
        Ok(())
    }
}

mock! {
    pub ClusterClient {}

    #[async_trait]
    impl ClusterClient for ClusterClient {
        async fn create_pvc(&self, pvc: PersistentVolumeClaim) -> Result<PersistentVolumeClaim, ClusterError>;
        async fn get_pvc(&self, name: &str) -> Result<PersistentVolumeClaim, ClusterError>;
        async fn delete_pvc(&self, name: &str) -> Result<(), ClusterError>;
        async fn create_config_map(&self, config_map: ConfigMap) -> Result<ConfigMap, ClusterError>;
        async fn get_config_map(&self, name: &str) -> Result<ConfigMap, ClusterError>;
        async fn replace_config_map(&self, config_map: ConfigMap) -> Result<ConfigMap, ClusterError>;
        async fn delete_config_map(&self, name: &str) -> Result<(), ClusterError>;
        async fn create_deployment(&self, deployment: Deployment) -> Result<Deployment, ClusterError>;
        async fn get_deployment(&self, name: &str) -> Result<Deployment, ClusterError>;
        async fn replace_deployment(&self, deployment: Deployment) -> Result<Deployment, ClusterError>;
        async fn scale_deployment(&self, name: &str, replicas: i32) -> Result<(), ClusterError>;
        async fn delete_deployment(&self, name: &str) -> Result<(), ClusterError>;
        async fn create_service(&self, service: Service) -> Result<Service, ClusterError>;
        async fn get_service(&self, name: &str) -> Result<Service, ClusterError>;
        async fn delete_service(&self, name: &str) -> Result<(), ClusterError>;
        async fn list_pods(&self, label_selector: &str) -> Result<Vec<Pod>, ClusterError>;
        async fn pod_logs(&self, pod_name: &str, tail_lines: u32) -> Result<String, ClusterError>;
    }
}

mock! {
    pub ProjectContainer {}

    #[async_trait]
    impl ProjectContainer for ProjectContainer {
        async fn create(&mut self, files: Option<Vec<ProjectFile>>, config: ContainerConfig) -> Result<(), ContainerError>;
        async fn start(&mut self) -> Result<(), ContainerError>;
        async fn stop(&mut self) -> Result<(), ContainerError>;
        async fn restart(&mut self) -> Result<(), ContainerError>;
        async fn delete(&mut self) -> DeletionReport;
        async fn status(&mut self) -> StatusReport;
        async fn logs(&self, tail_lines: Option<u32>) -> String;
        async fn update_files(&mut self, files: Vec<ProjectFile>) -> Result<ConfigMapSummary, ContainerError>;
        fn get_record(&self) -> ProjectRecord;
    }
}

mock! {
    pub Sandbox {}

    #[async_trait]
    impl Sandbox for Sandbox {
        async fn register_project(&self, project_id: Uuid, language: Option<String>, files: Vec<ProjectFile>) -> Result<ContainerHandle, SandboxError>;
        async fn get_project(&self, project_id: &Uuid) -> Result<ContainerHandle, SandboxError>;
        async fn inspect_project(&self, project_id: &Uuid) -> Result<ProjectRecord, SandboxError>;
        async fn list_projects(&self) -> Vec<ProjectRecord>;
        async fn remove_project(&self, project_id: &Uuid) -> Result<DeletionReport, SandboxError>;
    }
}

mock! {
    pub ContainerCreator {}

    #[async_trait]
    impl ContainerCreator for ContainerCreator {
        async fn create_container(&self, project_id: Uuid, language: Option<String>, files: Vec<ProjectFile>) -> Result<Box<dyn ProjectContainer + Send + Sync>, SandboxError>;
        async fn load_container(&self, project_id: &Uuid) -> Result<Box<dyn ProjectContainer + Send + Sync>, SandboxError>;
        async fn clean_up_container(&self, project_id: &Uuid) -> Result<(), SandboxError>;
    }
}
