use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolumeClaim, Pod, Service};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, DeleteParams, ListParams, LogParams, Patch, PatchParams, PostParams};
use kube::Client;
use log::trace;
use serde_json::json;

use crate::managers::cluster::{ClusterClient, ClusterError};

impl From<kube::Error> for ClusterError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) => match response.code {
                404 => ClusterError::NotFound(response.message),
                409 => ClusterError::Conflict(response.message),
                429 | 503 => ClusterError::Unavailable(response.message),
                code => ClusterError::Api {
                    code,
                    message: response.message,
                },
            },
            kube::Error::SerdeError(err) => ClusterError::Unknown(err.to_string()),
            kube::Error::FromUtf8(err) => ClusterError::Unknown(err.to_string()),
            kube::Error::BuildRequest(err) => ClusterError::Unknown(err.to_string()),
            other => ClusterError::Unavailable(other.to_string()),
        }
    }
}

/// Cluster access through the Kubernetes API server, scoped to one namespace.
pub struct KubeClusterClient {
    pvcs: Api<PersistentVolumeClaim>,
    config_maps: Api<ConfigMap>,
    deployments: Api<Deployment>,
    services: Api<Service>,
    pods: Api<Pod>,
    request_timeout: Duration,
}

impl KubeClusterClient {
    pub fn new(client: Client, namespace: &str, request_timeout: Duration) -> Self {
        Self {
            pvcs: Api::namespaced(client.clone(), namespace),
            config_maps: Api::namespaced(client.clone(), namespace),
            deployments: Api::namespaced(client.clone(), namespace),
            services: Api::namespaced(client.clone(), namespace),
            pods: Api::namespaced(client, namespace),
            request_timeout,
        }
    }

    async fn call<T>(
        &self,
        request: impl Future<Output = Result<T, kube::Error>>,
    ) -> Result<T, ClusterError> {
        tokio::time::timeout(self.request_timeout, request)
            .await
            .map_err(|_| ClusterError::Timeout)?
            .map_err(ClusterError::from)
    }

    fn object_name(metadata: &ObjectMeta) -> Result<String, ClusterError> {
        metadata
            .name
            .clone()
            .ok_or(ClusterError::Unknown(String::from("Object has no name.")))
    }
}

#[async_trait]
impl ClusterClient for KubeClusterClient {
    async fn create_pvc(
        &self,
        pvc: PersistentVolumeClaim,
    ) -> Result<PersistentVolumeClaim, ClusterError> {
        trace!("Creating pvc: {:?}", pvc.metadata.name);
        self.call(self.pvcs.create(&PostParams::default(), &pvc))
            .await
    }

    async fn get_pvc(&self, name: &str) -> Result<PersistentVolumeClaim, ClusterError> {
        self.call(self.pvcs.get(name)).await
    }

    async fn delete_pvc(&self, name: &str) -> Result<(), ClusterError> {
        self.call(self.pvcs.delete(name, &DeleteParams::default()))
            .await
            .map(|_| ())
    }

    async fn create_config_map(&self, config_map: ConfigMap) -> Result<ConfigMap, ClusterError> {
        trace!("Creating configmap: {:?}", config_map.metadata.name);
        self.call(self.config_maps.create(&PostParams::default(), &config_map))
            .await
    }

    async fn get_config_map(&self, name: &str) -> Result<ConfigMap, ClusterError> {
        self.call(self.config_maps.get(name)).await
    }

    async fn replace_config_map(
        &self,
        config_map: ConfigMap,
    ) -> Result<ConfigMap, ClusterError> {
        let name = Self::object_name(&config_map.metadata)?;
        trace!("Replacing configmap: {name}");
        self.call(
            self.config_maps
                .replace(&name, &PostParams::default(), &config_map),
        )
        .await
    }

    async fn delete_config_map(&self, name: &str) -> Result<(), ClusterError> {
        self.call(self.config_maps.delete(name, &DeleteParams::default()))
            .await
            .map(|_| ())
    }

    async fn create_deployment(
        &self,
        deployment: Deployment,
    ) -> Result<Deployment, ClusterError> {
        trace!("Creating deployment: {:?}", deployment.metadata.name);
        self.call(self.deployments.create(&PostParams::default(), &deployment))
            .await
    }

    async fn get_deployment(&self, name: &str) -> Result<Deployment, ClusterError> {
        self.call(self.deployments.get(name)).await
    }

    async fn replace_deployment(
        &self,
        deployment: Deployment,
    ) -> Result<Deployment, ClusterError> {
        let name = Self::object_name(&deployment.metadata)?;
        trace!("Replacing deployment: {name}");
        self.call(
            self.deployments
                .replace(&name, &PostParams::default(), &deployment),
        )
        .await
    }

    async fn scale_deployment(&self, name: &str, replicas: i32) -> Result<(), ClusterError> {
        trace!("Scaling deployment: {name} to {replicas} replicas");
        let patch = json!({ "spec": { "replicas": replicas } });
        self.call(
            self.deployments
                .patch_scale(name, &PatchParams::default(), &Patch::Merge(&patch)),
        )
        .await
        .map(|_| ())
    }

    async fn delete_deployment(&self, name: &str) -> Result<(), ClusterError> {
        self.call(self.deployments.delete(name, &DeleteParams::default()))
            .await
            .map(|_| ())
    }

    async fn create_service(&self, service: Service) -> Result<Service, ClusterError> {
        trace!("Creating service: {:?}", service.metadata.name);
        self.call(self.services.create(&PostParams::default(), &service))
            .await
    }

    async fn get_service(&self, name: &str) -> Result<Service, ClusterError> {
        self.call(self.services.get(name)).await
    }

    async fn delete_service(&self, name: &str) -> Result<(), ClusterError> {
        self.call(self.services.delete(name, &DeleteParams::default()))
            .await
            .map(|_| ())
    }

    async fn list_pods(&self, label_selector: &str) -> Result<Vec<Pod>, ClusterError> {
        self.call(self.pods.list(&ListParams::default().labels(label_selector)))
            .await
            .map(|pods| pods.items)
    }

    async fn pod_logs(&self, pod_name: &str, tail_lines: u32) -> Result<String, ClusterError> {
        let params = LogParams {
            tail_lines: Some(i64::from(tail_lines)),
            ..Default::default()
        };
        self.call(self.pods.logs(pod_name, &params)).await
    }
}
