use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolumeClaim, Pod, Service};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use sandbox_client::resources::{
    ConfigMapSummary, DeploymentSummary, PodSummary, PvcSummary, ServicePortSummary,
    ServiceSummary,
};

const UNKNOWN: &str = "Unknown";

pub fn summarize_pvc(pvc: &PersistentVolumeClaim) -> PvcSummary {
    let status = pvc.status.as_ref();
    PvcSummary {
        name: pvc.metadata.name.clone().unwrap_or_default(),
        phase: status
            .and_then(|status| status.phase.clone())
            .unwrap_or_else(|| String::from(UNKNOWN)),
        capacity: status
            .and_then(|status| status.capacity.as_ref())
            .and_then(|capacity| capacity.get("storage"))
            .map(|quantity| quantity.0.clone())
            .unwrap_or_else(|| String::from(UNKNOWN)),
    }
}

pub fn summarize_config_map(config_map: &ConfigMap) -> ConfigMapSummary {
    ConfigMapSummary {
        name: config_map.metadata.name.clone().unwrap_or_default(),
        data_keys: config_map
            .data
            .as_ref()
            .map(|data| data.keys().cloned().collect())
            .unwrap_or_default(),
    }
}

pub fn summarize_deployment(deployment: &Deployment) -> DeploymentSummary {
    let status = deployment.status.as_ref();
    DeploymentSummary {
        name: deployment.metadata.name.clone().unwrap_or_default(),
        replicas: desired_replicas(deployment),
        available_replicas: status
            .and_then(|status| status.available_replicas)
            .unwrap_or(0),
        ready_replicas: status.and_then(|status| status.ready_replicas).unwrap_or(0),
    }
}

pub fn summarize_service(service: &Service) -> ServiceSummary {
    let spec = service.spec.as_ref();
    ServiceSummary {
        name: service.metadata.name.clone().unwrap_or_default(),
        cluster_ip: spec.and_then(|spec| spec.cluster_ip.clone()),
        ports: spec
            .and_then(|spec| spec.ports.as_ref())
            .map(|ports| {
                ports
                    .iter()
                    .map(|port| ServicePortSummary {
                        port: port.port,
                        target_port: port.target_port.as_ref().map(|target| match target {
                            IntOrString::Int(number) => number.to_string(),
                            IntOrString::String(name) => name.clone(),
                        }),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

pub fn summarize_pod(pod: &Pod) -> PodSummary {
    let status = pod.status.as_ref();
    PodSummary {
        name: pod.metadata.name.clone().unwrap_or_default(),
        phase: pod_phase(pod).to_string(),
        ready: pod_containers_ready(pod),
        restart_count: status
            .and_then(|status| status.container_statuses.as_ref())
            .map(|statuses| statuses.iter().map(|status| status.restart_count).sum())
            .unwrap_or(0),
        start_time: status
            .and_then(|status| status.start_time.as_ref())
            .map(|time| time.0),
    }
}

/// Replica count the deployment asks for; the cluster defaults a missing value to one.
pub fn desired_replicas(deployment: &Deployment) -> i32 {
    deployment
        .spec
        .as_ref()
        .and_then(|spec| spec.replicas)
        .unwrap_or(1)
}

pub fn pod_phase(pod: &Pod) -> &str {
    pod.status
        .as_ref()
        .and_then(|status| status.phase.as_deref())
        .unwrap_or(UNKNOWN)
}

/// True only when the pod reports container statuses and every one of them is ready.
pub fn pod_containers_ready(pod: &Pod) -> bool {
    pod.status
        .as_ref()
        .and_then(|status| status.container_statuses.as_ref())
        .is_some_and(|statuses| !statuses.is_empty() && statuses.iter().all(|s| s.ready))
}
