use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    ConfigMap, ConfigMapVolumeSource, Container, ContainerPort, EnvVar as KubeEnvVar,
    PersistentVolumeClaim, PersistentVolumeClaimSpec, PersistentVolumeClaimVolumeSource, PodSpec,
    PodTemplateSpec, ResourceRequirements, Service, ServicePort, ServiceSpec, Volume,
    VolumeMount, VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use uuid::Uuid;

use super::container_configuration::{ContainerConfig, ProjectFile, ProvisioningDefaults};
use super::image_policy::LaunchSpec;
use super::naming::{project_labels, ResourceNames};

const DATA_VOLUME_NAME: &str = "project-data";
const FILES_VOLUME_NAME: &str = "project-files";

/// Builds the cluster objects of a single project.
pub struct ProjectManifests<'a> {
    names: &'a ResourceNames,
    labels: BTreeMap<String, String>,
    defaults: &'a ProvisioningDefaults,
}

impl<'a> ProjectManifests<'a> {
    pub fn new(
        project_id: &Uuid,
        names: &'a ResourceNames,
        defaults: &'a ProvisioningDefaults,
    ) -> Self {
        Self {
            names,
            labels: project_labels(&defaults.app_label, project_id),
            defaults,
        }
    }

    fn metadata(&self, name: &str) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(self.labels.clone()),
            ..Default::default()
        }
    }

    pub fn persistent_volume_claim(&self, config: &ContainerConfig) -> PersistentVolumeClaim {
        let storage_size = config
            .storage_size
            .clone()
            .unwrap_or_else(|| self.defaults.storage_size.clone());
        PersistentVolumeClaim {
            metadata: self.metadata(&self.names.pvc),
            spec: Some(PersistentVolumeClaimSpec {
                access_modes: Some(vec![String::from("ReadWriteOnce")]),
                resources: Some(VolumeResourceRequirements {
                    requests: Some(BTreeMap::from([(
                        String::from("storage"),
                        Quantity(storage_size),
                    )])),
                    ..Default::default()
                }),
                storage_class_name: Some(
                    config
                        .storage_class
                        .clone()
                        .unwrap_or_else(|| self.defaults.storage_class.clone()),
                ),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn config_map(&self, files: &[ProjectFile]) -> ConfigMap {
        let data: BTreeMap<String, String> = files
            .iter()
            .filter(|file| file.is_injectable())
            .map(|file| (file.name.clone(), file.content.clone()))
            .collect();
        ConfigMap {
            metadata: self.metadata(&self.names.configmap),
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn deployment(&self, launch: &LaunchSpec, config: &ContainerConfig) -> Deployment {
        let pick = |value: &Option<String>, default: &String| {
            Quantity(value.clone().unwrap_or_else(|| default.clone()))
        };
        let container = Container {
            name: self.names.container.clone(),
            image: Some(launch.image.clone()),
            command: launch.command.clone(),
            args: launch.args.clone(),
            env: Some(
                launch
                    .env_vars
                    .iter()
                    .map(|env| KubeEnvVar {
                        name: env.name.clone(),
                        value: Some(env.value.clone()),
                        ..Default::default()
                    })
                    .collect(),
            ),
            ports: Some(vec![ContainerPort {
                container_port: i32::from(launch.port),
                protocol: Some(String::from("TCP")),
                ..Default::default()
            }]),
            resources: Some(ResourceRequirements {
                limits: Some(BTreeMap::from([
                    (
                        String::from("cpu"),
                        pick(&config.cpu_limit, &self.defaults.cpu_limit),
                    ),
                    (
                        String::from("memory"),
                        pick(&config.memory_limit, &self.defaults.memory_limit),
                    ),
                ])),
                requests: Some(BTreeMap::from([
                    (
                        String::from("cpu"),
                        pick(&config.cpu_request, &self.defaults.cpu_request),
                    ),
                    (
                        String::from("memory"),
                        pick(&config.memory_request, &self.defaults.memory_request),
                    ),
                ])),
                ..Default::default()
            }),
            volume_mounts: Some(vec![
                VolumeMount {
                    name: String::from(DATA_VOLUME_NAME),
                    mount_path: self.defaults.data_mount_path.clone(),
                    ..Default::default()
                },
                VolumeMount {
                    name: String::from(FILES_VOLUME_NAME),
                    mount_path: self.defaults.source_mount_path.clone(),
                    ..Default::default()
                },
            ]),
            working_dir: Some(self.defaults.source_mount_path.clone()),
            ..Default::default()
        };

        Deployment {
            metadata: self.metadata(&self.names.deployment),
            spec: Some(DeploymentSpec {
                replicas: Some(1),
                selector: LabelSelector {
                    match_labels: Some(self.labels.clone()),
                    ..Default::default()
                },
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        labels: Some(self.labels.clone()),
                        ..Default::default()
                    }),
                    spec: Some(PodSpec {
                        containers: vec![container],
                        volumes: Some(vec![
                            Volume {
                                name: String::from(DATA_VOLUME_NAME),
                                persistent_volume_claim: Some(
                                    PersistentVolumeClaimVolumeSource {
                                        claim_name: self.names.pvc.clone(),
                                        ..Default::default()
                                    },
                                ),
                                ..Default::default()
                            },
                            Volume {
                                name: String::from(FILES_VOLUME_NAME),
                                config_map: Some(ConfigMapVolumeSource {
                                    name: self.names.configmap.clone(),
                                    ..Default::default()
                                }),
                                ..Default::default()
                            },
                        ]),
                        ..Default::default()
                    }),
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn service(&self, port: u16) -> Service {
        Service {
            metadata: self.metadata(&self.names.service),
            spec: Some(ServiceSpec {
                type_: Some(String::from("ClusterIP")),
                selector: Some(self.labels.clone()),
                ports: Some(vec![ServicePort {
                    port: i32::from(port),
                    target_port: Some(IntOrString::Int(i32::from(port))),
                    protocol: Some(String::from("TCP")),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}
