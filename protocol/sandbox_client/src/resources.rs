use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Deployment,
    Service,
    ConfigMap,
    PersistentVolumeClaim,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Deployment,
        ResourceKind::Service,
        ResourceKind::ConfigMap,
        ResourceKind::PersistentVolumeClaim,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Deployment => "deployment",
            ResourceKind::Service => "service",
            ResourceKind::ConfigMap => "configmap",
            ResourceKind::PersistentVolumeClaim => "pvc",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PvcSummary {
    pub name: String,
    pub phase: String,
    pub capacity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigMapSummary {
    pub name: String,
    pub data_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentSummary {
    pub name: String,
    pub replicas: i32,
    pub available_replicas: i32,
    pub ready_replicas: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServicePortSummary {
    pub port: i32,
    pub target_port: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceSummary {
    pub name: String,
    pub cluster_ip: Option<String>,
    pub ports: Vec<ServicePortSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PodSummary {
    pub name: String,
    pub phase: String,
    pub ready: bool,
    pub restart_count: i32,
    pub start_time: Option<DateTime<Utc>>,
}

/// Creation results of the four resources of a project, as last seen by the daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourcesSnapshot {
    pub deployment: DeploymentSummary,
    pub service: ServiceSummary,
    pub pvc: PvcSummary,
    pub configmap: ConfigMapSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted,
    NotFound,
    Failed(String),
}

pub type DeletionReport = BTreeMap<ResourceKind, DeletionOutcome>;
