use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub name: String,
    pub content: String,
    pub language: Option<String>,
}

impl ProjectFile {
    /// Files without a name or content are not injected into the container.
    pub fn is_injectable(&self) -> bool {
        !self.name.is_empty() && !self.content.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    pub image: Option<String>,
    pub port: Option<u16>,
    pub command: Option<Vec<String>>,
    pub args: Option<Vec<String>>,
    pub env_vars: Option<Vec<EnvVar>>,
    pub cpu_limit: Option<String>,
    pub memory_limit: Option<String>,
    pub cpu_request: Option<String>,
    pub memory_request: Option<String>,
    pub storage_size: Option<String>,
    pub storage_class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningDefaults {
    pub app_label: String,
    pub storage_size: String,
    pub storage_class: String,
    pub cpu_limit: String,
    pub memory_limit: String,
    pub cpu_request: String,
    pub memory_request: String,
    pub data_mount_path: String,
    pub source_mount_path: String,
}

impl Default for ProvisioningDefaults {
    fn default() -> Self {
        Self {
            app_label: String::from("vibecode"),
            storage_size: String::from("1Gi"),
            storage_class: String::from("standard"),
            cpu_limit: String::from("500m"),
            memory_limit: String::from("512Mi"),
            cpu_request: String::from("100m"),
            memory_request: String::from("128Mi"),
            data_mount_path: String::from("/app/data"),
            source_mount_path: String::from("/app/src"),
        }
    }
}
