use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const APP_LABEL_KEY: &str = "app";
pub const PROJECT_LABEL_KEY: &str = "project-id";

/// Names of the cluster objects owned by one project.
///
/// Every name is derived from the canonical hyphenated form of the project id, so the
/// mapping is injective and the results stay valid DNS-1123 labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNames {
    pub deployment: String,
    pub service: String,
    pub pvc: String,
    pub configmap: String,
    pub container: String,
}

impl ResourceNames {
    pub fn for_project(project_id: &Uuid) -> Self {
        let base = format!("project-{}", project_id.hyphenated());
        Self {
            deployment: format!("{base}-deployment"),
            service: format!("{base}-service"),
            pvc: format!("{base}-pvc"),
            configmap: format!("{base}-configmap"),
            container: base,
        }
    }
}

pub fn project_labels(app_label: &str, project_id: &Uuid) -> BTreeMap<String, String> {
    BTreeMap::from([
        (APP_LABEL_KEY.to_string(), app_label.to_string()),
        (PROJECT_LABEL_KEY.to_string(), project_id.to_string()),
    ])
}

/// Selector matching every pod of a project, whatever deployment created it.
pub fn project_pods_selector(project_id: &Uuid) -> String {
    format!("{PROJECT_LABEL_KEY}={project_id}")
}
