pub mod cluster;
pub mod container;
pub mod container_configuration;
pub mod container_manager;
pub mod image_policy;
pub mod manifests;
pub mod naming;
pub mod provisioner;
pub mod sandbox;
pub mod sandbox_manager;
pub mod status_aggregator;
pub mod summary;
