pub mod container_fabric;
pub mod sandbox_fabric;
