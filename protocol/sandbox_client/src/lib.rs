pub mod client;
pub mod container;
pub mod resources;
