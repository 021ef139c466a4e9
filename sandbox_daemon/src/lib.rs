mod client_handler;
mod fabric;
mod kubernetes;
mod managers;
mod socket;
mod storage;
mod utils;

pub mod cli;
pub mod daemon;
