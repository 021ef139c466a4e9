use std::{io, path::PathBuf};

use sandbox_client::client::{SandboxDaemonError, SandboxResponse};
use thiserror::Error;
use utils::serde::json_framed::JsonFramedError;

#[derive(Debug, Error)]
pub enum SandboxClientError {
    #[error(
        "Failed to connect to sandbox daemon's socket at path: {socket_path}. More details: {details}"
    )]
    ConnectionFailed {
        socket_path: PathBuf,
        #[source]
        details: io::Error,
    },
    #[error("Sandbox operation failed: {0}")]
    SandboxOperationFail(#[from] SandboxDaemonError),
    #[error("Failed to communicate with sandbox daemon: {0}")]
    CommunicationFail(#[from] JsonFramedError),
    #[error("Invalid response: {response:#?}")]
    InvalidResponse { response: SandboxResponse },
}
