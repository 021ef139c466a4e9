use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, PartialOrd, Clone, Serialize, Deserialize)]
pub enum RepositoryError {
    #[error("Can't create a repository: {0}")]
    CreationFail(String),
    #[error("Can't save inner value: {0}")]
    SaveFail(String),
}

/// Document kept in memory and written back on `save`.
#[async_trait]
pub trait Repository {
    type Data;

    fn get(&self) -> &Self::Data;
    /// Lifecycle operations edit the project record in place, then persist it with a
    /// single `save` once the cluster call has settled.
    fn get_mut(&mut self) -> &mut Self::Data;
    async fn save(&mut self) -> Result<(), RepositoryError>;
}
