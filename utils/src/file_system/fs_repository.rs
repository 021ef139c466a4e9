use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::{fs::File, io::AsyncWriteExt};

#[derive(Debug, Error)]
pub enum FileRepositoryError {
    #[error("Error occured: {0}")]
    CreationFail(#[source] std::io::Error),
    #[error("Failed to save file: {0}")]
    SaveFail(String),
    #[error("Failed to read file: {0}")]
    ReadFail(String),
}

/// Keeps a value in memory and mirrors it into a YAML file.
///
/// Saving goes through a sibling temporary file which is renamed over the
/// target, so readers never observe a partially written document.
pub struct FileRepository<Struct: Serialize + DeserializeOwned> {
    data: Struct,
    path: PathBuf,
}

impl<Struct: Serialize + DeserializeOwned> FileRepository<Struct> {
    const TMP_EXTENSION: &'static str = "tmp";

    pub async fn new(data: Struct, path: &Path) -> Result<Self, FileRepositoryError> {
        let mut repository = Self {
            data,
            path: path.to_path_buf(),
        };
        repository.save().await?;
        Ok(repository)
    }

    pub async fn from_file_path(path: &Path) -> Result<Self, FileRepositoryError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| FileRepositoryError::ReadFail(err.to_string()))?;
        let data: Struct = serde_yaml::from_str(&content)
            .map_err(|err| FileRepositoryError::ReadFail(err.to_string()))?;
        Ok(Self {
            data,
            path: path.to_path_buf(),
        })
    }

    pub async fn save(&mut self) -> Result<(), FileRepositoryError> {
        let yaml_data = serde_yaml::to_string(&self.data)
            .map_err(|err| FileRepositoryError::SaveFail(err.to_string()))?;
        let tmp_path = self.path.with_extension(Self::TMP_EXTENSION);
        let mut file = File::create(&tmp_path)
            .await
            .map_err(FileRepositoryError::CreationFail)?;
        file.write_all(yaml_data.as_bytes())
            .await
            .map_err(|err| FileRepositoryError::SaveFail(err.to_string()))?;
        file.sync_all()
            .await
            .map_err(|err| FileRepositoryError::SaveFail(err.to_string()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|err| FileRepositoryError::SaveFail(err.to_string()))
    }

    pub fn get_mut(&mut self) -> &mut Struct {
        &mut self.data
    }

    pub fn get(&self) -> &Struct {
        &self.data
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
