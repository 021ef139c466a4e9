use std::{
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

use async_trait::async_trait;
use log::warn;
use serde::{de::DeserializeOwned, Serialize};
use utils::file_system::fs_repository::FileRepository;
use uuid::Uuid;

use crate::utils::repository::{Repository, RepositoryError};

/// Project ids of every subfolder of the work directory. Entries that aren't uuids are skipped.
pub async fn read_subfolders_uuids(root_folder: &Path) -> Result<Vec<Uuid>, io::Error> {
    let mut uuids: Vec<Uuid> = Vec::new();
    let mut read_dir = tokio::fs::read_dir(root_folder).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        match Uuid::from_str(entry.file_name().to_string_lossy().as_ref()) {
            Ok(uuid) => uuids.push(uuid),
            Err(_) => warn!("Skipping foreign directory: {:?}", entry.path()),
        }
    }
    Ok(uuids)
}

pub fn create_record_path(mut root_path: PathBuf) -> PathBuf {
    const RECORD_FILE_NAME: &str = "record.yaml";
    root_path.push(RECORD_FILE_NAME);
    root_path
}

pub fn create_workdir_path_with_uuid(mut root_workdir: PathBuf, project_id: &Uuid) -> PathBuf {
    root_workdir.push(project_id.to_string());
    root_workdir
}

pub struct YamlRecordRepository<Record: Serialize + DeserializeOwned> {
    record: FileRepository<Record>,
}

impl<Record: Serialize + DeserializeOwned + Send + Sync> YamlRecordRepository<Record> {
    pub async fn new(record: Record, path: &Path) -> Result<Self, RepositoryError> {
        Ok(Self {
            record: FileRepository::<Record>::new(record, path)
                .await
                .map_err(|err| RepositoryError::CreationFail(err.to_string()))?,
        })
    }

    pub async fn from(record_path: &Path) -> Result<Self, RepositoryError> {
        let file_repository = FileRepository::<Record>::from_file_path(record_path)
            .await
            .map_err(|err| RepositoryError::CreationFail(err.to_string()))?;
        Ok(Self {
            record: file_repository,
        })
    }
}

#[async_trait]
impl<Record: Serialize + DeserializeOwned + Send + Sync> Repository
    for YamlRecordRepository<Record>
{
    type Data = Record;

    fn get(&self) -> &Self::Data {
        self.record.get()
    }

    fn get_mut(&mut self) -> &mut Self::Data {
        self.record.get_mut()
    }

    async fn save(&mut self) -> Result<(), RepositoryError> {
        self.record
            .save()
            .await
            .map_err(|err| RepositoryError::SaveFail(err.to_string()))
    }
}
