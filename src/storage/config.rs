//! Configuration for photo storage engines

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::photo::StorageResult;
use crate::storage::{
    boltdb_store::BoltDbRepository, file_store::FileRepository,
    leveldb_store::LevelDbRepository, Repository,
};

/// Available storage engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    LevelDb,
    BoltDb,
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::LevelDb
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "leveldb" => Ok(StorageBackend::LevelDb),
            "boltdb" => Ok(StorageBackend::BoltDb),
            _ => Err(format!("unknown storage type : {}", s)),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageBackend::File => "file",
            StorageBackend::LevelDb => "leveldb",
            StorageBackend::BoltDb => "boltdb",
        };
        f.write_str(name)
    }
}

/// Configuration for photo storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage engine type
    #[serde(rename = "type")]
    pub backend: StorageBackend,
    /// Directory the engine keeps its data in
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: PathBuf::from("./photos"),
        }
    }
}

impl StorageConfig {
    pub fn new(backend: StorageBackend, path: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            path: path.into(),
        }
    }

    /// Open the configured engine
    pub fn create_repository(&self) -> StorageResult<Arc<dyn Repository>> {
        info!(
            "Using {} storage backend with path: {}",
            self.backend,
            self.path.display()
        );
        let repository: Arc<dyn Repository> = match self.backend {
            StorageBackend::File => Arc::new(FileRepository::open(&self.path)?),
            StorageBackend::LevelDb => Arc::new(LevelDbRepository::open(&self.path)?),
            StorageBackend::BoltDb => Arc::new(BoltDbRepository::open(&self.path)?),
        };
        Ok(repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::{ErrorKind, Photo};
    use tempfile::TempDir;

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("file".parse::<StorageBackend>().unwrap(), StorageBackend::File);
        assert_eq!("leveldb".parse::<StorageBackend>().unwrap(), StorageBackend::LevelDb);
        assert_eq!("LevelDB".parse::<StorageBackend>().unwrap(), StorageBackend::LevelDb);
        assert_eq!("boltdb".parse::<StorageBackend>().unwrap(), StorageBackend::BoltDb);

        let err = "mysql".parse::<StorageBackend>().unwrap_err();
        assert_eq!(err, "unknown storage type : mysql");
    }

    #[test]
    fn test_storage_backend_display_round_trips() {
        for backend in [StorageBackend::File, StorageBackend::LevelDb, StorageBackend::BoltDb] {
            assert_eq!(backend.to_string().parse::<StorageBackend>().unwrap(), backend);
        }
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, StorageBackend::LevelDb);
        assert_eq!(config.path, PathBuf::from("./photos"));
    }

    #[test]
    fn test_storage_config_yaml_names() {
        let config: StorageConfig = serde_yaml::from_str("type: boltdb\npath: /data/photos\n").unwrap();
        assert_eq!(config.backend, StorageBackend::BoltDb);
        assert_eq!(config.path, PathBuf::from("/data/photos"));
    }

    #[test]
    fn test_create_repository() {
        for backend in [StorageBackend::File, StorageBackend::LevelDb, StorageBackend::BoltDb] {
            let dir = TempDir::new().unwrap();
            let config = StorageConfig::new(backend, dir.path().join("photos"));
            let repository = config.create_repository().unwrap();

            let id = repository.save(Photo::new(b"created".to_vec())).unwrap();
            assert_eq!(repository.read(&id).unwrap().image(), b"created");
        }
    }

    #[test]
    fn test_create_repository_on_plain_file_fails() {
        for backend in [StorageBackend::File, StorageBackend::LevelDb, StorageBackend::BoltDb] {
            let dir = TempDir::new().unwrap();
            let file = dir.path().join("plain");
            std::fs::write(&file, b"x").unwrap();

            let err = StorageConfig::new(backend, &file).create_repository().err().unwrap();
            assert_eq!(err.kind(), ErrorKind::OpenFailure, "{} should fail to open", backend);
        }
    }
}
