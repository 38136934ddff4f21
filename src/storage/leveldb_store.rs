//! Log-structured repository implementation backed by sled

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::photo::{Identifier, Photo, StorageError, StorageResult};
use crate::storage::Repository;

/// Repository storing photos in an embedded log-structured key/value store
pub struct LevelDbRepository {
    db: sled::Db,
    path: PathBuf,
}

impl LevelDbRepository {
    /// Open (or create) the store in directory `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if path.exists() && !path.is_dir() {
            return Err(StorageError::open(path, "path exists and is not a directory"));
        }
        let db = sled::open(path).map_err(|e| StorageError::open(path, e))?;
        info!("Opened log-structured photo store at {}", path.display());
        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }
}

impl Repository for LevelDbRepository {
    fn save(&self, photo: Photo) -> StorageResult<Identifier> {
        let (id, data) = photo.into_parts();
        id.validate()?;

        let size = data.len();
        self.db
            .insert(id.as_bytes(), data)
            .map_err(|e| StorageError::io(&id, e))?;
        self.db.flush().map_err(|e| StorageError::io(&id, e))?;

        debug!("Put photo {} ({} bytes)", id, size);
        Ok(id)
    }

    fn read(&self, id: &Identifier) -> StorageResult<Photo> {
        id.validate()?;
        let data = self
            .db
            .get(id.as_bytes())
            .map_err(|e| StorageError::io(id, e))?
            .ok_or_else(|| StorageError::not_found(id))?;

        debug!("Got photo {} ({} bytes)", id, data.len());
        Ok(Photo::of(id.clone(), data.to_vec()))
    }

    fn delete(&self, id: &Identifier) -> StorageResult<()> {
        id.validate()?;
        // Removing an absent key is a no-op.
        let removed = self
            .db
            .remove(id.as_bytes())
            .map_err(|e| StorageError::io(id, e))?;
        self.db.flush().map_err(|e| StorageError::io(id, e))?;

        debug!("Deleted photo {} (present: {})", id, removed.is_some());
        Ok(())
    }
}

impl std::fmt::Debug for LevelDbRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelDbRepository")
            .field("path", &self.path)
            .finish()
    }
}
