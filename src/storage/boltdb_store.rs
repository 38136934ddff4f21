//! Transactional B-tree repository implementation backed by redb
//!
//! All photos live in a single `photos` table (the bucket), created when the
//! repository is opened. Every operation runs in its own write transaction,
//! so each save, read and delete is atomic and serialized with other writers
//! by the store itself. Batching several operations into one transaction is
//! intentionally not offered.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};

use crate::photo::{Identifier, Photo, StorageError, StorageResult};
use crate::storage::Repository;

/// Name of the bucket holding every photo
pub const PHOTOS_BUCKET: &str = "photos";

/// File name of the database inside the configured directory
pub const DATABASE_FILE: &str = "photos.redb";

const PHOTOS: TableDefinition<&str, &[u8]> = TableDefinition::new(PHOTOS_BUCKET);

/// Repository storing photos in one bucket of an embedded B-tree store
pub struct BoltDbRepository {
    db: Database,
    path: PathBuf,
}

impl BoltDbRepository {
    /// Open (or create) the store inside directory `dir` and ensure the photo
    /// bucket exists.
    pub fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref();
        if dir.exists() && !dir.is_dir() {
            return Err(StorageError::open(dir, "path exists and is not a directory"));
        }
        fs::create_dir_all(dir).map_err(|e| StorageError::open(dir, e))?;

        let path = dir.join(DATABASE_FILE);
        let db = Database::create(&path).map_err(|e| StorageError::open(&path, e))?;

        let txn = db.begin_write().map_err(|e| StorageError::open(&path, e))?;
        txn.open_table(PHOTOS)
            .map_err(|e| StorageError::open(&path, e))?;
        txn.commit().map_err(|e| StorageError::open(&path, e))?;

        info!(
            "Opened B-tree photo store at {} with bucket '{}'",
            path.display(),
            PHOTOS_BUCKET
        );
        Ok(Self { db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` inside a fresh write transaction and commit it.
    ///
    /// Any failure from the store is reported as an I/O failure on `id`; the
    /// result of `op` itself is returned once the commit succeeded.
    fn update<T>(
        &self,
        id: &Identifier,
        op: impl FnOnce(&WriteTransaction) -> Result<T, redb::Error>,
    ) -> StorageResult<T> {
        let txn = self.db.begin_write().map_err(|e| StorageError::io(id, e))?;
        let value = op(&txn).map_err(|e| StorageError::io(id, e))?;
        txn.commit().map_err(|e| StorageError::io(id, e))?;
        Ok(value)
    }
}

impl Repository for BoltDbRepository {
    fn save(&self, photo: Photo) -> StorageResult<Identifier> {
        let (id, data) = photo.into_parts();
        id.validate()?;

        self.update(&id, |txn| {
            let mut table = txn.open_table(PHOTOS)?;
            table.insert(id.value(), data.as_slice())?;
            Ok(())
        })?;

        debug!("Put photo {} ({} bytes) into bucket '{}'", id, data.len(), PHOTOS_BUCKET);
        Ok(id)
    }

    fn read(&self, id: &Identifier) -> StorageResult<Photo> {
        id.validate()?;

        let data = self.update(id, |txn| {
            let table = txn.open_table(PHOTOS)?;
            let data = table.get(id.value())?.map(|guard| guard.value().to_vec());
            Ok(data)
        })?;

        match data {
            Some(data) => {
                debug!("Got photo {} ({} bytes) from bucket '{}'", id, data.len(), PHOTOS_BUCKET);
                Ok(Photo::of(id.clone(), data))
            }
            None => Err(StorageError::not_found(id)),
        }
    }

    fn delete(&self, id: &Identifier) -> StorageResult<()> {
        id.validate()?;

        // Deleting an absent entry commits an empty transaction.
        let removed = self.update(id, |txn| {
            let mut table = txn.open_table(PHOTOS)?;
            let removed = table.remove(id.value())?.is_some();
            Ok(removed)
        })?;

        debug!("Deleted photo {} (present: {})", id, removed);
        Ok(())
    }
}

impl std::fmt::Debug for BoltDbRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoltDbRepository")
            .field("path", &self.path)
            .finish()
    }
}
