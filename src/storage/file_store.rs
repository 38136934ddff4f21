//! Local file repository implementation
//!
//! Each photo is one regular file in the base directory, named after its
//! identifier.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info, warn};

use crate::photo::{Identifier, Photo, StorageError, StorageResult};
use crate::storage::Repository;

/// Repository keeping one file per photo
#[derive(Debug)]
pub struct FileRepository {
    base_dir: PathBuf,
    // Distinguishes temp files of concurrent saves within this process.
    temp_counter: AtomicU64,
}

impl FileRepository {
    /// Open the repository rooted at `base_dir`, creating the directory if needed.
    pub fn open(base_dir: impl AsRef<Path>) -> StorageResult<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        if base_dir.exists() && !base_dir.is_dir() {
            return Err(StorageError::open(
                &base_dir,
                io::Error::new(io::ErrorKind::Other, "path exists and is not a directory"),
            ));
        }
        fs::create_dir_all(&base_dir).map_err(|e| StorageError::open(&base_dir, e))?;
        info!("Using file storage directory: {}", base_dir.display());

        Ok(Self {
            base_dir,
            temp_counter: AtomicU64::new(0),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn photo_path(&self, id: &Identifier) -> StorageResult<PathBuf> {
        id.validate_file_name()?;
        Ok(self.base_dir.join(id.value()))
    }

    // Temp names never depend on the identifier, so any legal final name
    // also has a legal temp name.
    fn temp_path(&self) -> PathBuf {
        let counter = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        self.base_dir
            .join(format!(".tmp.{}.{}", std::process::id(), counter))
    }

    /// Write `data` beside the final file, then rename it into place so readers
    /// never see a partially written photo.
    fn write_atomically(&self, target: &Path, data: &[u8]) -> io::Result<()> {
        let temp = self.temp_path();
        let result = File::create(&temp)
            .and_then(|mut file| {
                file.write_all(data)?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&temp, target));

        if result.is_err() {
            if let Err(e) = fs::remove_file(&temp) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!("Failed to clean up temp file {}: {}", temp.display(), e);
                }
            }
        }
        result
    }
}

impl Repository for FileRepository {
    fn save(&self, photo: Photo) -> StorageResult<Identifier> {
        let (id, data) = photo.into_parts();
        let path = self.photo_path(&id)?;

        self.write_atomically(&path, &data)
            .map_err(|e| StorageError::io(&id, e))?;

        debug!("Wrote photo {} ({} bytes) to {}", id, data.len(), path.display());
        Ok(id)
    }

    fn read(&self, id: &Identifier) -> StorageResult<Photo> {
        let path = self.photo_path(id)?;
        let data = fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::not_found(id),
            _ => StorageError::io(id, e),
        })?;

        debug!("Read photo {} ({} bytes) from {}", id, data.len(), path.display());
        Ok(Photo::of(id.clone(), data))
    }

    fn delete(&self, id: &Identifier) -> StorageResult<()> {
        let path = self.photo_path(id)?;
        // A missing file is reported like any other unlink failure.
        fs::remove_file(&path).map_err(|e| StorageError::io(id, e))?;

        debug!("Deleted photo {} at {}", id, path.display());
        Ok(())
    }
}
