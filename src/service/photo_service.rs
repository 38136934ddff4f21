//! Photo service that provides a clean interface to the repository abstraction

use std::sync::Arc;

use log::{debug, warn};

use crate::photo::{Identifier, Photo, StorageResult};
use crate::storage::Repository;

/// Stateless pass-through to the configured repository
#[derive(Clone)]
pub struct PhotoService {
    repository: Arc<dyn Repository>,
}

impl PhotoService {
    /// Create a new photo service with injected repository
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Store a photo and return the identifier it was stored under
    pub fn save(&self, photo: Photo) -> StorageResult<Identifier> {
        let is_new = photo.is_new();
        let size = photo.image().len();
        match self.repository.save(photo) {
            Ok(id) => {
                debug!("Saved photo {} ({} bytes, new: {})", id, size, is_new);
                Ok(id)
            }
            Err(e) => {
                warn!("Failed to save photo ({} bytes): {}", size, e);
                Err(e)
            }
        }
    }

    /// Look up the photo stored under `id`
    pub fn find(&self, id: &Identifier) -> StorageResult<Photo> {
        self.repository.read(id).map_err(|e| {
            warn!("Failed to find photo {}: {}", id, e);
            e
        })
    }

    /// Remove the photo stored under `id`
    pub fn delete(&self, id: &Identifier) -> StorageResult<()> {
        self.repository.delete(id).map_err(|e| {
            warn!("Failed to delete photo {}: {}", id, e);
            e
        })?;
        debug!("Deleted photo {}", id);
        Ok(())
    }
}
