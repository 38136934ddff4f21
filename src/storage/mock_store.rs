//! Mock implementation of Repository trait for testing

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::info;

use crate::photo::{Identifier, Photo, StorageError, StorageResult};
use crate::storage::Repository;

/// In-memory repository with the same semantics as the embedded stores
/// (deleting an absent key succeeds).
#[derive(Debug, Clone, Default)]
pub struct MockRepository {
    data: Arc<Mutex<HashMap<Identifier, Vec<u8>>>>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Identifier, Vec<u8>>> {
        // A panicking test thread must not hide the data from the others.
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get the number of photos in the store
    pub fn photo_count(&self) -> usize {
        self.lock().len()
    }

    /// Check if a photo exists
    pub fn photo_exists(&self, id: &Identifier) -> bool {
        self.lock().contains_key(id)
    }

    /// Clear all data from the store
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Repository for MockRepository {
    fn save(&self, photo: Photo) -> StorageResult<Identifier> {
        let (id, data) = photo.into_parts();
        id.validate()?;
        info!("Mock: Wrote photo {} with size {}", id, data.len());
        self.lock().insert(id.clone(), data);
        Ok(id)
    }

    fn read(&self, id: &Identifier) -> StorageResult<Photo> {
        id.validate()?;
        let store = self.lock();
        let data = store.get(id).ok_or_else(|| StorageError::not_found(id))?;
        info!("Mock: Read photo {} with size {}", id, data.len());
        Ok(Photo::of(id.clone(), data.clone()))
    }

    fn delete(&self, id: &Identifier) -> StorageResult<()> {
        id.validate()?;
        self.lock().remove(id);
        info!("Mock: Deleted photo {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::ErrorKind;

    #[test]
    fn test_mock_repository_basic_operations() {
        let store = MockRepository::new();
        assert_eq!(store.photo_count(), 0);

        let id = store.save(Photo::new(b"Hello, Mock Storage!".to_vec())).unwrap();
        assert!(store.photo_exists(&id));
        assert_eq!(store.read(&id).unwrap().image(), b"Hello, Mock Storage!");

        store.delete(&id).unwrap();
        assert!(!store.photo_exists(&id));
        assert_eq!(store.photo_count(), 0);
    }

    #[test]
    fn test_mock_repository_error_cases() {
        let store = MockRepository::new();
        let missing = Identifier::of("nonexistent");

        assert_eq!(store.read(&missing).unwrap_err().kind(), ErrorKind::NotFound);
        store.delete(&missing).unwrap();
    }

    #[test]
    fn test_mock_repository_clones_share_data() {
        let store = MockRepository::new();
        let clone = store.clone();
        store.save(Photo::of(Identifier::of("shared"), b"data".to_vec())).unwrap();
        assert!(clone.photo_exists(&Identifier::of("shared")));

        clone.clear();
        assert_eq!(store.photo_count(), 0);
    }
}
