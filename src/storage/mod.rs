//! Photo Storage Layer Abstraction
//!
//! This module provides one repository contract implemented by several
//! physical engines (plain files, an embedded log-structured store and an
//! embedded B-tree store), so higher-level services never depend on which
//! engine was configured.

pub mod boltdb_store;
pub mod config;
pub mod file_store;
pub mod leveldb_store;
pub mod mock_store;


use crate::photo::{Identifier, Photo, StorageResult};

/// Trait defining the photo repository interface
///
/// Calls are synchronous and may block on disk I/O.
pub trait Repository: Send + Sync {
    /// Store a photo, minting an identifier when the photo is new.
    ///
    /// Always overwrites whatever was stored under the effective identifier,
    /// which is returned on success.
    fn save(&self, photo: Photo) -> StorageResult<Identifier>;

    /// Read the photo stored under `id`.
    ///
    /// Fails with [`ErrorKind::NotFound`](crate::photo::ErrorKind::NotFound)
    /// when nothing is stored there.
    fn read(&self, id: &Identifier) -> StorageResult<Photo>;

    /// Remove the photo stored under `id`.
    ///
    /// Whether removing an absent key is an error depends on the engine.
    fn delete(&self, id: &Identifier) -> StorageResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::ErrorKind;
    use crate::storage::mock_store::MockRepository;
    use std::sync::Arc;

    #[test]
    fn test_repository_is_object_safe() {
        let repository: Arc<dyn Repository> = Arc::new(MockRepository::new());
        let id = repository.save(Photo::new(b"hello".to_vec())).unwrap();
        assert_eq!(repository.read(&id).unwrap().image(), b"hello");
        repository.delete(&id).unwrap();
        assert_eq!(repository.read(&id).unwrap_err().kind(), ErrorKind::NotFound);
    }
}
