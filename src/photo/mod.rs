//! Photo domain model
//!
//! A [`Photo`] pairs an optional [`Identifier`] with its payload. Photos built
//! without an identifier are "new" and get one minted when saved.

pub mod error;
pub mod identifier;

pub use error::{BoxError, ErrorKind, StorageError, StorageResult};
pub use identifier::Identifier;

/// Transient photo value handed to and returned from a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    id: Option<Identifier>,
    image: Vec<u8>,
}

impl Photo {
    /// A photo that has not been assigned an identifier yet
    pub fn new(image: impl Into<Vec<u8>>) -> Self {
        Self {
            id: None,
            image: image.into(),
        }
    }

    /// A photo addressed by an existing identifier
    pub fn of(id: Identifier, image: impl Into<Vec<u8>>) -> Self {
        Self {
            id: Some(id),
            image: image.into(),
        }
    }

    pub fn id(&self) -> Option<&Identifier> {
        self.id.as_ref()
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn into_image(self) -> Vec<u8> {
        self.image
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Split into the identifier to store under and the payload, minting a new
    /// identifier when the photo is new.
    pub fn into_parts(self) -> (Identifier, Vec<u8>) {
        let id = match self.id {
            Some(id) => id,
            None => Identifier::generate(&self.image),
        };
        (id, self.image)
    }
}
