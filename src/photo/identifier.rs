//! Photo identifiers
//!
//! An identifier is the only key a stored photo is known by. It is either
//! supplied by the caller or generated from the photo content salted with the
//! current time.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::photo::error::{StorageError, StorageResult};

// Bumped on every generation so two calls inside the same clock tick still
// produce different salts.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Longest key in bytes; the file engine stores it as a single file name.
pub const MAX_IDENTIFIER_LEN: usize = 255;

/// Opaque string key addressing one stored photo
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier {
    value: String,
}

impl Identifier {
    /// Generate a fresh identifier for `data`.
    ///
    /// The content is hashed first, then the hex digest is hashed again together
    /// with a nanosecond timestamp and a process-wide sequence number. The result
    /// is a 32 character lowercase hex string.
    pub fn generate(data: &[u8]) -> Self {
        let data_hash = hex::encode(md5::compute(data).0);
        let now = Utc::now();
        let nanos = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let salted = format!("{}{}.{}", data_hash, nanos, sequence);
        Self {
            value: hex::encode(md5::compute(salted.as_bytes()).0),
        }
    }

    /// Wrap a caller-chosen key verbatim
    pub fn of(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }

    /// Reject keys no engine can store.
    pub fn validate(&self) -> StorageResult<()> {
        if self.value.is_empty() {
            return Err(StorageError::invalid(self, "identifier must not be empty"));
        }
        if self.value.len() > MAX_IDENTIFIER_LEN {
            return Err(StorageError::invalid(self, "identifier longer than 255 bytes"));
        }
        Ok(())
    }

    /// Reject keys that would escape a storage directory when used as a file name.
    pub fn validate_file_name(&self) -> StorageResult<()> {
        self.validate()?;
        if self.value.starts_with('.') {
            return Err(StorageError::invalid(self, "identifier must not start with '.'"));
        }
        if self.value.contains(|c: char| c == '/' || c == '\\') {
            return Err(StorageError::invalid(self, "identifier must not contain path separators"));
        }
        if self.value.contains('\0') {
            return Err(StorageError::invalid(self, "identifier must not contain NUL"));
        }
        Ok(())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::of(value)
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::of(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::error::ErrorKind;
    use std::collections::HashSet;

    #[test]
    fn test_generated_identifiers_are_unique() {
        let ids: HashSet<Identifier> = (0..1000)
            .map(|_| Identifier::generate(b"hello world."))
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_generated_identifier_is_hex() {
        let id = Identifier::generate(b"image");
        assert_eq!(id.value().len(), 32);
        assert!(id.value().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_identifier_of_keeps_value() {
        let id = Identifier::of("example_id");
        assert_eq!(id.value(), "example_id");
        assert_eq!(id.to_string(), "example_id");
        assert_eq!(id.as_bytes(), b"example_id");
    }

    #[test]
    fn test_validate_rejects_empty() {
        let err = Identifier::of("").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_validate_length_limit() {
        assert!(Identifier::of("a".repeat(MAX_IDENTIFIER_LEN)).validate().is_ok());
        let err = Identifier::of("b".repeat(MAX_IDENTIFIER_LEN + 1)).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        // the limit counts bytes, not characters
        assert!(Identifier::of("é".repeat(128)).validate().is_err());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(Identifier::of("abc123").validate_file_name().is_ok());
        assert!(Identifier::of("photo.jpg").validate_file_name().is_ok());

        for bad in ["", ".", "..", "../etc/passwd", "a/b", "a\\b", ".hidden", "a\0b"] {
            let err = Identifier::of(bad).validate_file_name().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{:?} should be rejected", bad);
        }
    }
}
