//! RPC messages and status codes
//!
//! Requests and responses are bincode encoded. Every response is wrapped in an
//! [`RpcResponse`] envelope carrying the call status.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::photo::{ErrorKind, Identifier, Photo, StorageError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdMessage {
    pub value: String,
}

impl From<&Identifier> for IdMessage {
    fn from(id: &Identifier) -> Self {
        Self {
            value: id.value().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoMessage {
    pub id: Option<IdMessage>,
    pub image: Vec<u8>,
}

impl PhotoMessage {
    /// Convert into a domain photo; no id means a new photo.
    pub fn into_photo(self) -> Photo {
        match self.id {
            Some(id) => Photo::of(Identifier::of(id.value), self.image),
            None => Photo::new(self.image),
        }
    }
}

impl From<Photo> for PhotoMessage {
    fn from(photo: Photo) -> Self {
        let id = photo.id().map(IdMessage::from);
        Self {
            id,
            image: photo.into_image(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Call status, numbered like the common RPC status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RpcStatus {
    Ok,
    InvalidArgument,
    NotFound,
    Unimplemented,
    Internal,
}

impl RpcStatus {
    pub fn code(&self) -> u32 {
        match self {
            RpcStatus::Ok => 0,
            RpcStatus::InvalidArgument => 3,
            RpcStatus::NotFound => 5,
            RpcStatus::Unimplemented => 12,
            RpcStatus::Internal => 13,
        }
    }
}

impl fmt::Display for RpcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RpcStatus::Ok => "OK",
            RpcStatus::InvalidArgument => "INVALID_ARGUMENT",
            RpcStatus::NotFound => "NOT_FOUND",
            RpcStatus::Unimplemented => "UNIMPLEMENTED",
            RpcStatus::Internal => "INTERNAL",
        };
        f.write_str(name)
    }
}

impl From<ErrorKind> for RpcStatus {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => RpcStatus::NotFound,
            ErrorKind::InvalidInput => RpcStatus::InvalidArgument,
            ErrorKind::IoFailure | ErrorKind::OpenFailure => RpcStatus::Internal,
        }
    }
}

/// A failed call: status plus message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcFailure {
    pub status: RpcStatus,
    pub message: String,
}

impl RpcFailure {
    pub fn new(status: RpcStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<StorageError> for RpcFailure {
    fn from(e: StorageError) -> Self {
        Self::new(e.kind().into(), e.to_string())
    }
}

/// Response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcResponse<T> {
    pub status: RpcStatus,
    pub message: String,
    pub body: Option<T>,
}

impl<T> RpcResponse<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: RpcStatus::Ok,
            message: String::new(),
            body: Some(body),
        }
    }

    pub fn failure(failure: RpcFailure) -> Self {
        Self {
            status: failure.status,
            message: failure.message,
            body: None,
        }
    }

    pub fn into_result(self) -> Result<T, RpcFailure> {
        match (self.status, self.body) {
            (RpcStatus::Ok, Some(body)) => Ok(body),
            (RpcStatus::Ok, None) => Err(RpcFailure::new(RpcStatus::Internal, "missing response body")),
            (status, _) => Err(RpcFailure::new(status, self.message)),
        }
    }
}

impl<T> From<Result<T, RpcFailure>> for RpcResponse<T> {
    fn from(result: Result<T, RpcFailure>) -> Self {
        match result {
            Ok(body) => Self::ok(body),
            Err(failure) => Self::failure(failure),
        }
    }
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(value)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, bincode::Error> {
    bincode::deserialize(bytes)
}
