//! Service layer sitting between the transports and the repository

pub mod photo_service;

pub use photo_service::PhotoService;

use std::fmt;

use actix_web::error::ErrorPayloadTooLarge;
use actix_web::{web, Error};
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use log::warn;

/// Collect a byte stream, refusing anything larger than `limit` bytes.
pub async fn collect_limited<S, E>(mut stream: S, limit: usize) -> Result<Vec<u8>, Error>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<Error> + fmt::Display,
{
    let mut bytes = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| -> Error {
            warn!("Error reading payload chunk: {}", e);
            e.into()
        })?;
        if bytes.len() + chunk.len() > limit {
            warn!("Payload exceeds the limit of {} bytes", limit);
            return Err(ErrorPayloadTooLarge(format!(
                "payload exceeds the limit of {} bytes",
                limit
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes.to_vec())
}

/// Collect a request body, refusing anything larger than `limit` bytes.
pub async fn read_payload(payload: web::Payload, limit: usize) -> Result<Vec<u8>, Error> {
    collect_limited(payload, limit).await
}
