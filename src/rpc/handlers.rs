// RPC photo service handlers
use std::sync::Arc;

use actix_web::error::ErrorInternalServerError;
use actix_web::{web, Error, HttpResponse};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::app_state::{extract_app_state, AppState};
use crate::photo::{Identifier, StorageResult};
use crate::rpc::message::{
    decode, encode, Empty, IdMessage, PhotoMessage, RpcFailure, RpcResponse, RpcStatus,
};
use crate::service::{read_payload, PhotoService};

/// Run a blocking service call off the async workers
async fn call<R, F>(f: F) -> Result<R, RpcFailure>
where
    F: FnOnce() -> StorageResult<R> + Send + 'static,
    R: Send + 'static,
{
    match web::block(f).await {
        Ok(result) => result.map_err(RpcFailure::from),
        Err(e) => Err(RpcFailure::new(RpcStatus::Internal, e.to_string())),
    }
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T, RpcFailure> {
    decode(body).map_err(|e| {
        warn!("Undecodable RPC request: {}", e);
        RpcFailure::new(RpcStatus::InvalidArgument, format!("malformed request: {}", e))
    })
}

async fn save(service: Arc<PhotoService>, body: &[u8]) -> Result<IdMessage, RpcFailure> {
    let photo = parse::<PhotoMessage>(body)?.into_photo();
    let id = call(move || service.save(photo)).await?;
    Ok(IdMessage::from(&id))
}

async fn find(service: Arc<PhotoService>, body: &[u8]) -> Result<PhotoMessage, RpcFailure> {
    let id = Identifier::of(parse::<IdMessage>(body)?.value);
    log_mdc::insert("photo_id", id.value());
    let photo = call(move || service.find(&id)).await?;
    Ok(PhotoMessage::from(photo))
}

async fn delete(service: Arc<PhotoService>, body: &[u8]) -> Result<Empty, RpcFailure> {
    let id = Identifier::of(parse::<IdMessage>(body)?.value);
    log_mdc::insert("photo_id", id.value());
    call(move || service.delete(&id)).await?;
    Ok(Empty {})
}

fn respond<T: Serialize>(response: RpcResponse<T>) -> Result<HttpResponse, Error> {
    if response.status != RpcStatus::Ok {
        debug!("RPC call failed with {}: {}", response.status, response.message);
    }
    let body = encode(&response).map_err(ErrorInternalServerError)?;
    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .body(body))
}

/// Dispatch one unary call of the photo service
/// Handles requests like: POST /rpc/PhotoService/{method}
pub async fn rpc_handler(
    path: web::Path<String>,
    payload: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let method = path.into_inner();
    let state = extract_app_state(&app_state);
    // Photo bytes plus a little room for the message framing.
    let body = read_payload(payload, state.max_payload_size().saturating_add(1024)).await?;
    let service = Arc::clone(&state.photo_service);
    debug!("RPC call PhotoService/{} ({} bytes)", method, body.len());

    match method.as_str() {
        "Save" => respond(RpcResponse::from(save(service, &body).await)),
        "Find" => respond(RpcResponse::from(find(service, &body).await)),
        "Delete" => respond(RpcResponse::from(delete(service, &body).await)),
        _ => {
            warn!("Unknown RPC method: {}", method);
            respond(RpcResponse::<Empty>::failure(RpcFailure::new(
                RpcStatus::Unimplemented,
                format!("unknown method PhotoService/{}", method),
            )))
        }
    }
}
