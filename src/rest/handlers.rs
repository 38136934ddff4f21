// REST photo handlers
use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use futures::StreamExt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app_state::{extract_app_state, AppState};
use crate::photo::{Identifier, Photo};
use crate::rest::detect_content_type;
use crate::rest::error::ErrorBody;
use crate::service::{collect_limited, read_payload};

/// Form field carrying the photo in multipart uploads
pub const PHOTO_FIELD: &str = "photo";

/// Body of a successful upload
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub id: String,
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// Read the uploaded photo: the `photo` field of a multipart form, or the raw
/// body for any other content type. A form without that field yields no data.
async fn read_upload(
    req: &HttpRequest,
    payload: web::Payload,
    limit: usize,
) -> Result<Vec<u8>, Error> {
    if !is_multipart(req) {
        return read_payload(payload, limit).await;
    }

    let mut form = Multipart::new(req.headers(), payload);
    while let Some(field) = form.next().await {
        let field = field?;
        if field.name() == Some(PHOTO_FIELD) {
            return collect_limited(field, limit).await;
        }
        debug!("Skipping form field {:?}", field.name());
    }
    warn!("Multipart upload without a {} field", PHOTO_FIELD);
    Ok(Vec::new())
}

fn empty_payload() -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorBody {
        error: "No data was uploaded".to_string(),
    })
}

/// Upload a new photo
/// Handles requests like: POST /photos/
pub async fn post_photo_handler(
    req: HttpRequest,
    payload: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let state = extract_app_state(&app_state);
    let data = read_upload(&req, payload, state.max_payload_size()).await?;
    if data.is_empty() {
        warn!("Empty payload for POST request");
        return Ok(empty_payload());
    }

    let service = Arc::clone(&state.photo_service);
    let id = web::block(move || service.save(Photo::new(data))).await??;

    log_mdc::insert("photo_id", id.value());
    info!("Created photo {}", id);
    Ok(HttpResponse::Created().json(Created {
        id: id.value().to_string(),
    }))
}

/// Download a photo
/// Handles requests like: GET /photos/{id}
pub async fn get_photo_handler(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = Identifier::of(path.into_inner());
    log_mdc::insert("photo_id", id.value());
    debug!("GET photo {}", id);

    let service = Arc::clone(&extract_app_state(&app_state).photo_service);
    let photo = web::block(move || service.find(&id)).await??;

    let data = photo.into_image();
    Ok(HttpResponse::Ok()
        .content_type(detect_content_type(&data))
        .body(data))
}

/// Replace the photo stored under an identifier
/// Handles requests like: PUT /photos/{id}
pub async fn put_photo_handler(
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = Identifier::of(path.into_inner());
    log_mdc::insert("photo_id", id.value());
    debug!("PUT photo {}", id);

    let state = extract_app_state(&app_state);
    let data = read_upload(&req, payload, state.max_payload_size()).await?;
    if data.is_empty() {
        warn!("Empty payload for PUT request on {}", id);
        return Ok(empty_payload());
    }

    let service = Arc::clone(&state.photo_service);
    let id = web::block(move || service.save(Photo::of(id, data))).await??;
    info!("Replaced photo {}", id);
    Ok(HttpResponse::Ok().finish())
}

/// Delete a photo
/// Handles requests like: DELETE /photos/{id}
pub async fn delete_photo_handler(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = Identifier::of(path.into_inner());
    log_mdc::insert("photo_id", id.value());
    debug!("DELETE photo {}", id);

    let service = Arc::clone(&extract_app_state(&app_state).photo_service);
    let deleted = id.clone();
    web::block(move || service.delete(&deleted)).await??;
    info!("Deleted photo {}", id);
    Ok(HttpResponse::Ok().finish())
}
