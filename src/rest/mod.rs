//! REST front end
//!
//! ```text
//! POST   /photos/      photo upload         -> 201 {"id": "..."}
//! GET    /photos/{id}                       -> 200 photo bytes
//! PUT    /photos/{id}  photo upload         -> 200
//! DELETE /photos/{id}                       -> 200
//! ```
//!
//! An upload is the `photo` field of a `multipart/form-data` body, or the raw
//! request body for any other content type.

pub mod error;
pub mod handlers;

use actix_web::web;

use handlers::{delete_photo_handler, get_photo_handler, post_photo_handler, put_photo_handler};

/// Mount the photo routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/photos")
            .route("", web::post().to(post_photo_handler))
            .route("/", web::post().to(post_photo_handler))
            .route("/{id}", web::get().to(get_photo_handler))
            .route("/{id}", web::put().to(put_photo_handler))
            .route("/{id}", web::delete().to(delete_photo_handler)),
    );
}

/// Guess the content type of a photo from its leading bytes
pub fn detect_content_type(data: &[u8]) -> &'static str {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        "image/gif"
    } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        "image/webp"
    } else if data.starts_with(b"BM") {
        "image/bmp"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_content_type() {
        assert_eq!(detect_content_type(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(detect_content_type(b"\x89PNG\r\n\x1a\n...."), "image/png");
        assert_eq!(detect_content_type(b"GIF89a...."), "image/gif");
        assert_eq!(detect_content_type(b"RIFF\x00\x00\x00\x00WEBPVP8 "), "image/webp");
        assert_eq!(detect_content_type(b"BM......"), "image/bmp");
        assert_eq!(detect_content_type(b"hello"), "application/octet-stream");
        assert_eq!(detect_content_type(b""), "application/octet-stream");
    }
}
