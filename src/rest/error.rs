//! HTTP mapping of storage errors

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::photo::{ErrorKind, StorageError};

/// Error body returned by the REST front end
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ResponseError for StorageError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::IoFailure | ErrorKind::OpenFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::Identifier;

    #[test]
    fn test_status_codes() {
        let id = Identifier::of("id");
        assert_eq!(StorageError::not_found(&id).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(StorageError::invalid(&id, "bad").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            StorageError::io(&id, "disk full").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            StorageError::open("/photos", "locked").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
