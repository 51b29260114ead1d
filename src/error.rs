use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::auth::flow::FlowError;
use crate::store::StoreError;

/// Request-level error taxonomy.
///
/// Validation and credential failures are user-correctable and reported
/// inline; a store failure is fatal for the render since proceeding would
/// show wrong or no data.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<FlowError> for ApiError {
    fn from(e: FlowError) -> Self {
        match e {
            FlowError::UnknownPhone
            | FlowError::WrongPassword
            | FlowError::WrongCurrentPassword
            | FlowError::WrongAdminPassword => ApiError::Unauthorized(e.to_string()),
            _ => ApiError::Validation(e.to_string()),
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Store(e) = self {
            tracing::error!(error = %e, "Store unreachable; aborting render");
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "backend store unavailable" }));
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
