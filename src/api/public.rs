//! Public API types

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};

// Errors

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorDetail {
    pub kind: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// A non-2xx response with a `{"error": {"kind", "message"}}` body
pub struct ErrorResponse {
    status: StatusCode,
    body: ErrorBody,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, kind: &str, message: &str) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: ErrorDetail {
                    kind: kind.to_string(),
                    message: message.to_string(),
                },
            },
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        // Always log the error
        tracing::error!(
            status = self.status.as_u16(),
            kind = %self.body.error.kind,
            "{}",
            self.body.error.message
        );

        (self.status, Json(self.body)).into_response()
    }
}

// Re-export public types from each route

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}

pub mod health {
    pub use crate::api::routes::health::public::*;
}
