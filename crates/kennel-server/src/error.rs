//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`kennel_core::Error`] so that route
//! handlers can return `Result<T, AppError>` and use `?` on service calls.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError(kennel_core::Error);

impl AppError {
    pub fn new(inner: kennel_core::Error) -> Self {
        Self(inner)
    }
}

impl From<kennel_core::Error> for AppError {
    fn from(e: kennel_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.0,
                "Server error in API handler"
            );
        }

        let body = json!({
            "error": self.0.to_string(),
            "code": self.0.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kennel_core::Error;

    #[test]
    fn not_found_produces_404() {
        let response = AppError::new(Error::not_found("photo", 7)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn mismatch_produces_404() {
        let response = AppError::from(Error::mismatch(1, 2)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_produces_409() {
        let response = AppError::from(Error::Conflict("row changed".into())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn io_produces_500() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let response = AppError::from(Error::from(io)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
