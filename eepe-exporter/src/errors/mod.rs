pub mod api;
pub mod auth;
pub mod collection;
pub mod config;

pub use api::ApiError;
pub use auth::AuthError;
pub use collection::CollectionError;
pub use config::ConfigError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();

        let (status, error_message) = match self {
            ApiError::CollectionError(e) => {
                tracing::error!(error_id = ?error_id, "Scrape failed: {}", e);
                (e.status_code(), e.to_string())
            }
            ApiError::EncodingError(e) => {
                tracing::error!(error_id = ?error_id, "Encoding error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": error_message,
                "error_id": error_id.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
