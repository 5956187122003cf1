use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use scout_common::error::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("too many requests")]
    RateLimited,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message,
                    details: None,
                },
            ),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorBody {
                    error: "Too many requests. Please try again later.".to_string(),
                    details: None,
                },
            ),
            AppError::Provider(e) => {
                // Upstream detail is logged, not echoed to the client.
                error!(error = %e, "search provider request failed");
                let details = match e {
                    ProviderError::Timeout => Some("search provider timed out".to_string()),
                    _ => None,
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Search failed".to_string(),
                        details,
                    },
                )
            }
            AppError::Config(message) => {
                error!(error = %message, "configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Internal server error".to_string(),
                        details: None,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
