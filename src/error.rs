//! Error types for the APIM proxy
//!
//! Every failure is turned into a `{code, message, description}` JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::apim::{ConfigError, Resource, ServerRole};
use crate::auth::CookieError;

const PROCESSING_FAILED: &str = "Error occurred while processing server response.";

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unable to find {} server URL.", .0.display_name())]
    MissingServerUrl(ServerRole),

    #[error(transparent)]
    InvalidCookie(#[from] CookieError),

    #[error("Error occurred while retrieving {} server URL.", .role.display_name())]
    Configuration {
        role: ServerRole,
        #[source]
        source: ConfigError,
    },

    #[error("{}", .resource.failure_message())]
    UpstreamStatus {
        resource: Resource,
        status: StatusCode,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status code
    pub code: u16,
    pub message: String,
    /// Underlying cause, when one is worth reporting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingServerUrl(_) | AppError::InvalidCookie(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, description) = match &self {
            AppError::MissingServerUrl(_)
            | AppError::InvalidCookie(_)
            | AppError::UpstreamStatus { .. } => (self.to_string(), None),
            AppError::Configuration { source, .. } => (self.to_string(), Some(source.to_string())),
            AppError::Http(e) => (PROCESSING_FAILED.to_string(), Some(e.to_string())),
            AppError::Json(e) => (PROCESSING_FAILED.to_string(), Some(e.to_string())),
        };

        match &self {
            AppError::UpstreamStatus { resource, status } => {
                error!(operation = resource.operation(), upstream_status = %status, "APIM returned a non-success status");
            }
            _ if status.is_server_error() => error!(error = %self, "Request failed"),
            _ => warn!(error = %self, "Rejected request"),
        }

        let body = ErrorResponse {
            code: status.as_u16(),
            message,
            description,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
