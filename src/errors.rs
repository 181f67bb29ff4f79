use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::helpers::escape_html;

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status code
    pub error: u16,
    /// Human-readable error message
    #[serde(rename = "errDescription")]
    pub err_description: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The weather API answered with an embedded `{error: {code, message}}` body.
    #[error("[Code {code}]: {message}")]
    Remote { code: i64, message: String },

    #[error("Could not connect to {0}")]
    Network(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Map a weather API error code to the HTTP status class shown to the user.
pub fn status_for_remote_code(code: i64) -> StatusCode {
    match code {
        1003 | 1005 | 1006 | 9999 => StatusCode::BAD_REQUEST,
        1002 | 2006 => StatusCode::UNAUTHORIZED,
        2007 | 2008 => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The page that replaces the whole visible surface once anything fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPage {
    pub status: StatusCode,
    pub detail: String,
}

impl ErrorPage {
    pub fn to_html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html><head><title>Error {status}</title></head>\n<body>\
             <h1>Error {status}</h1><br>{detail}</body></html>\n",
            status = self.status.as_u16(),
            detail = self.detail,
        )
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Remote { code, .. } => status_for_remote_code(*code),
            AppError::Network(_) | AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn page(&self) -> ErrorPage {
        let detail = match self {
            AppError::Remote { code, message } => format!(
                "<strong>[Code {}]</strong>: {}",
                code,
                escape_html(message)
            ),
            AppError::Network(_) => "Could not connect to the weather service.".to_string(),
            other => escape_html(&other.to_string()),
        };
        ErrorPage {
            status: self.status(),
            detail,
        }
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        (self.status, Html(self.to_html())).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Remote { .. } | AppError::Network(_) | AppError::ExternalServiceError(_) => {
                tracing::error!("Request failed: {}", self);
            }
            AppError::BadRequest(_) => {
                tracing::debug!("Rejected request: {}", self);
            }
        }
        self.page().into_response()
    }
}
