pub mod events;
pub mod feeds;
pub mod view;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use semcal_core::Layout;
use serde::{Deserialize, Serialize};

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert anyhow errors to HTTP responses
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError {
            status: StatusCode::NOT_FOUND,
            error: anyhow::anyhow!(message.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.error.to_string(),
        });
        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: err.into(),
        }
    }
}

/// `?layout=list` selects the semester list; the grid is the default.
#[derive(Debug, Deserialize)]
pub struct LayoutParam {
    #[serde(default = "default_layout")]
    pub layout: Layout,
}

fn default_layout() -> Layout {
    Layout::Grid
}

fn no_semester() -> AppError {
    AppError::not_found("No semester feed configured")
}
