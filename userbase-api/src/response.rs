use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Success body shared by every API route: `{status, message, data}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub message: &'static str,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(message: &'static str, data: T) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Body of the catch-all 404, kept in its historical shape.
#[derive(Debug, Serialize)]
pub struct NotFoundBody {
    pub status: &'static str,
    pub data: &'static str,
}

impl Default for NotFoundBody {
    fn default() -> Self {
        Self {
            status: "failed",
            data: "Not found",
        }
    }
}
