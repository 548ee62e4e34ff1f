use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::domain::entities::query::PageMeta;

/// Uniform response shape: `{ success, message, data }`, with `meta`
/// alongside `data` for paginated payloads.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    #[serde(skip)]
    status: StatusCode,
    success: bool,
    message: String,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<PageMeta>,
}

impl<T: Serialize> Envelope<T> {
    fn new(status: StatusCode, message: &str, data: Option<T>, meta: Option<PageMeta>) -> Self {
        Self {
            status,
            success: true,
            message: message.to_string(),
            data,
            meta,
        }
    }

    pub fn retrieved(data: T) -> Self {
        Self::new(StatusCode::OK, "Data retrieved successfully", Some(data), None)
    }

    pub fn page(data: T, meta: PageMeta) -> Self {
        Self::new(
            StatusCode::OK,
            "Data retrieved successfully",
            Some(data),
            Some(meta),
        )
    }

    pub fn created(data: T) -> Self {
        Self::new(
            StatusCode::CREATED,
            "Data successfully added",
            Some(data),
            None,
        )
    }

    pub fn edited(data: T) -> Self {
        Self::new(StatusCode::OK, "Data successfully edited", Some(data), None)
    }

    pub fn logged_in(data: T) -> Self {
        Self::new(StatusCode::OK, "Login successful", Some(data), None)
    }
}

impl Envelope<()> {
    pub fn deleted() -> Self {
        Self::new(StatusCode::OK, "Data successfully deleted", None, None)
    }

    pub fn message(message: &str) -> Self {
        Self::new(StatusCode::OK, message, None, None)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = self.status;

        (status, Json(self)).into_response()
    }
}
