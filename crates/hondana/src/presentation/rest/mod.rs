pub mod auth;
pub mod books;
pub mod chapters;
pub mod error;
pub mod genres;
pub mod health;
pub mod response;
pub mod users;

use serde::Deserialize;

use crate::domain::entities::query::SortDirection;

use self::error::RestError;

/// Common listing parameters: `?page=&limit=&sortBy=`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<SortDirection>,
}

pub async fn not_found() -> RestError {
    RestError::not_found("Route not found")
}
