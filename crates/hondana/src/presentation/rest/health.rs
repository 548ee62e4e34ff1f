use axum::{Json, response};
use serde_json::json;

pub async fn health_check() -> impl response::IntoResponse {
    response::Html("OK")
}

pub async fn index() -> impl response::IntoResponse {
    Json(json!({ "message": "API is online!" }))
}
