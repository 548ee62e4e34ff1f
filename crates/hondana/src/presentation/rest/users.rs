use axum::{Extension, Json};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{entities::user::User, services::user::UserService},
    infrastructure::domain::repositories::user::UserRepositoryImpl,
    presentation::token::SessionUser,
};

use super::{error::RestError, response::Envelope};

/// Account payload. The password hash never leaves the service layer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn register(
    Extension(svc): Extension<UserService<UserRepositoryImpl>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Envelope<UserResponse>, RestError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(RestError::bad_request("Name and email are required"));
    }

    let user = svc
        .register(&req.name, &req.email, &req.password)
        .await
        .map_err(|e| RestError::wrap("Failed to create user", e))?;

    Ok(Envelope::created(user.into()))
}

pub async fn profile(
    session: SessionUser,
    Extension(svc): Extension<UserService<UserRepositoryImpl>>,
) -> Result<Envelope<UserResponse>, RestError> {
    let user = svc
        .fetch_user_by_id(session.0.sub)
        .await
        .map_err(|e| RestError::wrap("Failed to fetch user", e))?;

    Ok(Envelope::retrieved(user.into()))
}

pub async fn update_profile(
    session: SessionUser,
    Extension(svc): Extension<UserService<UserRepositoryImpl>>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Envelope<UserResponse>, RestError> {
    let user = svc
        .update_profile(session.0.sub, req.name, req.email, req.password)
        .await
        .map_err(|e| RestError::wrap("Failed to update user", e))?;

    Ok(Envelope::edited(user.into()))
}

pub async fn delete_profile(
    session: SessionUser,
    Extension(svc): Extension<UserService<UserRepositoryImpl>>,
) -> Result<Envelope<()>, RestError> {
    svc.delete_user(session.0.sub)
        .await
        .map_err(|e| RestError::wrap("Failed to delete user", e))?;

    Ok(Envelope::deleted())
}
