use std::time::{Duration, SystemTime};

use axum::{Extension, Json, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::{
    domain::services::user::{UserError, UserService},
    infrastructure::{
        auth::{self, Claims},
        domain::repositories::user::UserRepositoryImpl,
    },
    presentation::token::{AuthContext, session_cookie, stale_session_cookie},
};

use super::{error::RestError, response::Envelope, users::UserResponse};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    jar: CookieJar,
    Extension(svc): Extension<UserService<UserRepositoryImpl>>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, RestError> {
    let user = svc
        .verify_user(&req.email, &req.password)
        .await
        .map_err(|e| match e {
            UserError::UserNotFound | UserError::WrongPassword => {
                RestError::unauthorized("Invalid credentials")
            }
            e => RestError::wrap("Failed to login", e),
        })?;

    let current_time = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| RestError::internal(format!("{e}")))?;
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        exp: (current_time + Duration::from_secs(ctx.token_expiry_days * 24 * 60 * 60)).as_secs()
            as usize,
    };
    let token = auth::encode_jwt(&ctx.secret, &claims)
        .map_err(|e| RestError::internal(format!("{e}")))?;

    info!("user {} logged in", user.id);

    Ok((
        jar.add(session_cookie(token, ctx.token_expiry_days)),
        Envelope::logged_in(UserResponse::from(user)),
    ))
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        jar.remove(stale_session_cookie()),
        Envelope::message("Logout successful"),
    )
}
