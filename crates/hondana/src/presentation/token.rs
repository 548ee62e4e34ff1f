use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::infrastructure::auth::{self, Claims};

use super::rest::error::RestError;

pub const SESSION_COOKIE: &str = "authToken";

/// Signing material shared with every handler through a request extension.
#[derive(Clone)]
pub struct AuthContext {
    pub secret: String,
    pub token_expiry_days: u64,
}

/// Claims of the session cookie. Extracting this rejects requests without
/// a valid cookie.
pub struct SessionUser(pub Claims);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<AuthContext>()
            .ok_or_else(|| RestError::internal("authentication is not configured"))?;

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .ok_or_else(|| RestError::unauthorized("No token provided"))?;

        let claims = auth::decode_jwt(&ctx.secret, token.value())
            .map_err(|_| RestError::unauthorized("Invalid or expired token"))?;

        Ok(SessionUser(claims))
    }
}

pub fn session_cookie(token: String, expiry_days: u64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Strict)
        .max_age(Duration::days(expiry_days as i64))
        .build()
}

/// Cookie with the same name and path as the session cookie, for removal.
pub fn stale_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("token".to_string(), 7);

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }
}
