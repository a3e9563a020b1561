use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::error::ApiError;
use crate::modules::auth::interface::UserRepository;
use crate::modules::auth::model::User;
use crate::AppState;

pub const SESSION_COOKIE: &str = "session";

const SESSION_DAYS: i64 = 7;

/// HTTP-only signed-token cookie carrying the session.
/// SameSite=None requires Secure, so cross-site deployments must run HTTPS.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_secure(secure);
    cookie.set_same_site(if secure { SameSite::None } else { SameSite::Lax });
    cookie.set_max_age(time::Duration::days(SESSION_DAYS));
    cookie
}

pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_secure(secure);
    cookie.set_same_site(if secure { SameSite::None } else { SameSite::Lax });
    cookie.set_max_age(time::Duration::ZERO);
    cookie
}

/// Extractor resolving the session cookie to the full user record.
/// Handlers that take `CurrentUser` are session-protected.
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| ApiError::unauthorized("Not logged in"))?;

        let data = state
            .jwt_service
            .verify_session_token(&token)
            .map_err(|_| ApiError::unauthorized("Invalid or expired session"))?;

        let user = state
            .users
            .find_by_id(&data.claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

        Ok(CurrentUser(user))
    }
}
