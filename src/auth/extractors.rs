use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use super::{claims::Claims, jwt::JwtKeys};
use crate::{error::AppError, state::AppState};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Per-request gate: finds a token and checks it, without shaping errors.
pub struct AuthGuard {
    keys: JwtKeys,
}

impl AuthGuard {
    pub fn new(keys: JwtKeys) -> Self {
        Self { keys }
    }

    /// `Some(claims)` when the request carries a valid token.
    pub fn authorize(&self, headers: &HeaderMap) -> Option<Claims> {
        let token = token_from_headers(headers)?;
        match self.keys.verify(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!(error = %e, "token rejected");
                None
            }
        }
    }
}

impl FromRef<AppState> for AuthGuard {
    fn from_ref(state: &AppState) -> Self {
        Self::new(JwtKeys::from_ref(state))
    }
}

/// Cookie first, then `Authorization: Bearer`.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    let auth = headers.get(AUTHORIZATION)?.to_str().ok()?;
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Identity of the caller, attached once the guard lets the request through.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let guard = AuthGuard::from_ref(state);
        guard.authorize(&parts.headers).map(AuthUser).ok_or_else(|| {
            AppError::Unauthorized(
                "Authentication required. Please login first to access this endpoint.".into(),
            )
        })
    }
}
