use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        claims::Claims,
        dto::{LoginRequest, PublicUser, RegisterRequest},
        extractors::{AuthUser, ACCESS_TOKEN_COOKIE},
        jwt::JwtKeys,
        services,
    },
    config::AppConfig,
    error::{AppError, AppResult, Envelope, MessageResponse},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me).delete(delete_me))
}

fn session_cookie(config: &AppConfig, token: String) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::minutes(config.jwt.ttl_minutes))
        .build()
}

fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build((ACCESS_TOKEN_COOKIE, "")).path("/").build())
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(CookieJar, Envelope)> {
    let Json(payload) = payload?;
    let user = services::register(&state, payload).await?;
    let token = JwtKeys::from_ref(&state).sign(user.id, &user.username)?;

    Ok((
        jar.add(session_cookie(&state.config, token)),
        MessageResponse::new(
            StatusCode::CREATED,
            "User registered and logged in successfully. You can now access authenticated endpoints.",
        ),
    ))
}

/// Only a valid session cookie counts as being logged in; a Bearer header does not.
fn session_claims(state: &AppState, jar: &CookieJar) -> Option<Claims> {
    let token = jar.get(ACCESS_TOKEN_COOKIE)?.value();
    if token.is_empty() {
        return None;
    }
    JwtKeys::from_ref(state).verify(token).ok()
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<(CookieJar, Envelope)> {
    if let Some(claims) = session_claims(&state, &jar) {
        warn!(user_id = claims.sub, "login while already logged in");
        return Err(AppError::Conflict(
            "Already logged in. You can already access authenticated endpoints.".into(),
        ));
    }

    let Json(payload) = payload?;
    let token = services::login(&state, payload).await?;

    Ok((
        jar.add(session_cookie(&state.config, token)),
        MessageResponse::new(
            StatusCode::OK,
            "User successfully logged in. You can now access authenticated endpoints.",
        ),
    ))
}

#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Envelope) {
    if jar.get(ACCESS_TOKEN_COOKIE).is_none() {
        return (
            jar,
            MessageResponse::new(
                StatusCode::OK,
                "There is no user logged in. Already logged out.",
            ),
        );
    }

    info!("user logged out");
    (
        clear_session(jar),
        MessageResponse::new(
            StatusCode::ACCEPTED,
            "User has been logged out. Please login again to access authenticated endpoints.",
        ),
    )
}

#[instrument(skip(state, user))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<PublicUser>> {
    let user = services::current_user(&state, user.sub).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, jar, user))]
pub async fn delete_me(
    State(state): State<AppState>,
    jar: CookieJar,
    AuthUser(user): AuthUser,
) -> AppResult<(CookieJar, Envelope)> {
    services::delete_account(&state, user.sub).await?;
    Ok((
        clear_session(jar),
        MessageResponse::new(
            StatusCode::OK,
            format!("User '{}' has been deleted.", user.username),
        ),
    ))
}
