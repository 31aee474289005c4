use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::{NewUser, User},
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.\-]{1,64}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

/// Creates a user with the default role. The password is stored hashed.
pub async fn register(st: &AppState, req: RegisterRequest) -> AppResult<User> {
    let username = req.username.trim().to_string();
    if !is_valid_username(&username) {
        warn!(%username, "invalid username");
        return Err(AppError::BadRequest(
            "Username must be 1-64 letters, digits, '_', '.' or '-'.".into(),
        ));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long."
        )));
    }

    if st.users.find_by_username(&username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(AppError::Conflict(format!(
            "Username '{username}' already exists."
        )));
    }

    let password_hash = hash_password(&req.password)?;
    let user = st
        .users
        .create(&NewUser {
            username,
            password_hash,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Validates credentials and returns a signed access token.
pub async fn login(st: &AppState, req: LoginRequest) -> AppResult<String> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required.".into(),
        ));
    }

    let user = match st.users.find_by_username(username).await? {
        Some(u) => u,
        None => {
            warn!(%username, "login unknown username");
            return Err(AppError::NotFound(
                "This user does not exist. Please register first.".into(),
            ));
        }
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized(
            "Invalid credentials. Please try again.".into(),
        ));
    }

    let token = JwtKeys::from_ref(st).sign(user.id, &user.username)?;
    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(token)
}

/// Re-reads the token subject; a deleted user no longer authenticates.
pub async fn current_user(st: &AppState, user_id: i32) -> AppResult<User> {
    st.users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(user_id, "token subject no longer exists");
        AppError::Unauthorized("User not found.".into())
    })
}

pub async fn delete_account(st: &AppState, user_id: i32) -> AppResult<()> {
    if !st.users.delete(user_id).await? {
        return Err(AppError::NotFound("User not found.".into()));
    }
    info!(user_id, "user deleted");
    Ok(())
}
