use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    categories::{dto::CategoryRequest, repo_types::Category, services},
    error::{AppResult, Envelope, MessageResponse},
    state::AppState,
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/:name", get(get_category))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category))
        .route("/categories/:name", put(update_category).delete(delete_category))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(services::list(&state).await?))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Category>> {
    Ok(Json(services::find_by_name(&state, &name).await?))
}

#[instrument(skip(state, user, payload), fields(user_id = user.sub))]
pub async fn create_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> AppResult<Envelope> {
    let Json(payload) = payload?;
    let category = services::create(&state, payload).await?;
    Ok(MessageResponse::new(
        StatusCode::CREATED,
        format!("Category '{}' has been created.", category.name),
    ))
}

#[instrument(skip(state, user, payload), fields(user_id = user.sub))]
pub async fn update_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(name): Path<String>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> AppResult<Envelope> {
    let Json(payload) = payload?;
    let category = services::update(&state, &name, payload).await?;
    Ok(MessageResponse::new(
        StatusCode::OK,
        format!("Category '{}' has been successfully updated.", category.name),
    ))
}

#[instrument(skip(state, user), fields(user_id = user.sub))]
pub async fn delete_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(name): Path<String>,
) -> AppResult<Envelope> {
    services::delete(&state, &name).await?;
    Ok(MessageResponse::new(
        StatusCode::ACCEPTED,
        format!("Category '{name}' has been deleted from database."),
    ))
}
