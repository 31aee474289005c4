use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::{AppResult, Envelope, MessageResponse},
    products::{dto::ProductRequest, repo_types::Product, services},
    state::AppState,
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/products/:category", get(list_by_category))
        .route("/products/id/:id", get(get_product))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/id/:id", put(update_product).delete(delete_product))
}

// --- handlers ---

#[instrument(skip(state, user), fields(user_id = user.sub))]
pub async fn list_products(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(services::list(&state).await?))
}

#[instrument(skip(state))]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(services::list_by_category(&state, &category).await?))
}

#[instrument(skip(state, id))]
pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<Product>> {
    let Path(id) = id?;
    Ok(Json(services::find_by_id(&state, id).await?))
}

#[instrument(skip(state, user, payload), fields(user_id = user.sub))]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> AppResult<Envelope> {
    let Json(payload) = payload?;
    let product = services::create(&state, payload).await?;
    Ok(MessageResponse::new(
        StatusCode::CREATED,
        format!("Product '{}' has been created with ID {}.", product.name, product.id),
    ))
}

#[instrument(skip(state, user, id, payload), fields(user_id = user.sub))]
pub async fn update_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> AppResult<Envelope> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    services::update(&state, id, payload).await?;
    Ok(MessageResponse::new(
        StatusCode::OK,
        format!("Product with ID {id} has been successfully updated."),
    ))
}

#[instrument(skip(state, user, id), fields(user_id = user.sub))]
pub async fn delete_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Envelope> {
    let Path(id) = id?;
    services::delete(&state, id).await?;
    Ok(MessageResponse::new(
        StatusCode::OK,
        format!("Product with ID {id} has been successfully deleted."),
    ))
}
