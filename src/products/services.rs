use tracing::{info, warn};

use crate::{
    categories::{repo_types::Category, services::not_found as category_not_found},
    error::{AppError, AppResult},
    products::{
        dto::{ProductFields, ProductRequest},
        repo_types::{NewProduct, Product},
    },
    state::AppState,
};

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Product with ID {id} not found."))
}

fn check_id(id: i32) -> AppResult<()> {
    if id <= 0 {
        return Err(AppError::BadRequest(
            "Invalid product ID. Please enter a valid product ID.".into(),
        ));
    }
    Ok(())
}

async fn resolve_category(st: &AppState, name: &str) -> AppResult<Category> {
    st.categories
        .find_by_name(name)
        .await?
        .ok_or_else(|| category_not_found(name))
}

fn into_new(fields: ProductFields, category: &Category) -> NewProduct {
    NewProduct {
        name: fields.name,
        description: fields.description,
        price: fields.price,
        category_id: category.id,
    }
}

pub async fn list(st: &AppState) -> AppResult<Vec<Product>> {
    st.products.list().await
}

/// NotFound both for an unknown category and for one without products.
pub async fn list_by_category(st: &AppState, category: &str) -> AppResult<Vec<Product>> {
    let category = resolve_category(st, category).await?;
    let products = st.products.list_by_category(category.id).await?;
    if products.is_empty() {
        return Err(AppError::NotFound(format!(
            "No products found for category '{}'.",
            category.name
        )));
    }
    Ok(products)
}

pub async fn find_by_id(st: &AppState, id: i32) -> AppResult<Product> {
    check_id(id)?;
    st.products.find_by_id(id).await?.ok_or_else(|| not_found(id))
}

pub async fn create(st: &AppState, req: ProductRequest) -> AppResult<Product> {
    let fields = req.validate()?;
    let category = resolve_category(st, &fields.category).await?;

    if st.products.find_by_name(&fields.name).await?.is_some() {
        warn!(name = %fields.name, "product already exists");
        return Err(AppError::Conflict(format!(
            "Product '{}' already exists.",
            fields.name
        )));
    }

    let product = st.products.create(&into_new(fields, &category)).await?;
    info!(product_id = product.id, name = %product.name, category = %product.category, "product created");
    Ok(product)
}

pub async fn update(st: &AppState, id: i32, req: ProductRequest) -> AppResult<Product> {
    check_id(id)?;
    let fields = req.validate()?;
    let existing = st.products.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    let category = resolve_category(st, &fields.category).await?;

    if fields.name != existing.name {
        if let Some(other) = st.products.find_by_name(&fields.name).await? {
            warn!(name = %fields.name, other_id = other.id, "rename onto existing product");
            return Err(AppError::Conflict(format!(
                "Product '{}' already exists.",
                fields.name
            )));
        }
    }

    let product = st
        .products
        .update(id, &into_new(fields, &category))
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(product_id = product.id, name = %product.name, "product updated");
    Ok(product)
}

pub async fn delete(st: &AppState, id: i32) -> AppResult<()> {
    check_id(id)?;
    if !st.products.delete(id).await? {
        return Err(not_found(id));
    }
    info!(product_id = id, "product deleted");
    Ok(())
}
