use tracing::{info, warn};

use crate::{
    categories::{dto::CategoryRequest, repo_types::Category},
    error::{AppError, AppResult},
    state::AppState,
};

pub(crate) fn not_found(name: &str) -> AppError {
    AppError::NotFound(format!("Category '{name}' not found."))
}

pub async fn list(st: &AppState) -> AppResult<Vec<Category>> {
    st.categories.list().await
}

pub async fn find_by_name(st: &AppState, name: &str) -> AppResult<Category> {
    st.categories
        .find_by_name(name)
        .await?
        .ok_or_else(|| not_found(name))
}

pub async fn create(st: &AppState, req: CategoryRequest) -> AppResult<Category> {
    let input = req.validate()?;
    if st.categories.find_by_name(&input.name).await?.is_some() {
        warn!(name = %input.name, "category already exists");
        return Err(AppError::Conflict(format!(
            "Category '{}' already exists.",
            input.name
        )));
    }
    let category = st.categories.create(&input).await?;
    info!(category_id = category.id, name = %category.name, "category created");
    Ok(category)
}

pub async fn update(st: &AppState, name: &str, req: CategoryRequest) -> AppResult<Category> {
    let input = req.validate()?;
    let existing = find_by_name(st, name).await?;

    if input.name != existing.name {
        if let Some(other) = st.categories.find_by_name(&input.name).await? {
            warn!(name = %input.name, other_id = other.id, "rename onto existing category");
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists.",
                input.name
            )));
        }
    }

    let category = st
        .categories
        .update(name, &input)
        .await?
        .ok_or_else(|| not_found(name))?;
    info!(category_id = category.id, name = %category.name, "category updated");
    Ok(category)
}

/// Refuses while any product still belongs to the category.
pub async fn delete(st: &AppState, name: &str) -> AppResult<()> {
    let category = find_by_name(st, name).await?;

    let products = st.products.count_by_category(category.id).await?;
    if products > 0 {
        warn!(category_id = category.id, products, "delete of non-empty category refused");
        return Err(AppError::Conflict(format!(
            "Category '{name}' still has {products} product(s) and cannot be deleted."
        )));
    }

    if !st.categories.delete(name).await? {
        return Err(not_found(name));
    }
    info!(category_id = category.id, %name, "category deleted");
    Ok(())
}
