use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    categories::repo_types::{Category, CategoryInput},
    db::{is_foreign_key_violation, is_unique_violation},
    error::{AppError, AppResult},
};

#[async_trait]
pub trait CategoryRepo: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Category>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;
    /// Fails with Conflict when the name is taken.
    async fn create(&self, input: &CategoryInput) -> AppResult<Category>;
    /// `None` when no category is called `name`; Conflict when renaming onto a taken name.
    async fn update(&self, name: &str, input: &CategoryInput) -> AppResult<Option<Category>>;
    /// Fails with Conflict while products still reference the category.
    async fn delete(&self, name: &str) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgCategoryRepo {
    db: PgPool,
}

impl PgCategoryRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn name_taken(name: &str) -> AppError {
    AppError::Conflict(format!("Category '{name}' already exists."))
}

#[async_trait]
impl CategoryRepo for PgCategoryRepo {
    async fn list(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description
            FROM categories
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list categories")?;
        Ok(rows)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description
            FROM categories
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await
        .context("find category by name")?;
        Ok(row)
    }

    async fn create(&self, input: &CategoryInput) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                name_taken(&input.name)
            } else {
                anyhow::Error::new(e).context("insert category").into()
            }
        })
    }

    async fn update(&self, name: &str, input: &CategoryInput) -> AppResult<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
               SET name = $2, description = $3
             WHERE name = $1
            RETURNING id, name, description
            "#,
        )
        .bind(name)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                name_taken(&input.name)
            } else {
                anyhow::Error::new(e).context("update category").into()
            }
        })
    }

    async fn delete(&self, name: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE name = $1")
            .bind(name)
            .execute(&self.db)
            .await
            .map_err(|e| -> AppError {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict(format!(
                        "Category '{name}' still has products and cannot be deleted."
                    ))
                } else {
                    anyhow::Error::new(e).context("delete category").into()
                }
            })?;
        Ok(result.rows_affected() > 0)
    }
}
