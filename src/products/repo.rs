use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    db::{is_foreign_key_violation, is_unique_violation},
    error::{AppError, AppResult},
    products::repo_types::{NewProduct, Product},
};

#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Product>>;
    async fn list_by_category(&self, category_id: i32) -> AppResult<Vec<Product>>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Product>>;
    /// Conflict on a taken name, NotFound when the category vanished meanwhile.
    async fn create(&self, new: &NewProduct) -> AppResult<Product>;
    /// `None` when no product has `id`.
    async fn update(&self, id: i32, new: &NewProduct) -> AppResult<Option<Product>>;
    async fn delete(&self, id: i32) -> AppResult<bool>;
    async fn count_by_category(&self, category_id: i32) -> AppResult<i64>;
}

#[derive(Clone)]
pub struct PgProductRepo {
    db: PgPool,
}

impl PgProductRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn write_error(e: sqlx::Error, new: &NewProduct, action: &'static str) -> AppError {
    if is_unique_violation(&e) {
        AppError::Conflict(format!("Product '{}' already exists.", new.name))
    } else if is_foreign_key_violation(&e) {
        AppError::NotFound(format!("Category with ID {} not found.", new.category_id))
    } else {
        anyhow::Error::new(e).context(action).into()
    }
}

#[async_trait]
impl ProductRepo for PgProductRepo {
    async fn list(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price, c.name AS category
              FROM products p
              JOIN categories c ON c.id = p.category_id
             ORDER BY p.id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list products")?;
        Ok(rows)
    }

    async fn list_by_category(&self, category_id: i32) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price, c.name AS category
              FROM products p
              JOIN categories c ON c.id = p.category_id
             WHERE p.category_id = $1
             ORDER BY p.id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.db)
        .await
        .context("list products by category")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price, c.name AS category
              FROM products p
              JOIN categories c ON c.id = p.category_id
             WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find product by id")?;
        Ok(row)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price, c.name AS category
              FROM products p
              JOIN categories c ON c.id = p.category_id
             WHERE p.name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await
        .context("find product by name")?;
        Ok(row)
    }

    async fn create(&self, new: &NewProduct) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            WITH inserted AS (
                INSERT INTO products (name, description, price, category_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, name, description, price, category_id
            )
            SELECT i.id, i.name, i.description, i.price, c.name AS category
              FROM inserted i
              JOIN categories c ON c.id = i.category_id
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.category_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| write_error(e, new, "insert product"))
    }

    async fn update(&self, id: i32, new: &NewProduct) -> AppResult<Option<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            WITH updated AS (
                UPDATE products
                   SET name = $2, description = $3, price = $4, category_id = $5
                 WHERE id = $1
                RETURNING id, name, description, price, category_id
            )
            SELECT u.id, u.name, u.description, u.price, c.name AS category
              FROM updated u
              JOIN categories c ON c.id = u.category_id
            "#,
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.category_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| write_error(e, new, "update product"))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete product")?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_category(&self, category_id: i32) -> AppResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM products WHERE category_id = $1")
                .bind(category_id)
                .fetch_one(&self.db)
                .await
                .context("count products by category")?;
        Ok(count)
    }
}
