use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Category record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: String,
}

/// Validated fields for insert and update.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub description: String,
}
