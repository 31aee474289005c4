use serde::Deserialize;

use super::repo_types::CategoryInput;
use crate::error::{AppError, AppResult};

/// Body of `POST /categories` and `PUT /categories/:name`.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub description: String,
}

impl CategoryRequest {
    pub fn validate(self) -> AppResult<CategoryInput> {
        let name = self.name.trim();
        let description = self.description.trim();
        if name.is_empty() || description.is_empty() {
            return Err(AppError::BadRequest(
                "Failed validation. Category name and description must not be empty.".into(),
            ));
        }
        Ok(CategoryInput {
            name: name.to_string(),
            description: description.to_string(),
        })
    }
}
