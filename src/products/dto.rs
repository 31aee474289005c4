use std::str::FromStr;

use rust_decimal::{prelude::FromPrimitive, Decimal, RoundingStrategy};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Largest value a `NUMERIC(12, 2)` column holds.
fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// Prices arrive either as JSON numbers or as numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

/// Body of `POST /products` and `PUT /products/id/:id`.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub description: String,
    pub price: PriceInput,
    /// Category name.
    pub category: String,
}

/// Validated request, price normalized, category still unresolved.
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
}

fn invalid_price() -> AppError {
    AppError::BadRequest("Invalid price. Please provide a valid non-negative number.".into())
}

/// Rounds half away from zero to two places; rejects non-numeric, negative and oversize values.
pub fn normalize_price(input: &PriceInput) -> AppResult<Decimal> {
    let raw = match input {
        PriceInput::Number(v) => Decimal::from_f64(*v).ok_or_else(invalid_price)?,
        PriceInput::Text(s) => Decimal::from_str(s.trim()).map_err(|_| invalid_price())?,
    };
    let mut price = raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if price.is_sign_negative() && !price.is_zero() {
        return Err(invalid_price());
    }
    if price > max_price() {
        return Err(invalid_price());
    }
    price.set_sign_positive(true);
    price.rescale(2);
    Ok(price)
}

impl ProductRequest {
    pub fn validate(self) -> AppResult<ProductFields> {
        let name = self.name.trim();
        let description = self.description.trim();
        let category = self.category.trim();
        if name.is_empty() || description.is_empty() || category.is_empty() {
            return Err(AppError::BadRequest(
                "Failed validation. Product name, description and category must not be empty."
                    .into(),
            ));
        }
        Ok(ProductFields {
            name: name.to_string(),
            description: description.to_string(),
            price: normalize_price(&self.price)?,
            category: category.to_string(),
        })
    }
}
