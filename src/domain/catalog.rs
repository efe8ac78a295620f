use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub image: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub image: Option<String>,
    pub is_available: bool,
}

/// Partial product update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub image: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Menu {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub product_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Just what pricing needs from a menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuPrice {
    pub id: Uuid,
    pub price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewMenu {
    pub name: String,
    pub price: BigDecimal,
    pub product_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct MenuChanges {
    pub name: Option<String>,
    pub price: Option<BigDecimal>,
    pub product_ids: Option<Vec<Uuid>>,
}

const MAX_PRICE_SCALE: i64 = 4;
const MAX_PRICE_INTEGER_DIGITS: i64 = 10;

/// Parses a decimal price. Negative values, more than four decimal places and
/// more than ten integer digits are rejected.
pub fn parse_price(raw: &str) -> Result<BigDecimal, DomainError> {
    let price = BigDecimal::from_str(raw.trim())
        .map_err(|_| DomainError::validation(format!("Invalid price '{raw}'")))?;
    if price < BigDecimal::from(0) {
        return Err(DomainError::validation("Price must not be negative"));
    }

    // Trailing zeros do not count against the limits ("4.500000" is fine).
    let normalized = price.normalized();
    let (_, scale) = normalized.as_bigint_and_exponent();
    if scale > MAX_PRICE_SCALE {
        return Err(DomainError::validation(
            "Price must have at most 4 decimal places",
        ));
    }
    if normalized.digits() as i64 - scale > MAX_PRICE_INTEGER_DIGITS {
        return Err(DomainError::validation("Price is too large"));
    }

    // "1e3" is stored and echoed back as "1000".
    if price.as_bigint_and_exponent().1 < 0 {
        return Ok(price.with_scale(0));
    }
    Ok(price)
}

/// Trims `name` and rejects blank values.
pub fn require_name(name: Option<String>) -> Result<String, DomainError> {
    match name.map(|n| n.trim().to_string()) {
        Some(n) if !n.is_empty() => Ok(n),
        _ => Err(DomainError::validation("Name is required")),
    }
}
