pub mod auth;
pub mod catalog;
pub mod orders;
pub mod payments;
pub mod reports;
pub mod shipments;

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::errors::AppError;

/// Decimal request fields travel as strings to avoid floating-point
/// issues; monetary amounts must not be negative.
pub(crate) fn parse_money(field: &str, value: &str) -> Result<BigDecimal, AppError> {
    let amount = BigDecimal::from_str(value)
        .map_err(|e| AppError::BadRequest(format!("invalid {field} '{value}': {e}")))?;
    if amount < BigDecimal::from(0) {
        return Err(AppError::BadRequest(format!(
            "{field} must not be negative"
        )));
    }
    Ok(amount)
}
