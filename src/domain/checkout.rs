//! Pure checkout rules: variant resolution, stock validation, and price
//! snapshotting. The Diesel repository runs these while the variant rows
//! are locked; the in-memory test doubles run the very same functions.

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::errors::DomainError;
use super::order::LineRequest;

/// Catalog state a checkout needs about one variant.
#[derive(Debug, Clone)]
pub struct VariantSnapshot {
    pub variant_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub size: String,
    pub color: String,
    pub stock: i32,
    pub active: bool,
    pub base_price: BigDecimal,
    pub price_override: Option<BigDecimal>,
}

#[derive(Debug, Clone)]
pub struct PricedLine {
    pub variant_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub size: String,
    pub color: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub subtotal: BigDecimal,
}

pub fn ensure_has_lines(lines: &[LineRequest]) -> Result<(), DomainError> {
    if lines.is_empty() {
        return Err(DomainError::Validation(
            "order must contain at least one item".to_string(),
        ));
    }
    Ok(())
}

/// Resolves every requested line against the captured variant state:
/// the variant must exist and be active, the quantity must be positive
/// and covered by stock, and the unit price is the variant override when
/// present, the product base price otherwise.
pub fn price_lines(
    lines: &[LineRequest],
    variants: &HashMap<Uuid, VariantSnapshot>,
) -> Result<Vec<PricedLine>, DomainError> {
    let mut priced = Vec::with_capacity(lines.len());
    for line in lines {
        let variant = variants.get(&line.variant_id).ok_or_else(|| {
            DomainError::NotFound(format!("product variant {} not found", line.variant_id))
        })?;
        if !variant.active {
            return Err(DomainError::Validation(format!(
                "product variant {} is not active",
                variant.sku
            )));
        }
        if line.quantity <= 0 {
            return Err(DomainError::Validation(format!(
                "quantity for {} must be positive",
                variant.sku
            )));
        }
        if variant.stock < line.quantity {
            return Err(DomainError::Validation(format!(
                "insufficient stock for {} ({}, {}): {} available",
                variant.product_name, variant.size, variant.color, variant.stock
            )));
        }
        let unit_price = variant
            .price_override
            .clone()
            .unwrap_or_else(|| variant.base_price.clone());
        let subtotal = &unit_price * BigDecimal::from(line.quantity);
        priced.push(PricedLine {
            variant_id: variant.variant_id,
            product_id: variant.product_id,
            product_name: variant.product_name.clone(),
            sku: variant.sku.clone(),
            size: variant.size.clone(),
            color: variant.color.clone(),
            unit_price,
            quantity: line.quantity,
            subtotal,
        });
    }
    Ok(priced)
}

pub fn subtotal(lines: &[PricedLine]) -> BigDecimal {
    lines
        .iter()
        .fold(BigDecimal::from(0), |acc, line| acc + &line.subtotal)
}
