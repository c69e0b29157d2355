use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::statuses::{OrderStatus, OrderType};

/// Shipping destination captured verbatim onto the order row so later
/// address-book edits never rewrite history.
#[derive(Debug, Clone)]
pub struct AddressSnapshot {
    pub receiver_name: String,
    pub receiver_phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

#[derive(Debug, Clone)]
pub struct LineRequest {
    pub variant_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct CheckoutInput {
    pub user_id: Uuid,
    pub order_type: OrderType,
    pub lines: Vec<LineRequest>,
    pub address: AddressSnapshot,
    pub shipping_cost: BigDecimal,
    pub note: Option<String>,
}

/// Price/identity snapshot of one purchased variant. Never re-read from
/// the live catalog after creation.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub size: String,
    pub color: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub subtotal: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub customer_email: String,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub subtotal: BigDecimal,
    pub shipping_cost: BigDecimal,
    pub total: BigDecimal,
    pub note: Option<String>,
    pub address: AddressSnapshot,
    pub paid_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}

#[derive(Debug, Clone)]
pub struct OrderPage {
    pub items: Vec<OrderView>,
    pub total: i64,
}

/// What a status update is allowed to do, decided before any row is
/// touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub next: OrderStatus,
    pub stamp_paid: bool,
    pub stamp_completed: bool,
    pub stamp_cancelled: bool,
    pub restore_stock: bool,
}

pub fn plan_transition(
    current: OrderStatus,
    requested: OrderStatus,
) -> Result<TransitionPlan, DomainError> {
    if current.is_terminal() {
        return Err(DomainError::InvalidState(format!(
            "order with status {current} can no longer be updated"
        )));
    }
    Ok(TransitionPlan {
        next: requested,
        stamp_paid: requested == OrderStatus::Paid,
        stamp_completed: requested == OrderStatus::Completed,
        stamp_cancelled: requested == OrderStatus::Cancelled,
        restore_stock: requested == OrderStatus::Cancelled,
    })
}
