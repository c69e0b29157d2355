use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::order::OrderView;
use super::statuses::{PaymentMethod, PaymentStatus};

/// How long a payment attempt stays valid at the gateway.
pub const EXPIRY_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct PaymentView {
    pub id: Uuid,
    pub order_id: Uuid,
    pub transaction_id: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub amount: BigDecimal,
    pub redirect_url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub initiated_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPaymentRecord {
    pub order_id: Uuid,
    pub transaction_id: String,
    pub method: PaymentMethod,
    pub amount: BigDecimal,
    pub redirect_url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub initiated_at: DateTime<Utc>,
}

/// Applied by webhook or admin action; payload and signature are kept for
/// audit.
#[derive(Debug, Clone)]
pub struct PaymentStatusUpdate {
    pub status: PaymentStatus,
    pub webhook_payload: Option<Value>,
    pub signature_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeItem {
    pub id: String,
    pub price: i64,
    pub quantity: i32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ChargeCustomer {
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub transaction_id: String,
    pub gross_amount: i64,
    pub items: Vec<ChargeItem>,
    pub customer: ChargeCustomer,
    pub start_time: DateTime<Utc>,
    pub expiry_hours: i64,
}

#[derive(Debug, Clone)]
pub struct GatewayRedirect {
    pub token: Option<String>,
    pub redirect_url: String,
}

/// Gateways take whole currency units; NUMERIC(12,2) amounts are rounded
/// half-up.
pub fn whole_units(amount: &BigDecimal) -> i64 {
    amount
        .with_scale_round(0, RoundingMode::HalfUp)
        .to_i64()
        .unwrap_or(0)
}

/// Builds the gateway charge for an order: one line per item plus the
/// shipping cost as a synthetic line, gross amount equal to the order
/// total. The gateway only takes whole currency units.
pub fn build_charge(order: &OrderView, transaction_id: &str, now: DateTime<Utc>) -> ChargeRequest {
    let mut items: Vec<ChargeItem> = order
        .items
        .iter()
        .map(|item| ChargeItem {
            id: item.variant_id.to_string(),
            price: whole_units(&item.unit_price),
            quantity: item.quantity,
            name: format!("{} - {} {}", item.product_name, item.size, item.color),
        })
        .collect();
    items.push(ChargeItem {
        id: "SHIPPING".to_string(),
        price: whole_units(&order.shipping_cost),
        quantity: 1,
        name: "Shipping cost".to_string(),
    });

    ChargeRequest {
        transaction_id: transaction_id.to_string(),
        gross_amount: whole_units(&order.total),
        items,
        customer: ChargeCustomer {
            first_name: order.address.receiver_name.clone(),
            email: order.customer_email.clone(),
            phone: order.address.receiver_phone.clone(),
            address: order.address.line1.clone(),
            city: order.address.city.clone(),
            postal_code: order.address.postal_code.clone(),
        },
        start_time: now,
        expiry_hours: EXPIRY_HOURS,
    }
}

/// Midtrans notification, already pulled apart by the webhook handler.
#[derive(Debug, Clone)]
pub struct GatewayNotification {
    pub transaction_id: String,
    pub transaction_status: String,
    pub fraud_status: Option<String>,
    pub status_code: String,
    pub gross_amount: String,
    pub signature_key: String,
    pub raw: Value,
}

/// Maps the gateway's `transaction_status` vocabulary onto ours. A card
/// `capture` counts as settled unless fraud screening put it in
/// challenge.
pub fn map_notification_status(
    transaction_status: &str,
    fraud_status: Option<&str>,
) -> Option<PaymentStatus> {
    match transaction_status {
        "settlement" => Some(PaymentStatus::Settlement),
        "capture" => match fraud_status {
            Some("challenge") => Some(PaymentStatus::Pending),
            _ => Some(PaymentStatus::Settlement),
        },
        "pending" => Some(PaymentStatus::Pending),
        "deny" => Some(PaymentStatus::Deny),
        "cancel" => Some(PaymentStatus::Cancel),
        "expire" => Some(PaymentStatus::Expire),
        "refund" | "partial_refund" => Some(PaymentStatus::Refund),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::domain::order::{AddressSnapshot, OrderItemView};
    use crate::domain::statuses::{OrderStatus, OrderType};

    fn order_with_items() -> OrderView {
        let item = |name: &str, price: &str, qty: i32| OrderItemView {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            variant_id: Uuid::new_v4(),
            product_name: name.to_string(),
            sku: format!("{name}-SKU"),
            size: "M".to_string(),
            color: "Black".to_string(),
            unit_price: BigDecimal::from_str(price).unwrap(),
            quantity: qty,
            subtotal: BigDecimal::from_str(price).unwrap() * BigDecimal::from(qty),
        };
        OrderView {
            id: Uuid::new_v4(),
            order_number: "ORD-20250101-00001".to_string(),
            user_id: Uuid::new_v4(),
            customer_email: "buyer@example.com".to_string(),
            order_type: OrderType::Online,
            status: OrderStatus::PendingPayment,
            subtotal: BigDecimal::from(130000),
            shipping_cost: BigDecimal::from(15000),
            total: BigDecimal::from(145000),
            note: None,
            address: AddressSnapshot {
                receiver_name: "Siti".to_string(),
                receiver_phone: "0812000".to_string(),
                line1: "Jl. Merdeka 1".to_string(),
                line2: None,
                city: "Bandung".to_string(),
                province: "Jawa Barat".to_string(),
                postal_code: "40111".to_string(),
            },
            paid_at: None,
            completed_at: None,
            cancelled_at: None,
            created_at: Utc::now(),
            items: vec![item("Gamis", "50000.00", 2), item("Hijab", "30000.00", 1)],
        }
    }

    #[test]
    fn charge_carries_every_item_plus_shipping_line() {
        let order = order_with_items();
        let charge = build_charge(&order, "TRX-20250101-00001", Utc::now());
        assert_eq!(charge.items.len(), 3);
        let shipping = charge.items.last().unwrap();
        assert_eq!(shipping.id, "SHIPPING");
        assert_eq!(shipping.price, 15000);
        assert_eq!(shipping.quantity, 1);
        assert_eq!(charge.gross_amount, 145000);
        assert_eq!(charge.customer.email, "buyer@example.com");
    }

    #[test]
    fn item_names_join_product_and_variant() {
        let order = order_with_items();
        let charge = build_charge(&order, "TRX-20250101-00001", Utc::now());
        assert_eq!(charge.items[0].name, "Gamis - M Black");
        assert_eq!(charge.items[0].price, 50000);
        assert_eq!(charge.items[0].quantity, 2);
    }

    #[test]
    fn notification_status_mapping() {
        assert_eq!(
            map_notification_status("settlement", None),
            Some(PaymentStatus::Settlement)
        );
        assert_eq!(
            map_notification_status("capture", Some("accept")),
            Some(PaymentStatus::Settlement)
        );
        assert_eq!(
            map_notification_status("capture", Some("challenge")),
            Some(PaymentStatus::Pending)
        );
        assert_eq!(
            map_notification_status("expire", None),
            Some(PaymentStatus::Expire)
        );
        assert_eq!(map_notification_status("gibberish", None), None);
    }
}
