use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;
use super::statuses::{OrderStatus, ShipmentStatus};

#[derive(Debug, Clone)]
pub struct ShipmentView {
    pub id: Uuid,
    pub order_id: Uuid,
    /// Owner of the underlying order, for read-side access checks.
    pub order_user_id: Uuid,
    pub courier: Option<String>,
    pub service: Option<String>,
    pub tracking_number: Option<String>,
    pub courier_order_id: Option<String>,
    pub courier_tracking_id: Option<String>,
    pub tracking_url: Option<String>,
    pub status: ShipmentStatus,
    pub cost: BigDecimal,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewShipmentRecord {
    pub order_id: Uuid,
    pub courier: Option<String>,
    pub service: Option<String>,
    pub tracking_number: Option<String>,
    pub cost: BigDecimal,
    pub courier_order_id: Option<String>,
    pub courier_tracking_id: Option<String>,
    pub tracking_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ShipmentStatusUpdate {
    pub status: ShipmentStatus,
    pub tracking_number: Option<String>,
}

/// Side effects a shipment status carries. Everything outside
/// SHIPPED/DELIVERED is informational tracking only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipmentTransition {
    pub stamp_shipped: bool,
    pub stamp_delivered: bool,
    pub order_cascade: Option<OrderStatus>,
}

pub fn plan_transition(status: ShipmentStatus) -> ShipmentTransition {
    match status {
        ShipmentStatus::Shipped => ShipmentTransition {
            stamp_shipped: true,
            stamp_delivered: false,
            order_cascade: Some(OrderStatus::Shipped),
        },
        ShipmentStatus::Delivered => ShipmentTransition {
            stamp_shipped: false,
            stamp_delivered: true,
            order_cascade: Some(OrderStatus::Completed),
        },
        _ => ShipmentTransition {
            stamp_shipped: false,
            stamp_delivered: false,
            order_cascade: None,
        },
    }
}

/// Order states a shipment may be created from.
pub fn ensure_shippable(status: OrderStatus) -> Result<(), DomainError> {
    if status != OrderStatus::Paid && status != OrderStatus::Processing {
        return Err(DomainError::InvalidState(format!(
            "order with status {status} cannot be shipped"
        )));
    }
    Ok(())
}

// ── courier aggregator types ─────────────────────────────────────────────────

/// One parcel line as the aggregator wants it: value in whole currency
/// units, dimensions in cm, weight in grams.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: i64,
    pub length: i32,
    pub width: i32,
    pub height: i32,
    pub weight: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateQuery {
    pub origin_area_id: Option<String>,
    pub destination_area_id: Option<String>,
    pub origin_postal_code: Option<String>,
    pub destination_postal_code: Option<String>,
    /// Comma separated courier codes, e.g. "jne,jnt,sicepat".
    pub couriers: String,
    pub items: Vec<RateItem>,
}

pub fn validate_rate_query(query: &RateQuery) -> Result<(), DomainError> {
    let has_area = query.origin_area_id.is_some() && query.destination_area_id.is_some();
    let has_postal =
        query.origin_postal_code.is_some() && query.destination_postal_code.is_some();
    if !has_area && !has_postal {
        return Err(DomainError::Validation(
            "either an origin/destination area id pair or a postal code pair is required"
                .to_string(),
        ));
    }
    if query.items.is_empty() {
        return Err(DomainError::Validation(
            "at least one item is required to check rates".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RateQuote {
    pub courier_code: String,
    pub courier_name: String,
    pub service: String,
    pub description: Option<String>,
    pub price: i64,
    pub estimated_days: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    /// Our order number, echoed back by the aggregator.
    pub reference: String,
    pub courier_company: String,
    pub courier_type: String,
    pub origin_area_id: String,
    pub destination_area_id: String,
    pub destination_contact_name: String,
    pub destination_contact_phone: String,
    pub destination_contact_email: String,
    pub destination_address: String,
    pub destination_postal_code: String,
    pub destination_note: Option<String>,
    pub items: Vec<RateItem>,
}

#[derive(Debug, Clone)]
pub struct CourierBooking {
    pub courier_order_id: String,
    pub tracking_id: Option<String>,
    pub waybill: Option<String>,
    pub tracking_url: Option<String>,
    pub price: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrackingEvent {
    pub status: String,
    pub note: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrackingInfo {
    pub status: String,
    pub waybill: Option<String>,
    pub link: Option<String>,
    pub history: Vec<TrackingEvent>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AreaSuggestion {
    pub id: String,
    pub name: String,
    pub postal_code: Option<i64>,
}

/// Everything needed to hand an order's parcel to the courier
/// aggregator and notify the customer afterwards.
#[derive(Debug, Clone)]
pub struct ParcelManifest {
    pub order_id: Uuid,
    pub order_number: String,
    pub order_status: OrderStatus,
    pub customer_email: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub items: Vec<RateItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> RateItem {
        RateItem {
            name: "Gamis".to_string(),
            description: None,
            value: 50000,
            length: 30,
            width: 20,
            height: 5,
            weight: 400,
            quantity: 1,
        }
    }

    #[test]
    fn shipped_cascades_to_order_shipped() {
        let plan = plan_transition(ShipmentStatus::Shipped);
        assert!(plan.stamp_shipped);
        assert_eq!(plan.order_cascade, Some(OrderStatus::Shipped));
    }

    #[test]
    fn delivered_cascades_to_order_completed() {
        let plan = plan_transition(ShipmentStatus::Delivered);
        assert!(plan.stamp_delivered);
        assert_eq!(plan.order_cascade, Some(OrderStatus::Completed));
    }

    #[test]
    fn intermediate_states_are_informational() {
        for status in [
            ShipmentStatus::Packed,
            ShipmentStatus::Confirmed,
            ShipmentStatus::PickedUp,
            ShipmentStatus::InTransit,
            ShipmentStatus::Returned,
            ShipmentStatus::Cancelled,
        ] {
            let plan = plan_transition(status);
            assert_eq!(plan.order_cascade, None, "{status} must not cascade");
            assert!(!plan.stamp_shipped);
            assert!(!plan.stamp_delivered);
        }
    }

    #[test]
    fn only_paid_or_processing_orders_ship() {
        assert!(ensure_shippable(OrderStatus::Paid).is_ok());
        assert!(ensure_shippable(OrderStatus::Processing).is_ok());
        assert!(ensure_shippable(OrderStatus::PendingPayment).is_err());
        assert!(ensure_shippable(OrderStatus::Completed).is_err());
    }

    #[test]
    fn rate_query_needs_a_location_pair() {
        let query = RateQuery {
            origin_area_id: None,
            destination_area_id: Some("IDNP6".to_string()),
            origin_postal_code: None,
            destination_postal_code: None,
            couriers: "jne".to_string(),
            items: vec![item()],
        };
        assert!(validate_rate_query(&query).is_err());
    }

    #[test]
    fn rate_query_accepts_postal_pair_and_items() {
        let query = RateQuery {
            origin_area_id: None,
            destination_area_id: None,
            origin_postal_code: Some("40111".to_string()),
            destination_postal_code: Some("10110".to_string()),
            couriers: "jne,jnt".to_string(),
            items: vec![item()],
        };
        assert!(validate_rate_query(&query).is_ok());
    }

    #[test]
    fn rate_query_needs_items() {
        let query = RateQuery {
            origin_area_id: Some("a".to_string()),
            destination_area_id: Some("b".to_string()),
            origin_postal_code: None,
            destination_postal_code: None,
            couriers: "jne".to_string(),
            items: vec![],
        };
        assert!(validate_rate_query(&query).is_err());
    }
}
