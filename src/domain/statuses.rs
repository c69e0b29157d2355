use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::DomainError;

/// Order lifecycle. CANCELLED is reachable from any non-terminal state;
/// CANCELLED and COMPLETED accept no further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    PendingPayment,
    Paid,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "PENDING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "PENDING_PAYMENT" => Ok(OrderStatus::PendingPayment),
            "PAID" => Ok(OrderStatus::Paid),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::Internal(format!(
                "unknown order status '{other}'"
            ))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment lifecycle. Everything after PENDING is an outcome; a retry is
/// a new payment row, never a transition out of an outcome state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Settlement,
    Expire,
    Cancel,
    Deny,
    Refund,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Settlement => "SETTLEMENT",
            PaymentStatus::Expire => "EXPIRE",
            PaymentStatus::Cancel => "CANCEL",
            PaymentStatus::Deny => "DENY",
            PaymentStatus::Refund => "REFUND",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "PENDING" => Ok(PaymentStatus::Pending),
            "SETTLEMENT" => Ok(PaymentStatus::Settlement),
            "EXPIRE" => Ok(PaymentStatus::Expire),
            "CANCEL" => Ok(PaymentStatus::Cancel),
            "DENY" => Ok(PaymentStatus::Deny),
            "REFUND" => Ok(PaymentStatus::Refund),
            other => Err(DomainError::Internal(format!(
                "unknown payment status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    BankTransfer,
    Qris,
    EWallet,
    CreditCard,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Qris => "QRIS",
            PaymentMethod::EWallet => "E_WALLET",
            PaymentMethod::CreditCard => "CREDIT_CARD",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "BANK_TRANSFER" => Ok(PaymentMethod::BankTransfer),
            "QRIS" => Ok(PaymentMethod::Qris),
            "E_WALLET" => Ok(PaymentMethod::EWallet),
            "CREDIT_CARD" => Ok(PaymentMethod::CreditCard),
            other => Err(DomainError::Internal(format!(
                "unknown payment method '{other}'"
            ))),
        }
    }
}

/// Shipment lifecycle. Only SHIPPED and DELIVERED carry side effects on
/// the owning order; the remaining states are informational tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    Pending,
    Packed,
    Confirmed,
    PickedUp,
    Shipped,
    InTransit,
    Delivered,
    Returned,
    Cancelled,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "PENDING",
            ShipmentStatus::Packed => "PACKED",
            ShipmentStatus::Confirmed => "CONFIRMED",
            ShipmentStatus::PickedUp => "PICKED_UP",
            ShipmentStatus::Shipped => "SHIPPED",
            ShipmentStatus::InTransit => "IN_TRANSIT",
            ShipmentStatus::Delivered => "DELIVERED",
            ShipmentStatus::Returned => "RETURNED",
            ShipmentStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "PENDING" => Ok(ShipmentStatus::Pending),
            "PACKED" => Ok(ShipmentStatus::Packed),
            "CONFIRMED" => Ok(ShipmentStatus::Confirmed),
            "PICKED_UP" => Ok(ShipmentStatus::PickedUp),
            "SHIPPED" => Ok(ShipmentStatus::Shipped),
            "IN_TRANSIT" => Ok(ShipmentStatus::InTransit),
            "DELIVERED" => Ok(ShipmentStatus::Delivered),
            "RETURNED" => Ok(ShipmentStatus::Returned),
            "CANCELLED" => Ok(ShipmentStatus::Cancelled),
            other => Err(DomainError::Internal(format!(
                "unknown shipment status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Online,
    Offline,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Online => "ONLINE",
            OrderType::Offline => "OFFLINE",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "ONLINE" => Ok(OrderType::Online),
            "OFFLINE" => Ok(OrderType::Offline),
            other => Err(DomainError::Internal(format!(
                "unknown order type '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    Admin,
    Owner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Admin => "ADMIN",
            Role::Owner => "OWNER",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "CUSTOMER" => Ok(Role::Customer),
            "ADMIN" => Ok(Role::Admin),
            "OWNER" => Ok(Role::Owner),
            other => Err(DomainError::Internal(format!("unknown role '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_order_statuses() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::PendingPayment.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }

    #[test]
    fn order_status_round_trips_through_storage_form() {
        for status in [
            OrderStatus::PendingPayment,
            OrderStatus::Paid,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(OrderStatus::parse("SHIPPING").is_err());
        assert!(PaymentStatus::parse("").is_err());
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&OrderStatus::PendingPayment).unwrap();
        assert_eq!(json, "\"PENDING_PAYMENT\"");
        let parsed: PaymentMethod = serde_json::from_str("\"E_WALLET\"").unwrap();
        assert_eq!(parsed, PaymentMethod::EWallet);
    }
}
