use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{AddressSnapshot, OrderItemView, OrderView};
use crate::domain::payment::PaymentView;
use crate::domain::shipment::ShipmentView;
use crate::domain::statuses::{OrderStatus, OrderType, PaymentMethod, PaymentStatus, ShipmentStatus};
use crate::schema::{
    addresses, categories, order_items, orders, payments, product_variants, products, shipments,
    users,
};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = addresses)]
#[diesel(belongs_to(UserRow, foreign_key = user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AddressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub label: Option<String>,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = addresses)]
pub struct NewAddressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub label: Option<String>,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = categories)]
pub struct NewCategoryRow {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub base_price: BigDecimal,
    pub weight: BigDecimal,
    pub length: BigDecimal,
    pub width: BigDecimal,
    pub height: BigDecimal,
    pub image_url: Option<String>,
    pub active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub base_price: BigDecimal,
    pub weight: BigDecimal,
    pub length: BigDecimal,
    pub width: BigDecimal,
    pub height: BigDecimal,
    pub image_url: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = product_variants)]
#[diesel(belongs_to(ProductRow, foreign_key = product_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VariantRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub sku: String,
    pub size: String,
    pub color: String,
    pub stock: i32,
    pub price_override: Option<BigDecimal>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = product_variants)]
pub struct NewVariantRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub sku: String,
    pub size: String,
    pub color: String,
    pub stock: i32,
    pub price_override: Option<BigDecimal>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub order_type: String,
    pub status: String,
    pub subtotal: BigDecimal,
    pub shipping_cost: BigDecimal,
    pub total: BigDecimal,
    pub note: Option<String>,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub order_type: String,
    pub status: String,
    pub subtotal: BigDecimal,
    pub shipping_cost: BigDecimal,
    pub total: BigDecimal,
    pub note: Option<String>,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub size: String,
    pub color: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub subtotal: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
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

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub transaction_id: String,
    pub method: String,
    pub status: String,
    pub amount: BigDecimal,
    pub redirect_url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub webhook_payload: Option<Value>,
    pub signature_key: Option<String>,
    pub initiated_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPaymentRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub transaction_id: String,
    pub method: String,
    pub status: String,
    pub amount: BigDecimal,
    pub redirect_url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub initiated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = shipments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShipmentRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub courier: Option<String>,
    pub service: Option<String>,
    pub tracking_number: Option<String>,
    pub courier_order_id: Option<String>,
    pub courier_tracking_id: Option<String>,
    pub tracking_url: Option<String>,
    pub status: String,
    pub cost: BigDecimal,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = shipments)]
pub struct NewShipmentRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub courier: Option<String>,
    pub service: Option<String>,
    pub tracking_number: Option<String>,
    pub courier_order_id: Option<String>,
    pub courier_tracking_id: Option<String>,
    pub tracking_url: Option<String>,
    pub status: String,
    pub cost: BigDecimal,
}

// ── Row to view conversions ──────────────────────────────────────────────────

impl OrderItemRow {
    pub fn into_view(self) -> OrderItemView {
        OrderItemView {
            id: self.id,
            product_id: self.product_id,
            variant_id: self.variant_id,
            product_name: self.product_name,
            sku: self.sku,
            size: self.size,
            color: self.color,
            unit_price: self.unit_price,
            quantity: self.quantity,
            subtotal: self.subtotal,
        }
    }
}

impl OrderRow {
    pub fn into_view(
        self,
        customer_email: String,
        items: Vec<OrderItemRow>,
    ) -> Result<OrderView, DomainError> {
        Ok(OrderView {
            id: self.id,
            order_number: self.order_number,
            user_id: self.user_id,
            customer_email,
            order_type: OrderType::parse(&self.order_type)?,
            status: OrderStatus::parse(&self.status)?,
            subtotal: self.subtotal,
            shipping_cost: self.shipping_cost,
            total: self.total,
            note: self.note,
            address: AddressSnapshot {
                receiver_name: self.receiver_name,
                receiver_phone: self.receiver_phone,
                line1: self.address_line1,
                line2: self.address_line2,
                city: self.city,
                province: self.province,
                postal_code: self.postal_code,
            },
            paid_at: self.paid_at,
            completed_at: self.completed_at,
            cancelled_at: self.cancelled_at,
            created_at: self.created_at,
            items: items.into_iter().map(OrderItemRow::into_view).collect(),
        })
    }
}

impl PaymentRow {
    pub fn into_view(self) -> Result<PaymentView, DomainError> {
        Ok(PaymentView {
            id: self.id,
            order_id: self.order_id,
            transaction_id: self.transaction_id,
            method: PaymentMethod::parse(&self.method)?,
            status: PaymentStatus::parse(&self.status)?,
            amount: self.amount,
            redirect_url: self.redirect_url,
            expires_at: self.expires_at,
            initiated_at: self.initiated_at,
            settled_at: self.settled_at,
            created_at: self.created_at,
        })
    }
}

impl ShipmentRow {
    pub fn into_view(self, order_user_id: Uuid) -> Result<ShipmentView, DomainError> {
        Ok(ShipmentView {
            id: self.id,
            order_id: self.order_id,
            order_user_id,
            courier: self.courier,
            service: self.service,
            tracking_number: self.tracking_number,
            courier_order_id: self.courier_order_id,
            courier_tracking_id: self.courier_tracking_id,
            tracking_url: self.tracking_url,
            status: ShipmentStatus::parse(&self.status)?,
            cost: self.cost,
            shipped_at: self.shipped_at,
            delivered_at: self.delivered_at,
            created_at: self.created_at,
        })
    }
}
