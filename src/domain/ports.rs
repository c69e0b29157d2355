use chrono::NaiveDate;
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{CheckoutInput, OrderPage, OrderView};
use super::payment::{
    ChargeRequest, GatewayRedirect, NewPaymentRecord, PaymentStatusUpdate, PaymentView,
};
use super::report::SalesReport;
use super::shipment::{
    AreaSuggestion, BookingRequest, CourierBooking, NewShipmentRecord, ParcelManifest, RateQuery,
    RateQuote, ShipmentStatusUpdate, ShipmentView, TrackingInfo,
};
use super::statuses::{OrderStatus, Role};

/// Caller identity the HTTP layer attaches to every operation.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthContext {
    /// Admins and the owner share the staff-only surface.
    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Owner)
    }
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Runs the whole checkout as one atomic unit: stock check and
    /// decrement under row locks, order-number draw, order and item
    /// inserts.
    fn checkout(&self, input: CheckoutInput) -> Result<OrderView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError>;
    fn list(
        &self,
        page: i64,
        limit: i64,
        status: Option<OrderStatus>,
    ) -> Result<OrderPage, DomainError>;
    /// Applies a transition plan; a cancel restores item stock in the
    /// same transaction.
    fn update_status(&self, id: Uuid, requested: OrderStatus) -> Result<OrderView, DomainError>;
    fn sales_report(&self, start: NaiveDate, end: NaiveDate) -> Result<SalesReport, DomainError>;
}

pub trait PaymentRepository: Send + Sync + 'static {
    /// Draws the next `TRX-` reference for today. Drawn ids may leak
    /// (gateway failure after the draw); they never repeat.
    fn next_transaction_id(&self) -> Result<String, DomainError>;
    fn create(&self, record: NewPaymentRecord) -> Result<PaymentView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentView>, DomainError>;
    fn list_for_order(&self, order_id: Uuid) -> Result<Vec<PaymentView>, DomainError>;
    fn find_pending_for_order(&self, order_id: Uuid)
        -> Result<Option<PaymentView>, DomainError>;
    fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<PaymentView>, DomainError>;
    /// Stores the new status plus audit payload; a SETTLEMENT also moves
    /// the order to PAID inside the same transaction.
    fn apply_status(
        &self,
        id: Uuid,
        update: PaymentStatusUpdate,
    ) -> Result<PaymentView, DomainError>;
}

pub trait ShipmentRepository: Send + Sync + 'static {
    /// Enforces the one-shipment-per-order rule and the PAID/PROCESSING
    /// precondition; advances a PAID order to PROCESSING in the same
    /// transaction.
    fn create(&self, record: NewShipmentRecord) -> Result<ShipmentView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<ShipmentView>, DomainError>;
    fn find_by_order(&self, order_id: Uuid) -> Result<Option<ShipmentView>, DomainError>;
    /// SHIPPED/DELIVERED cascade onto the order inside the transaction.
    fn update_status(
        &self,
        id: Uuid,
        update: ShipmentStatusUpdate,
    ) -> Result<ShipmentView, DomainError>;
    fn update_tracking(
        &self,
        id: Uuid,
        tracking_number: String,
        courier: Option<String>,
    ) -> Result<ShipmentView, DomainError>;
    /// Joins order items with product dimensions into a bookable parcel.
    fn order_parcel(&self, order_id: Uuid) -> Result<ParcelManifest, DomainError>;
}

pub trait PaymentGateway: Send + Sync + 'static {
    fn create_transaction(&self, charge: &ChargeRequest) -> Result<GatewayRedirect, DomainError>;
    /// SHA-512 notification signature check; true when no server key is
    /// configured (sandbox-style setups).
    fn verify_signature(
        &self,
        transaction_id: &str,
        status_code: &str,
        gross_amount: &str,
        signature: &str,
    ) -> bool;
}

pub trait CourierGateway: Send + Sync + 'static {
    fn check_rates(&self, query: &RateQuery) -> Result<Vec<RateQuote>, DomainError>;
    fn book(&self, request: &BookingRequest) -> Result<CourierBooking, DomainError>;
    fn track(&self, courier_tracking_id: &str) -> Result<TrackingInfo, DomainError>;
    fn search_areas(&self, query: &str) -> Result<Vec<AreaSuggestion>, DomainError>;
}

/// Fire-and-forget. Implementations log failures and never surface them
/// to the triggering operation.
pub trait WaybillNotifier: Send + Sync + 'static {
    fn waybill_assigned(&self, email: &str, order_number: &str, waybill: &str, courier: &str);
}
