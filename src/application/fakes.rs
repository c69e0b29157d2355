//! In-memory implementations of the ports for service-level tests. The
//! order/stock/transition rules run through the same `domain` functions
//! as the Diesel repositories, so these tests exercise the real business
//! rules without a database.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::checkout::{self, VariantSnapshot};
use crate::domain::errors::DomainError;
use crate::domain::order::{
    self, AddressSnapshot, CheckoutInput, LineRequest, OrderItemView, OrderPage, OrderView,
};
use crate::domain::payment::{
    whole_units, ChargeRequest, GatewayRedirect, NewPaymentRecord, PaymentStatusUpdate,
    PaymentView,
};
use crate::domain::ports::{
    AuthContext, CourierGateway, OrderRepository, PaymentGateway, PaymentRepository,
    ShipmentRepository, WaybillNotifier,
};
use crate::domain::report::{DailySales, ProductSales, SalesReport};
use crate::domain::sequence;
use crate::domain::shipment::{
    self, AreaSuggestion, BookingRequest, CourierBooking, NewShipmentRecord, ParcelManifest,
    RateItem, RateQuery, RateQuote, ShipmentStatusUpdate, ShipmentView, TrackingEvent,
    TrackingInfo,
};
use crate::domain::statuses::{OrderStatus, OrderType, PaymentStatus, Role, ShipmentStatus};

pub fn customer(user_id: Uuid) -> AuthContext {
    AuthContext {
        user_id,
        role: Role::Customer,
    }
}

pub fn admin() -> AuthContext {
    AuthContext {
        user_id: Uuid::new_v4(),
        role: Role::Admin,
    }
}

pub fn sample_checkout(lines: Vec<(Uuid, i32)>, shipping: &str) -> CheckoutInput {
    CheckoutInput {
        user_id: Uuid::nil(),
        order_type: OrderType::Online,
        lines: lines
            .into_iter()
            .map(|(variant_id, quantity)| LineRequest {
                variant_id,
                quantity,
            })
            .collect(),
        address: AddressSnapshot {
            receiver_name: "Siti".to_string(),
            receiver_phone: "0812000".to_string(),
            line1: "Jl. Merdeka 1".to_string(),
            line2: None,
            city: "Bandung".to_string(),
            province: "Jawa Barat".to_string(),
            postal_code: "40111".to_string(),
        },
        shipping_cost: BigDecimal::from_str(shipping).expect("valid decimal"),
        note: None,
    }
}

#[derive(Default)]
struct WorldState {
    users: HashMap<Uuid, String>,
    variants: HashMap<Uuid, VariantSnapshot>,
    orders: HashMap<Uuid, OrderView>,
    payments: HashMap<Uuid, PaymentView>,
    shipments: HashMap<Uuid, ShipmentView>,
    sequences: HashMap<(String, NaiveDate), i32>,
}

#[derive(Clone, Default)]
pub struct InMemoryWorld {
    state: Arc<Mutex<WorldState>>,
}

impl InMemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state
            .lock()
            .unwrap()
            .users
            .insert(id, email.to_string());
        id
    }

    pub fn add_variant(&self, product_name: &str, base_price: &str, stock: i32) -> Uuid {
        let id = Uuid::new_v4();
        let snapshot = VariantSnapshot {
            variant_id: id,
            product_id: Uuid::new_v4(),
            product_name: product_name.to_string(),
            sku: format!("{product_name}-{id}"),
            size: "M".to_string(),
            color: "Black".to_string(),
            stock,
            active: true,
            base_price: BigDecimal::from_str(base_price).expect("valid decimal"),
            price_override: None,
        };
        self.state.lock().unwrap().variants.insert(id, snapshot);
        id
    }

    pub fn variant_stock(&self, id: Uuid) -> i32 {
        self.state.lock().unwrap().variants[&id].stock
    }

    pub fn order(&self, id: Uuid) -> OrderView {
        self.state.lock().unwrap().orders[&id].clone()
    }

    /// Test arrangement only: force an order into a given state without
    /// running the transition rules.
    pub fn set_order_status(&self, id: Uuid, status: OrderStatus) {
        self.state
            .lock()
            .unwrap()
            .orders
            .get_mut(&id)
            .expect("order exists")
            .status = status;
    }

    fn next_seq(state: &mut WorldState, scope: &str) -> (NaiveDate, i32) {
        let today = Utc::now().date_naive();
        let value = state
            .sequences
            .entry((scope.to_string(), today))
            .or_insert(0);
        *value += 1;
        (today, *value)
    }
}

impl OrderRepository for InMemoryWorld {
    fn checkout(&self, input: CheckoutInput) -> Result<OrderView, DomainError> {
        let mut state = self.state.lock().unwrap();

        checkout::ensure_has_lines(&input.lines)?;
        let email = state.users.get(&input.user_id).cloned().ok_or_else(|| {
            DomainError::NotFound(format!("user {} not found", input.user_id))
        })?;

        let priced = checkout::price_lines(&input.lines, &state.variants)?;
        let subtotal = checkout::subtotal(&priced);
        let total = &subtotal + &input.shipping_cost;

        for line in &priced {
            if let Some(variant) = state.variants.get_mut(&line.variant_id) {
                variant.stock -= line.quantity;
            }
        }

        let (today, seq) = Self::next_seq(&mut state, sequence::ORDER_SCOPE);
        let order_number = sequence::format_reference(sequence::ORDER_SCOPE, today, seq);

        let items = priced
            .iter()
            .map(|line| OrderItemView {
                id: Uuid::new_v4(),
                product_id: line.product_id,
                variant_id: line.variant_id,
                product_name: line.product_name.clone(),
                sku: line.sku.clone(),
                size: line.size.clone(),
                color: line.color.clone(),
                unit_price: line.unit_price.clone(),
                quantity: line.quantity,
                subtotal: line.subtotal.clone(),
            })
            .collect();

        let view = OrderView {
            id: Uuid::new_v4(),
            order_number,
            user_id: input.user_id,
            customer_email: email,
            order_type: input.order_type,
            status: OrderStatus::PendingPayment,
            subtotal,
            shipping_cost: input.shipping_cost.clone(),
            total,
            note: input.note.clone(),
            address: input.address.clone(),
            paid_at: None,
            completed_at: None,
            cancelled_at: None,
            created_at: Utc::now(),
            items,
        };
        state.orders.insert(view.id, view.clone());
        Ok(view)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        Ok(self.state.lock().unwrap().orders.get(&id).cloned())
    }

    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let state = self.state.lock().unwrap();
        let mut orders: Vec<OrderView> = state
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    fn list(
        &self,
        page: i64,
        limit: i64,
        status: Option<OrderStatus>,
    ) -> Result<OrderPage, DomainError> {
        let state = self.state.lock().unwrap();
        let mut orders: Vec<OrderView> = state
            .orders
            .values()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = orders.len() as i64;
        let offset = ((page - 1) * limit).max(0) as usize;
        let items = orders
            .into_iter()
            .skip(offset)
            .take(limit.max(0) as usize)
            .collect();
        Ok(OrderPage { items, total })
    }

    fn update_status(&self, id: Uuid, requested: OrderStatus) -> Result<OrderView, DomainError> {
        let mut state = self.state.lock().unwrap();
        let current = state
            .orders
            .get(&id)
            .ok_or_else(|| DomainError::NotFound(format!("order {id} not found")))?
            .status;
        let plan = order::plan_transition(current, requested)?;
        let now = Utc::now();

        if plan.restore_stock {
            let items = state.orders[&id].items.clone();
            for item in items {
                if let Some(variant) = state.variants.get_mut(&item.variant_id) {
                    variant.stock += item.quantity;
                }
            }
        }

        let order = state.orders.get_mut(&id).expect("checked above");
        order.status = plan.next;
        if plan.stamp_paid {
            order.paid_at = Some(now);
        }
        if plan.stamp_completed {
            order.completed_at = Some(now);
        }
        if plan.stamp_cancelled {
            order.cancelled_at = Some(now);
        }
        Ok(order.clone())
    }

    fn sales_report(&self, start: NaiveDate, end: NaiveDate) -> Result<SalesReport, DomainError> {
        let state = self.state.lock().unwrap();
        let revenue_statuses = [
            OrderStatus::Paid,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Completed,
        ];

        let mut total_transactions = 0i64;
        let mut total_revenue = BigDecimal::from(0);
        let mut daily: HashMap<NaiveDate, (i64, BigDecimal)> = HashMap::new();
        let mut by_product: HashMap<String, (i64, BigDecimal)> = HashMap::new();

        for order in state.orders.values() {
            if !revenue_statuses.contains(&order.status) {
                continue;
            }
            let bucket = order.paid_at.unwrap_or(order.created_at).date_naive();
            if bucket < start || bucket > end {
                continue;
            }
            total_transactions += 1;
            total_revenue += &order.total;
            let entry = daily.entry(bucket).or_insert((0, BigDecimal::from(0)));
            entry.0 += 1;
            entry.1 += &order.total;
            for item in &order.items {
                let entry = by_product
                    .entry(item.product_name.clone())
                    .or_insert((0, BigDecimal::from(0)));
                entry.0 += i64::from(item.quantity);
                entry.1 += &item.subtotal;
            }
        }

        let mut daily: Vec<DailySales> = daily
            .into_iter()
            .map(|(date, (orders, revenue))| DailySales {
                date,
                orders,
                revenue,
            })
            .collect();
        daily.sort_by_key(|d| d.date);
        let mut top_products: Vec<ProductSales> = by_product
            .into_iter()
            .map(|(product_name, (quantity_sold, revenue))| ProductSales {
                product_name,
                quantity_sold,
                revenue,
            })
            .collect();
        top_products.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        top_products.truncate(10);

        Ok(SalesReport {
            start,
            end,
            total_transactions,
            total_revenue,
            daily,
            top_products,
        })
    }
}

impl PaymentRepository for InMemoryWorld {
    fn next_transaction_id(&self) -> Result<String, DomainError> {
        let mut state = self.state.lock().unwrap();
        let (today, seq) = Self::next_seq(&mut state, sequence::TRANSACTION_SCOPE);
        Ok(sequence::format_reference(
            sequence::TRANSACTION_SCOPE,
            today,
            seq,
        ))
    }

    fn create(&self, record: NewPaymentRecord) -> Result<PaymentView, DomainError> {
        let mut state = self.state.lock().unwrap();
        let view = PaymentView {
            id: Uuid::new_v4(),
            order_id: record.order_id,
            transaction_id: record.transaction_id,
            method: record.method,
            status: PaymentStatus::Pending,
            amount: record.amount,
            redirect_url: record.redirect_url,
            expires_at: record.expires_at,
            initiated_at: record.initiated_at,
            settled_at: None,
            created_at: Utc::now(),
        };
        state.payments.insert(view.id, view.clone());
        Ok(view)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentView>, DomainError> {
        Ok(self.state.lock().unwrap().payments.get(&id).cloned())
    }

    fn list_for_order(&self, order_id: Uuid) -> Result<Vec<PaymentView>, DomainError> {
        let state = self.state.lock().unwrap();
        let mut payments: Vec<PaymentView> = state
            .payments
            .values()
            .filter(|p| p.order_id == order_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }

    fn find_pending_for_order(
        &self,
        order_id: Uuid,
    ) -> Result<Option<PaymentView>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .payments
            .values()
            .find(|p| p.order_id == order_id && p.status == PaymentStatus::Pending)
            .cloned())
    }

    fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<PaymentView>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .payments
            .values()
            .find(|p| p.transaction_id == transaction_id)
            .cloned())
    }

    fn apply_status(
        &self,
        id: Uuid,
        update: PaymentStatusUpdate,
    ) -> Result<PaymentView, DomainError> {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        let order_id = {
            let payment = state
                .payments
                .get_mut(&id)
                .ok_or_else(|| DomainError::NotFound(format!("payment {id} not found")))?;
            payment.status = update.status;
            if update.status == PaymentStatus::Settlement {
                payment.settled_at = Some(now);
            }
            payment.order_id
        };
        if update.status == PaymentStatus::Settlement {
            if let Some(order) = state.orders.get_mut(&order_id) {
                order.status = OrderStatus::Paid;
                order.paid_at = Some(now);
            }
        }
        Ok(state.payments[&id].clone())
    }
}

impl ShipmentRepository for InMemoryWorld {
    fn create(&self, record: NewShipmentRecord) -> Result<ShipmentView, DomainError> {
        let mut state = self.state.lock().unwrap();
        let (order_status, order_user_id) = {
            let order = state.orders.get(&record.order_id).ok_or_else(|| {
                DomainError::NotFound(format!("order {} not found", record.order_id))
            })?;
            (order.status, order.user_id)
        };
        shipment::ensure_shippable(order_status)?;
        if state
            .shipments
            .values()
            .any(|s| s.order_id == record.order_id)
        {
            return Err(DomainError::InvalidState(
                "order already has a shipment".to_string(),
            ));
        }

        let view = ShipmentView {
            id: Uuid::new_v4(),
            order_id: record.order_id,
            order_user_id,
            courier: record.courier,
            service: record.service,
            tracking_number: record.tracking_number,
            courier_order_id: record.courier_order_id,
            courier_tracking_id: record.courier_tracking_id,
            tracking_url: record.tracking_url,
            status: ShipmentStatus::Pending,
            cost: record.cost,
            shipped_at: None,
            delivered_at: None,
            created_at: Utc::now(),
        };
        state.shipments.insert(view.id, view.clone());

        if order_status == OrderStatus::Paid {
            state
                .orders
                .get_mut(&record.order_id)
                .expect("checked above")
                .status = OrderStatus::Processing;
        }
        Ok(view)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<ShipmentView>, DomainError> {
        Ok(self.state.lock().unwrap().shipments.get(&id).cloned())
    }

    fn find_by_order(&self, order_id: Uuid) -> Result<Option<ShipmentView>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .shipments
            .values()
            .find(|s| s.order_id == order_id)
            .cloned())
    }

    fn update_status(
        &self,
        id: Uuid,
        update: ShipmentStatusUpdate,
    ) -> Result<ShipmentView, DomainError> {
        let mut state = self.state.lock().unwrap();
        let plan = shipment::plan_transition(update.status);
        let now = Utc::now();

        let order_id = {
            let shipment = state
                .shipments
                .get_mut(&id)
                .ok_or_else(|| DomainError::NotFound(format!("shipment {id} not found")))?;
            shipment.status = update.status;
            if let Some(tracking_number) = update.tracking_number {
                shipment.tracking_number = Some(tracking_number);
            }
            if plan.stamp_shipped {
                shipment.shipped_at = Some(now);
            }
            if plan.stamp_delivered {
                shipment.delivered_at = Some(now);
            }
            shipment.order_id
        };

        if let Some(cascade) = plan.order_cascade {
            if let Some(order) = state.orders.get_mut(&order_id) {
                order.status = cascade;
                if cascade == OrderStatus::Completed {
                    order.completed_at = Some(now);
                }
            }
        }
        Ok(state.shipments[&id].clone())
    }

    fn update_tracking(
        &self,
        id: Uuid,
        tracking_number: String,
        courier: Option<String>,
    ) -> Result<ShipmentView, DomainError> {
        let mut state = self.state.lock().unwrap();
        let shipment = state
            .shipments
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound(format!("shipment {id} not found")))?;
        shipment.tracking_number = Some(tracking_number);
        if courier.is_some() {
            shipment.courier = courier;
        }
        Ok(shipment.clone())
    }

    fn order_parcel(&self, order_id: Uuid) -> Result<ParcelManifest, DomainError> {
        let state = self.state.lock().unwrap();
        let order = state
            .orders
            .get(&order_id)
            .ok_or_else(|| DomainError::NotFound(format!("order {order_id} not found")))?;
        Ok(ParcelManifest {
            order_id,
            order_number: order.order_number.clone(),
            order_status: order.status,
            customer_email: order.customer_email.clone(),
            receiver_name: order.address.receiver_name.clone(),
            receiver_phone: order.address.receiver_phone.clone(),
            items: order
                .items
                .iter()
                .map(|item| RateItem {
                    name: item.product_name.clone(),
                    description: Some(item.sku.clone()),
                    value: whole_units(&item.unit_price),
                    length: 30,
                    width: 20,
                    height: 5,
                    weight: 400,
                    quantity: item.quantity,
                })
                .collect(),
        })
    }
}

#[derive(Default)]
pub struct FakeGateway {
    fail: bool,
    reject_signatures: bool,
}

impl FakeGateway {
    pub fn failing() -> Self {
        Self {
            fail: true,
            reject_signatures: false,
        }
    }

    pub fn rejecting_signatures() -> Self {
        Self {
            fail: false,
            reject_signatures: true,
        }
    }
}

impl PaymentGateway for FakeGateway {
    fn create_transaction(&self, charge: &ChargeRequest) -> Result<GatewayRedirect, DomainError> {
        if self.fail {
            return Err(DomainError::Upstream(
                "failed to create payment: card declined".to_string(),
            ));
        }
        Ok(GatewayRedirect {
            token: Some("tok-1".to_string()),
            redirect_url: format!("https://pay.example.com/redirect/{}", charge.transaction_id),
        })
    }

    fn verify_signature(&self, _: &str, _: &str, _: &str, _: &str) -> bool {
        !self.reject_signatures
    }
}

pub struct FakeCourier;

impl CourierGateway for FakeCourier {
    fn check_rates(&self, query: &RateQuery) -> Result<Vec<RateQuote>, DomainError> {
        Ok(vec![RateQuote {
            courier_code: query.couriers.split(',').next().unwrap_or("jne").to_string(),
            courier_name: "JNE".to_string(),
            service: "REG".to_string(),
            description: None,
            price: 15000,
            estimated_days: Some("2-3 days".to_string()),
        }])
    }

    fn book(&self, request: &BookingRequest) -> Result<CourierBooking, DomainError> {
        Ok(CourierBooking {
            courier_order_id: format!("courier-order-{}", request.reference),
            tracking_id: Some("trk-1".to_string()),
            waybill: Some("WB-0001".to_string()),
            tracking_url: Some("https://track.example.com/WB-0001".to_string()),
            price: Some(15000),
        })
    }

    fn track(&self, courier_tracking_id: &str) -> Result<TrackingInfo, DomainError> {
        Ok(TrackingInfo {
            status: "on_process".to_string(),
            waybill: Some(courier_tracking_id.to_string()),
            link: None,
            history: vec![TrackingEvent {
                status: "confirmed".to_string(),
                note: None,
                updated_at: None,
            }],
        })
    }

    fn search_areas(&self, query: &str) -> Result<Vec<AreaSuggestion>, DomainError> {
        Ok(vec![AreaSuggestion {
            id: "IDNP6IDNC148".to_string(),
            name: query.to_string(),
            postal_code: Some(40111),
        }])
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl WaybillNotifier for RecordingNotifier {
    fn waybill_assigned(&self, email: &str, order_number: &str, waybill: &str, _courier: &str) {
        self.sent.lock().unwrap().push((
            email.to_string(),
            order_number.to_string(),
            waybill.to_string(),
        ));
    }
}
