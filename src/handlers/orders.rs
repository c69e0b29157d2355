use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::{AddressSnapshot, CheckoutInput, LineRequest, OrderItemView, OrderView};
use crate::domain::ports::AuthContext;
use crate::domain::statuses::{OrderStatus, OrderType};
use crate::errors::AppError;
use crate::AppState;

use super::parse_money;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShippingAddressDto {
    pub receiver_name: String,
    pub receiver_phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

impl From<ShippingAddressDto> for AddressSnapshot {
    fn from(dto: ShippingAddressDto) -> Self {
        AddressSnapshot {
            receiver_name: dto.receiver_name,
            receiver_phone: dto.receiver_phone,
            line1: dto.line1,
            line2: dto.line2,
            city: dto.city,
            province: dto.province,
            postal_code: dto.postal_code,
        }
    }
}

impl From<AddressSnapshot> for ShippingAddressDto {
    fn from(address: AddressSnapshot) -> Self {
        ShippingAddressDto {
            receiver_name: address.receiver_name,
            receiver_phone: address.receiver_phone,
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            province: address.province,
            postal_code: address.postal_code,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub variant_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub order_type: OrderType,
    pub items: Vec<OrderLineRequest>,
    pub shipping_address: ShippingAddressDto,
    /// Decimal amount as a string to avoid floating-point issues, e.g. "15000.00"
    pub shipping_cost: String,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub size: String,
    pub color: String,
    pub unit_price: String,
    pub quantity: i32,
    pub subtotal: String,
}

impl From<OrderItemView> for OrderItemResponse {
    fn from(item: OrderItemView) -> Self {
        OrderItemResponse {
            id: item.id,
            product_id: item.product_id,
            variant_id: item.variant_id,
            product_name: item.product_name,
            sku: item.sku,
            size: item.size,
            color: item.color,
            unit_price: item.unit_price.to_string(),
            quantity: item.quantity,
            subtotal: item.subtotal.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub subtotal: String,
    pub shipping_cost: String,
    pub total: String,
    pub note: Option<String>,
    pub shipping_address: ShippingAddressDto,
    pub paid_at: Option<String>,
    pub completed_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        OrderResponse {
            id: order.id,
            order_number: order.order_number,
            user_id: order.user_id,
            order_type: order.order_type,
            status: order.status,
            subtotal: order.subtotal.to_string(),
            shipping_cost: order.shipping_cost.to_string(),
            total: order.total.to_string(),
            note: order.note,
            shipping_address: order.address.into(),
            paid_at: order.paid_at.map(|t| t.to_rfc3339()),
            completed_at: order.completed_at.map(|t| t.to_rfc3339()),
            cancelled_at: order.cancelled_at.map(|t| t.to_rfc3339()),
            created_at: order.created_at.to_rfc3339(),
            items: order.items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub status: Option<OrderStatus>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Checkout: snapshots the cart into an order, decrements variant stock
/// and assigns the date-scoped order number, all in one transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Empty cart, inactive variant or insufficient stock"),
        (status = 404, description = "Variant or user not found"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let input = CheckoutInput {
        user_id: auth.user_id,
        order_type: body.order_type,
        lines: body
            .items
            .into_iter()
            .map(|line| LineRequest {
                variant_id: line.variant_id,
                quantity: line.quantity,
            })
            .collect(),
        address: body.shipping_address.into(),
        shipping_cost: parse_money("shipping_cost", &body.shipping_cost)?,
        note: body.note,
    };

    let order = web::block(move || state.orders.checkout(&auth, input).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders/my
#[utoipa::path(
    get,
    path = "/orders/my",
    responses(
        (status = 200, description = "The caller's orders, newest first", body = [OrderResponse]),
    ),
    tag = "orders"
)]
pub async fn my_orders(
    state: web::Data<AppState>,
    auth: AuthContext,
) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || state.orders.my_orders(&auth).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let orders: Vec<OrderResponse> = orders.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(orders))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 403, description = "Order belongs to another customer"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = web::block(move || state.orders.get(&auth, order_id).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /orders
///
/// Admin listing with pagination and an optional status filter.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("status" = Option<OrderStatus>, Query, description = "Filter by order status"),
    ),
    responses(
        (status = 200, description = "Paginated orders", body = ListOrdersResponse),
        (status = 403, description = "Caller is not staff"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    auth: AuthContext,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let status = params.status;

    let result =
        web::block(move || state.orders.list(&auth, page, limit, status).map_err(AppError::from))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// PUT /orders/{id}/status
///
/// Admin transition. Terminal orders reject every update; a cancel
/// restores item stock.
#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Order is in a terminal state"),
        (status = 403, description = "Caller is not staff"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status = body.into_inner().status;

    let order = web::block(move || {
        state
            .orders
            .update_status(&auth, order_id, status)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}
