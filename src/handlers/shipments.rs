use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::shipments::CourierShipmentRequest;
use crate::domain::ports::AuthContext;
use crate::domain::shipment::{NewShipmentRecord, RateQuery, ShipmentStatusUpdate, ShipmentView};
use crate::domain::statuses::ShipmentStatus;
use crate::errors::AppError;
use crate::AppState;

use super::parse_money;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShipmentRequest {
    pub order_id: Uuid,
    pub courier: Option<String>,
    pub service: Option<String>,
    pub tracking_number: Option<String>,
    /// Decimal amount as a string, e.g. "15000.00"
    pub cost: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourierShipmentRequest {
    pub order_id: Uuid,
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
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateShipmentStatusRequest {
    pub status: ShipmentStatus,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTrackingRequest {
    pub tracking_number: String,
    pub courier: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LocationSearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShipmentResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub courier: Option<String>,
    pub service: Option<String>,
    pub tracking_number: Option<String>,
    pub courier_order_id: Option<String>,
    pub courier_tracking_id: Option<String>,
    pub tracking_url: Option<String>,
    pub status: ShipmentStatus,
    pub cost: String,
    pub shipped_at: Option<String>,
    pub delivered_at: Option<String>,
    pub created_at: String,
}

impl From<ShipmentView> for ShipmentResponse {
    fn from(shipment: ShipmentView) -> Self {
        ShipmentResponse {
            id: shipment.id,
            order_id: shipment.order_id,
            courier: shipment.courier,
            service: shipment.service,
            tracking_number: shipment.tracking_number,
            courier_order_id: shipment.courier_order_id,
            courier_tracking_id: shipment.courier_tracking_id,
            tracking_url: shipment.tracking_url,
            status: shipment.status,
            cost: shipment.cost.to_string(),
            shipped_at: shipment.shipped_at.map(|t| t.to_rfc3339()),
            delivered_at: shipment.delivered_at.map(|t| t.to_rfc3339()),
            created_at: shipment.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackingResponse {
    pub courier: Option<String>,
    pub tracking_number: Option<String>,
    pub status: ShipmentStatus,
    pub tracking_url: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /shipments/check-rates
///
/// Stateless pass-through to the courier aggregator.
#[utoipa::path(
    post,
    path = "/shipments/check-rates",
    request_body = RateQuery,
    responses(
        (status = 200, description = "Available courier rates", body = Vec<crate::domain::shipment::RateQuote>),
        (status = 400, description = "Missing location pair or empty item list"),
        (status = 502, description = "Aggregator error"),
    ),
    tag = "shipments"
)]
pub async fn check_rates(
    state: web::Data<AppState>,
    _auth: AuthContext,
    body: web::Json<RateQuery>,
) -> Result<HttpResponse, AppError> {
    let query = body.into_inner();
    let quotes = web::block(move || state.shipments.check_rates(query).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(quotes))
}

/// POST /shipments
///
/// Manual shipment entry; the order must be PAID or PROCESSING and must
/// not have a shipment yet.
#[utoipa::path(
    post,
    path = "/shipments",
    request_body = CreateShipmentRequest,
    responses(
        (status = 201, description = "Shipment created", body = ShipmentResponse),
        (status = 400, description = "Order not shippable or already shipped"),
        (status = 403, description = "Caller is not staff"),
        (status = 404, description = "Order not found"),
    ),
    tag = "shipments"
)]
pub async fn create_shipment(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<CreateShipmentRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let record = NewShipmentRecord {
        order_id: body.order_id,
        courier: body.courier,
        service: body.service,
        tracking_number: body.tracking_number,
        cost: parse_money("cost", &body.cost)?,
        courier_order_id: None,
        courier_tracking_id: None,
        tracking_url: None,
    };

    let shipment = web::block(move || state.shipments.create(&auth, record).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ShipmentResponse::from(shipment)))
}

/// POST /shipments/biteship
///
/// Books the parcel with Biteship and persists the returned identifiers;
/// the waybill email is fire-and-forget.
#[utoipa::path(
    post,
    path = "/shipments/biteship",
    request_body = CreateCourierShipmentRequest,
    responses(
        (status = 201, description = "Shipment booked", body = ShipmentResponse),
        (status = 400, description = "Order not shippable or already shipped"),
        (status = 403, description = "Caller is not staff"),
        (status = 404, description = "Order not found"),
        (status = 502, description = "Aggregator error"),
    ),
    tag = "shipments"
)]
pub async fn create_courier_shipment(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<CreateCourierShipmentRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let request = CourierShipmentRequest {
        order_id: body.order_id,
        courier_company: body.courier_company,
        courier_type: body.courier_type,
        origin_area_id: body.origin_area_id,
        destination_area_id: body.destination_area_id,
        destination_contact_name: body.destination_contact_name,
        destination_contact_phone: body.destination_contact_phone,
        destination_contact_email: body.destination_contact_email,
        destination_address: body.destination_address,
        destination_postal_code: body.destination_postal_code,
        destination_note: body.destination_note,
    };

    let shipment = web::block(move || {
        state
            .shipments
            .create_with_courier(&auth, request)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ShipmentResponse::from(shipment)))
}

/// GET /shipments/locations/search
#[utoipa::path(
    get,
    path = "/shipments/locations/search",
    params(("q" = Option<String>, Query, description = "Area name to search for")),
    responses(
        (status = 200, description = "Matching areas", body = Vec<crate::domain::shipment::AreaSuggestion>),
        (status = 400, description = "Missing query"),
    ),
    tag = "shipments"
)]
pub async fn search_locations(
    state: web::Data<AppState>,
    _auth: AuthContext,
    query: web::Query<LocationSearchParams>,
) -> Result<HttpResponse, AppError> {
    let q = query.into_inner().q.unwrap_or_default();
    let areas = web::block(move || state.shipments.search_locations(&q).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(areas))
}

/// GET /shipments/order/{order_id}/track
///
/// Read-only projection for the owning customer or staff.
#[utoipa::path(
    get,
    path = "/shipments/order/{order_id}/track",
    params(("order_id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Tracking projection", body = TrackingResponse),
        (status = 403, description = "Order belongs to another customer"),
        (status = 404, description = "No shipment for this order"),
    ),
    tag = "shipments"
)]
pub async fn track_by_order(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let projection =
        web::block(move || state.shipments.track_by_order(&auth, order_id).map_err(AppError::from))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(TrackingResponse {
        courier: projection.courier,
        tracking_number: projection.tracking_number,
        status: projection.status,
        tracking_url: projection.tracking_url,
    }))
}

/// GET /shipments/{id}/tracking
///
/// Live tracking through the aggregator.
#[utoipa::path(
    get,
    path = "/shipments/{id}/tracking",
    params(("id" = Uuid, Path, description = "Shipment UUID")),
    responses(
        (status = 200, description = "Aggregator tracking history", body = crate::domain::shipment::TrackingInfo),
        (status = 400, description = "Shipment has no courier tracking id"),
        (status = 404, description = "Shipment not found"),
        (status = 502, description = "Aggregator error"),
    ),
    tag = "shipments"
)]
pub async fn live_tracking(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let shipment_id = path.into_inner();
    let info =
        web::block(move || state.shipments.live_tracking(&auth, shipment_id).map_err(AppError::from))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(info))
}

/// GET /shipments/{id}
#[utoipa::path(
    get,
    path = "/shipments/{id}",
    params(("id" = Uuid, Path, description = "Shipment UUID")),
    responses(
        (status = 200, description = "Shipment found", body = ShipmentResponse),
        (status = 404, description = "Shipment not found"),
    ),
    tag = "shipments"
)]
pub async fn get_shipment(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let shipment_id = path.into_inner();
    let shipment = web::block(move || state.shipments.get(&auth, shipment_id).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ShipmentResponse::from(shipment)))
}

/// PUT /shipments/{id}/status
///
/// SHIPPED cascades the order to SHIPPED; DELIVERED completes it.
#[utoipa::path(
    put,
    path = "/shipments/{id}/status",
    params(("id" = Uuid, Path, description = "Shipment UUID")),
    request_body = UpdateShipmentStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ShipmentResponse),
        (status = 403, description = "Caller is not staff"),
        (status = 404, description = "Shipment not found"),
    ),
    tag = "shipments"
)]
pub async fn update_shipment_status(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<UpdateShipmentStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let shipment_id = path.into_inner();
    let body = body.into_inner();
    let update = ShipmentStatusUpdate {
        status: body.status,
        tracking_number: body.tracking_number,
    };

    let shipment = web::block(move || {
        state
            .shipments
            .update_status(&auth, shipment_id, update)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ShipmentResponse::from(shipment)))
}

/// PUT /shipments/{id}/tracking
///
/// Tracking-number-only update for courier webhook ingestion.
#[utoipa::path(
    put,
    path = "/shipments/{id}/tracking",
    params(("id" = Uuid, Path, description = "Shipment UUID")),
    request_body = UpdateTrackingRequest,
    responses(
        (status = 200, description = "Tracking updated", body = ShipmentResponse),
        (status = 403, description = "Caller is not staff"),
        (status = 404, description = "Shipment not found"),
    ),
    tag = "shipments"
)]
pub async fn update_tracking(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTrackingRequest>,
) -> Result<HttpResponse, AppError> {
    let shipment_id = path.into_inner();
    let body = body.into_inner();

    let shipment = web::block(move || {
        state
            .shipments
            .update_tracking(&auth, shipment_id, body.tracking_number, body.courier)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ShipmentResponse::from(shipment)))
}
