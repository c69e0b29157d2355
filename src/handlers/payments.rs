use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::payment::{GatewayNotification, PaymentStatusUpdate, PaymentView};
use crate::domain::ports::AuthContext;
use crate::domain::statuses::{PaymentMethod, PaymentStatus};
use crate::errors::AppError;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub order_id: Uuid,
    pub method: PaymentMethod,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub transaction_id: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub amount: String,
    pub redirect_url: Option<String>,
    pub expires_at: Option<String>,
    pub initiated_at: String,
    pub settled_at: Option<String>,
}

impl From<PaymentView> for PaymentResponse {
    fn from(payment: PaymentView) -> Self {
        PaymentResponse {
            id: payment.id,
            order_id: payment.order_id,
            transaction_id: payment.transaction_id,
            method: payment.method,
            status: payment.status,
            amount: payment.amount.to_string(),
            redirect_url: payment.redirect_url,
            expires_at: payment.expires_at.map(|t| t.to_rfc3339()),
            initiated_at: payment.initiated_at.to_rfc3339(),
            settled_at: payment.settled_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
    pub webhook_payload: Option<Value>,
    pub signature_key: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /payments
///
/// Starts a payment attempt against the gateway and returns the redirect
/// URL the customer completes it on.
#[utoipa::path(
    post,
    path = "/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment initiated", body = PaymentResponse),
        (status = 400, description = "Order not payable or a pending payment already exists"),
        (status = 404, description = "Order not found"),
        (status = 502, description = "Payment gateway rejected the charge"),
    ),
    tag = "payments"
)]
pub async fn create_payment(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let payment = web::block(move || {
        state
            .payments
            .create(&auth, body.order_id, body.method)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(PaymentResponse::from(payment)))
}

/// GET /payments/order/{order_id}
#[utoipa::path(
    get,
    path = "/payments/order/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Payment attempts, newest first", body = [PaymentResponse]),
        (status = 404, description = "Order not found"),
    ),
    tag = "payments"
)]
pub async fn list_payments_for_order(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let payments = web::block(move || {
        state
            .payments
            .list_for_order(&auth, order_id)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let payments: Vec<PaymentResponse> = payments.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(payments))
}

/// GET /payments/{id}
#[utoipa::path(
    get,
    path = "/payments/{id}",
    params(("id" = Uuid, Path, description = "Payment UUID")),
    responses(
        (status = 200, description = "Payment found", body = PaymentResponse),
        (status = 404, description = "Payment not found"),
    ),
    tag = "payments"
)]
pub async fn get_payment(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let payment_id = path.into_inner();
    let payment = web::block(move || state.payments.get(&auth, payment_id).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PaymentResponse::from(payment)))
}

/// PUT /payments/{id}/status
///
/// Manual admin override; a SETTLEMENT cascades the order to PAID.
#[utoipa::path(
    put,
    path = "/payments/{id}/status",
    params(("id" = Uuid, Path, description = "Payment UUID")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = PaymentResponse),
        (status = 403, description = "Caller is not staff"),
        (status = 404, description = "Payment not found"),
    ),
    tag = "payments"
)]
pub async fn update_payment_status(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePaymentStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let payment_id = path.into_inner();
    let body = body.into_inner();
    let update = PaymentStatusUpdate {
        status: body.status,
        webhook_payload: body.webhook_payload,
        signature_key: body.signature_key,
    };

    let payment = web::block(move || {
        state
            .payments
            .update_status(&auth, payment_id, update)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PaymentResponse::from(payment)))
}

/// POST /payments/webhook
///
/// Midtrans notification endpoint. Unauthenticated; trust comes from the
/// SHA-512 signature embedded in the payload.
#[utoipa::path(
    post,
    path = "/payments/webhook",
    request_body = Value,
    responses(
        (status = 200, description = "Notification applied", body = PaymentResponse),
        (status = 400, description = "Malformed notification"),
        (status = 403, description = "Signature mismatch"),
        (status = 404, description = "Unknown transaction id"),
    ),
    tag = "payments"
)]
pub async fn payment_webhook(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let raw = body.into_inner();
    let notification = parse_notification(&raw)?;

    let payment =
        web::block(move || state.payments.apply_webhook(notification).map_err(AppError::from))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PaymentResponse::from(payment)))
}

fn parse_notification(raw: &Value) -> Result<GatewayNotification, AppError> {
    let field = |key: &str| {
        raw.get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest(format!("webhook payload is missing '{key}'")))
    };
    Ok(GatewayNotification {
        // Midtrans' order_id is the transaction id we generated.
        transaction_id: field("order_id")?,
        transaction_status: field("transaction_status")?,
        fraud_status: raw
            .get("fraud_status")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        status_code: field("status_code")?,
        gross_amount: field("gross_amount")?,
        signature_key: field("signature_key")?,
        raw: raw.clone(),
    })
}
