use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password};
use crate::domain::ports::AuthContext;
use crate::domain::statuses::Role;
use crate::errors::AppError;
use crate::infrastructure::models::AddressRow;
use crate::infrastructure::user_repo::{NewAddressInput, NewUserRecord, UserAccount};
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: String,
}

impl From<UserAccount> for UserResponse {
    fn from(user: UserAccount) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            phone: user.phone,
            role: user.role,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddressRequest {
    pub label: Option<String>,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    #[serde(default)]
    pub is_default: bool,
}

impl From<AddressRequest> for NewAddressInput {
    fn from(body: AddressRequest) -> Self {
        NewAddressInput {
            label: body.label,
            recipient_name: body.recipient_name,
            recipient_phone: body.recipient_phone,
            line1: body.line1,
            line2: body.line2,
            city: body.city,
            province: body.province,
            postal_code: body.postal_code,
            is_default: body.is_default,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressResponse {
    pub id: Uuid,
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

impl From<AddressRow> for AddressResponse {
    fn from(row: AddressRow) -> Self {
        AddressResponse {
            id: row.id,
            label: row.label,
            recipient_name: row.recipient_name,
            recipient_phone: row.recipient_phone,
            line1: row.line1,
            line2: row.line2,
            city: row.city,
            province: row.province,
            postal_code: row.postal_code,
            is_default: row.is_default,
        }
    }
}

fn validate_registration(body: &RegisterRequest) -> Result<(), AppError> {
    if !body.email.contains('@') {
        return Err(AppError::BadRequest("email is not valid".to_string()));
    }
    if body.password.len() < 8 {
        return Err(AppError::BadRequest(
            "password must be at least 8 characters".to_string(),
        ));
    }
    if body.full_name.trim().is_empty() {
        return Err(AppError::BadRequest("full name is required".to_string()));
    }
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /auth/register
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid input or email already registered"),
    ),
    tag = "auth"
)]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    validate_registration(&body)?;

    let user = web::block(move || {
        let password_hash = hash_password(&body.password)?;
        state.users.create_user(NewUserRecord {
            email: body.email,
            password_hash,
            full_name: body.full_name,
            phone: body.phone,
            role: Role::Customer,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
    .map_err(AppError::from)?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid email or password"),
    ),
    tag = "auth"
)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let response = web::block(move || {
        let user = state
            .users
            .find_by_email(&body.email)
            .map_err(AppError::from)?
            .filter(|user| verify_password(&user.password_hash, &body.password))
            .ok_or_else(|| AppError::Unauthorized("invalid email or password".to_string()))?;

        let token = state
            .tokens
            .issue(user.id, user.role)
            .map_err(AppError::from)?;
        Ok::<_, AppError>(LoginResponse {
            token,
            user: user.into(),
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(response))
}

/// GET /auth/me
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "The calling account", body = UserResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "auth"
)]
pub async fn me(state: web::Data<AppState>, auth: AuthContext) -> Result<HttpResponse, AppError> {
    let user = web::block(move || {
        state
            .users
            .find_by_id(auth.user_id)
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound("account no longer exists".to_string()))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// GET /auth/addresses
#[utoipa::path(
    get,
    path = "/auth/addresses",
    responses((status = 200, description = "Saved addresses", body = [AddressResponse])),
    tag = "auth"
)]
pub async fn list_addresses(
    state: web::Data<AppState>,
    auth: AuthContext,
) -> Result<HttpResponse, AppError> {
    let rows = web::block(move || state.users.list_addresses(auth.user_id).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let addresses: Vec<AddressResponse> = rows.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(addresses))
}

/// POST /auth/addresses
#[utoipa::path(
    post,
    path = "/auth/addresses",
    request_body = AddressRequest,
    responses((status = 201, description = "Address saved", body = AddressResponse)),
    tag = "auth"
)]
pub async fn create_address(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<AddressRequest>,
) -> Result<HttpResponse, AppError> {
    let input: NewAddressInput = body.into_inner().into();
    let row = web::block(move || {
        state
            .users
            .create_address(auth.user_id, input)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(AddressResponse::from(row)))
}

/// PUT /auth/addresses/{id}
#[utoipa::path(
    put,
    path = "/auth/addresses/{id}",
    params(("id" = Uuid, Path, description = "Address UUID")),
    request_body = AddressRequest,
    responses(
        (status = 200, description = "Address updated", body = AddressResponse),
        (status = 404, description = "Address not found"),
    ),
    tag = "auth"
)]
pub async fn update_address(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<AddressRequest>,
) -> Result<HttpResponse, AppError> {
    let address_id = path.into_inner();
    let input: NewAddressInput = body.into_inner().into();

    let row = web::block(move || {
        state
            .users
            .update_address(auth.user_id, address_id, input)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(AddressResponse::from(row)))
}

/// DELETE /auth/addresses/{id}
#[utoipa::path(
    delete,
    path = "/auth/addresses/{id}",
    params(("id" = Uuid, Path, description = "Address UUID")),
    responses(
        (status = 204, description = "Address deleted"),
        (status = 404, description = "Address not found"),
    ),
    tag = "auth"
)]
pub async fn delete_address(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let address_id = path.into_inner();
    web::block(move || {
        state
            .users
            .delete_address(auth.user_id, address_id)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
