use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::InvalidState(msg) | DomainError::Validation(msg) => {
                AppError::BadRequest(msg)
            }
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            DomainError::Upstream(msg) => AppError::BadGateway(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = |msg: &str| serde_json::json!({ "error": msg });
        match self {
            AppError::NotFound(msg) => HttpResponse::NotFound().json(body(msg)),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(body(msg)),
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(body(msg)),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(body(msg)),
            AppError::BadGateway(msg) => HttpResponse::BadGateway().json(body(msg)),
            // Internal details stay in the logs, not in responses.
            AppError::Internal(_) => HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "Internal server error" })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("order x not found".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_request_returns_400() {
        let resp = AppError::BadRequest("insufficient stock".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_returns_401() {
        let resp = AppError::Unauthorized("missing bearer token".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn forbidden_returns_403() {
        let resp = AppError::Forbidden("admins only".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn upstream_failures_return_502() {
        let resp = AppError::BadGateway("gateway exploded".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn internal_error_returns_500_and_hides_details() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_state_maps_to_bad_request() {
        let app: AppError =
            DomainError::InvalidState("order is cancelled".to_string()).into();
        assert!(matches!(app, AppError::BadRequest(_)));
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let app: AppError = DomainError::Validation("no items".to_string()).into();
        assert!(matches!(app, AppError::BadRequest(_)));
    }

    #[test]
    fn upstream_maps_to_bad_gateway() {
        let app: AppError = DomainError::Upstream("midtrans is down".to_string()).into();
        assert!(matches!(app, AppError::BadGateway(_)));
    }

    #[test]
    fn forbidden_maps_to_forbidden() {
        let app: AppError = DomainError::Forbidden("not yours".to_string()).into();
        assert!(matches!(app, AppError::Forbidden(_)));
    }
}
