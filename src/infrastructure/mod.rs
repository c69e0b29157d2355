pub mod biteship;
pub mod brevo;
pub mod catalog_repo;
pub mod midtrans;
pub mod models;
pub mod order_repo;
pub mod payment_repo;
pub mod sequences;
pub mod shipment_repo;
pub mod user_repo;

use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}
