pub mod orders;
pub mod payments;
pub mod reports;
pub mod shipments;

#[cfg(test)]
pub mod fakes;

use crate::domain::errors::DomainError;
use crate::domain::ports::AuthContext;

pub(crate) fn require_staff(auth: &AuthContext) -> Result<(), DomainError> {
    if !auth.is_staff() {
        return Err(DomainError::Forbidden(
            "admin access is required".to_string(),
        ));
    }
    Ok(())
}
