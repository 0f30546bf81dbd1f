use crate::domain::user::{AuthenticatedUser, UserRole};

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod contacts;
pub mod errors;
pub mod images;
pub mod orders;
pub mod partner;

pub use errors::{ServiceError, ServiceResult};

/// Reject callers whose role is not in `allowed`.
pub fn check_role(user: &AuthenticatedUser, allowed: &[UserRole]) -> ServiceResult<()> {
    if allowed.iter().any(|role| user.has_role(*role)) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Number of pages needed for `total` items.
pub fn total_pages(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1))
}
