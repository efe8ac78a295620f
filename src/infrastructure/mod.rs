pub mod catalog_repo;
pub mod models;
pub mod order_repo;
pub mod user_repo;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::errors::DomainError;

pub use catalog_repo::DieselCatalogRepository;
pub use order_repo::DieselOrderRepository;
pub use user_repo::DieselUserRepository;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                log::debug!("unique violation: {}", info.message());
                DomainError::Conflict(unique_violation_message(info.constraint_name()).into())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                DomainError::Conflict(format!(
                    "Still referenced elsewhere: {}",
                    info.constraint_name().unwrap_or_else(|| info.message())
                ))
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

/// Client-facing text for a unique constraint; Postgres' own message names
/// internal constraints.
fn unique_violation_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("products_name_key") => "This product already exists",
        Some("users_username_key") => "Username already in use",
        _ => "This record already exists",
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}
