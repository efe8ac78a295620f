//! Role-based authorization.
//!
//! Every role gate in the service goes through these predicates so that the
//! admin override is defined in exactly one place. They perform no I/O; the
//! `require*` helpers only turn a refusal into [`DomainError::Forbidden`].

use super::errors::DomainError;
use super::user::{Actor, Role};

const ACCESS_DENIED: &str = "You dont have the right to access this resource";

/// `true` when `role` satisfies a check for `required`. Admin satisfies every check.
pub fn permits(role: Role, required: Role) -> bool {
    role == Role::Admin || role == required
}

/// `true` when `role` is one of `required`, or is admin.
pub fn permits_any(role: Role, required: &[Role]) -> bool {
    role == Role::Admin || required.contains(&role)
}

pub fn require(actor: &Actor, required: Role) -> Result<(), DomainError> {
    if permits(actor.role, required) {
        Ok(())
    } else {
        log::warn!(
            "user {} ({}) denied: {} role required",
            actor.id,
            actor.role,
            required
        );
        Err(DomainError::forbidden(ACCESS_DENIED))
    }
}

pub fn require_any(actor: &Actor, required: &[Role]) -> Result<(), DomainError> {
    if permits_any(actor.role, required) {
        Ok(())
    } else {
        log::warn!(
            "user {} ({}) denied: one of {:?} required",
            actor.id,
            actor.role,
            required
        );
        Err(DomainError::forbidden(ACCESS_DENIED))
    }
}
