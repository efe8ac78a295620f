use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

/// Staff role carried by every authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    /// Kitchen staff: moves orders from `pending` to `ready`.
    Preparateur,
    /// Front counter: takes orders and hands them over (`ready` to `delivered`).
    Accueil,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Preparateur, Role::Accueil];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Preparateur => "préparateur",
            Role::Accueil => "accueil",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Invalid role: {s}")))
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A user together with the stored password hash. Only used for login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_MAX_LEN: usize = 100;
const PASSWORD_BLACKLIST: [&str; 2] = ["Passw0rd", "Password123"];

/// Complexity rules applied to every new password.
pub fn validate_password(password: &str) -> Result<(), DomainError> {
    let len = password.chars().count();
    let ok = (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len)
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| c.is_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && !password.chars().any(char::is_whitespace)
        && !PASSWORD_BLACKLIST.contains(&password);

    if ok {
        Ok(())
    } else {
        Err(DomainError::validation(
            "Password does not meet complexity requirements",
        ))
    }
}
