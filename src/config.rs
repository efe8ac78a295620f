use thiserror::Error;

use crate::auth::JwtConfig;

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("JWT_SECRET must be at least 32 characters")]
    WeakSecret,

    #[error("BOOTSTRAP_ADMIN_USERNAME and BOOTSTRAP_ADMIN_PASSWORD must be set together")]
    IncompleteBootstrap,
}

/// First admin account, created at startup when no user exists yet.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub pool_size: u32,
    pub jwt: JwtConfig,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl AppConfig {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));
        let or_default = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let database_url = required("DATABASE_URL")?;
        let host = or_default("HOST", "0.0.0.0");
        let port = parse_number("PORT", or_default("PORT", "8080"))?;
        let pool_size = parse_number("DATABASE_POOL_SIZE", or_default("DATABASE_POOL_SIZE", "10"))?;

        let secret = required("JWT_SECRET")?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }
        let expiration_minutes = parse_number(
            "JWT_EXPIRATION_MINUTES",
            or_default("JWT_EXPIRATION_MINUTES", "10080"),
        )?;
        let issuer = or_default("JWT_ISSUER", "fastfood-orders");

        let bootstrap_admin = match (
            get("BOOTSTRAP_ADMIN_USERNAME"),
            get("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteBootstrap),
        };

        Ok(AppConfig {
            database_url,
            host,
            port,
            pool_size,
            jwt: JwtConfig {
                secret,
                expiration_minutes,
                issuer,
            },
            bootstrap_admin,
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|_| ConfigError::Invalid { name, value })
}
