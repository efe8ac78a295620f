//! Authentication: bearer JWTs, the [`Actor`](crate::domain::user::Actor)
//! request extractor and password hashing.

pub mod extractor;
pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
