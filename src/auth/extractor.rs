use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};

use super::jwt::{JwtError, JwtService};
use crate::domain::user::Actor;
use crate::errors::AppError;

/// Protected handlers take an [`Actor`] argument; the request is rejected with
/// `401` unless it carries a valid bearer token.
impl FromRequest for Actor {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<Actor, AppError> {
    let jwt = req
        .app_data::<web::Data<JwtService>>()
        .ok_or_else(|| AppError::Internal("JWT service is not configured".into()))?;

    let Some(header_value) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return Err(AppError::Unauthorized("Authorization header missing".into()));
    };

    let token = JwtService::extract_from_header(header_value)
        .ok_or_else(|| AppError::Unauthorized("Please login".into()))?;

    jwt.validate_token(token)
        .and_then(Actor::try_from)
        .map_err(|e| {
            log::warn!("rejected token on {}: {}", req.path(), e);
            match e {
                JwtError::ExpiredToken => AppError::Unauthorized("Token expired, please login".into()),
                _ => AppError::Unauthorized("Please login".into()),
            }
        })
}
