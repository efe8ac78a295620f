use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::JwtService;
use crate::domain::user::{Actor, Role, User};
use crate::errors::AppError;
use crate::AppUserService;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// `admin`, `préparateur` or `accueil`.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            username: u.username,
            role: u.role.as_str().to_string(),
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    pub user: UserResponse,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Missing field, unknown role or weak password"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Username already in use"),
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn register(
    actor: Actor,
    service: web::Data<AppUserService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let role: Role = body
        .role
        .ok_or_else(|| AppError::BadRequest("Role is required".into()))?
        .parse()?;

    let user = web::block(move || service.register(&actor, &body.username, &body.password, role))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users, newest first", body = [UserResponse]),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(
    actor: Actor,
    service: web::Data<AppUserService>,
) -> Result<HttpResponse, AppError> {
    let users = web::block(move || service.list(&actor))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/users/login
///
/// Exchanges credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid username or password"),
    ),
    tag = "users"
)]
pub async fn login(
    service: web::Data<AppUserService>,
    jwt: web::Data<JwtService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    // Argon2 verification is CPU-bound, keep it off the worker thread.
    let user = web::block(move || service.login(&body.username, &body.password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let token = jwt
        .issue_token(user.id, user.role)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}
