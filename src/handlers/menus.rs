use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::catalog::{parse_price, require_name, Menu, MenuChanges, NewMenu};
use crate::domain::user::Actor;
use crate::errors::AppError;
use crate::AppCatalogService;

use super::MessageResponse;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Used for both creation and partial updates. On creation every field is
/// required.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuRequest {
    pub name: Option<String>,
    /// Decimal price as a string, e.g. "8.90"
    pub price: Option<String>,
    /// Products in the bundle, in display order. Repeats are allowed.
    pub product_ids: Option<Vec<Uuid>>,
}

impl MenuRequest {
    fn into_new_menu(self) -> Result<NewMenu, AppError> {
        let name = require_name(self.name)?;
        let price = self
            .price
            .ok_or_else(|| AppError::BadRequest("Price is required".into()))?;
        Ok(NewMenu {
            name,
            price: parse_price(&price)?,
            product_ids: self.product_ids.unwrap_or_default(),
        })
    }

    fn into_changes(self) -> Result<MenuChanges, AppError> {
        Ok(MenuChanges {
            name: self.name.map(|n| require_name(Some(n))).transpose()?,
            price: self.price.as_deref().map(parse_price).transpose()?,
            product_ids: self.product_ids,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub id: Uuid,
    pub name: String,
    pub price: String,
    pub product_ids: Vec<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Menu> for MenuResponse {
    fn from(m: Menu) -> Self {
        MenuResponse {
            id: m.id,
            name: m.name,
            price: m.price.to_string(),
            product_ids: m.product_ids,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/menus
#[utoipa::path(
    get,
    path = "/api/menus",
    responses(
        (status = 200, description = "All menus, newest first", body = [MenuResponse]),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "menus"
)]
pub async fn list_menus(
    _actor: Actor,
    service: web::Data<AppCatalogService>,
) -> Result<HttpResponse, AppError> {
    let menus = web::block(move || service.list_menus())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<MenuResponse> = menus.into_iter().map(MenuResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/menus/{id}
#[utoipa::path(
    get,
    path = "/api/menus/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu UUID"),
    ),
    responses(
        (status = 200, description = "Menu found", body = MenuResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Menu not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "menus"
)]
pub async fn get_menu(
    _actor: Actor,
    service: web::Data<AppCatalogService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let menu = web::block(move || service.get_menu(&id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(MenuResponse::from(menu)))
}

/// POST /api/menus
#[utoipa::path(
    post,
    path = "/api/menus",
    request_body = MenuRequest,
    responses(
        (status = 201, description = "Menu created", body = MenuResponse),
        (status = 400, description = "Missing field, invalid price or unknown product"),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "menus"
)]
pub async fn create_menu(
    actor: Actor,
    service: web::Data<AppCatalogService>,
    body: web::Json<MenuRequest>,
) -> Result<HttpResponse, AppError> {
    let menu = body.into_inner().into_new_menu()?;

    let menu = web::block(move || service.create_menu(&actor, menu))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(MenuResponse::from(menu)))
}

/// PUT /api/menus/{id}
///
/// Partial update. A provided `productIds` replaces the whole list.
#[utoipa::path(
    put,
    path = "/api/menus/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu UUID"),
    ),
    request_body = MenuRequest,
    responses(
        (status = 200, description = "Menu updated", body = MenuResponse),
        (status = 400, description = "Malformed id, invalid field or unknown product"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Menu not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "menus"
)]
pub async fn update_menu(
    actor: Actor,
    service: web::Data<AppCatalogService>,
    path: web::Path<String>,
    body: web::Json<MenuRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let changes = body.into_inner().into_changes()?;

    let menu = web::block(move || service.update_menu(&actor, &id, changes))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(MenuResponse::from(menu)))
}

/// DELETE /api/menus/{id}
#[utoipa::path(
    delete,
    path = "/api/menus/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu UUID"),
    ),
    responses(
        (status = 200, description = "Menu deleted", body = MessageResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Menu not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "menus"
)]
pub async fn delete_menu(
    actor: Actor,
    service: web::Data<AppCatalogService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || service.delete_menu(&actor, &id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Menu deleted successfully")))
}
