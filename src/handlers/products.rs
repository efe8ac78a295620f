use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::catalog::{parse_price, require_name, NewProduct, Product, ProductChanges};
use crate::domain::user::Actor;
use crate::errors::AppError;
use crate::AppCatalogService;

use super::MessageResponse;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Used for both creation and partial updates. On creation `name` and
/// `price` are required.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Decimal price as a string to avoid floating-point issues, e.g. "5.20"
    pub price: Option<String>,
    pub image: Option<String>,
    pub is_available: Option<bool>,
}

impl ProductRequest {
    fn into_new_product(self) -> Result<NewProduct, AppError> {
        let name = require_name(self.name)?;
        let price = self
            .price
            .ok_or_else(|| AppError::BadRequest("Price is required".into()))?;
        Ok(NewProduct {
            name,
            description: self.description,
            price: parse_price(&price)?,
            image: self.image,
            is_available: self.is_available.unwrap_or(true),
        })
    }

    fn into_changes(self) -> Result<ProductChanges, AppError> {
        Ok(ProductChanges {
            name: self.name.map(|n| require_name(Some(n))).transpose()?,
            description: self.description,
            price: self.price.as_deref().map(parse_price).transpose()?,
            image: self.image,
            is_available: self.is_available,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub is_available: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price.to_string(),
            image: p.image,
            is_available: p.is_available,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "All products, newest first", body = [ProductResponse]),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn list_products(
    _actor: Actor,
    service: web::Data<AppCatalogService>,
) -> Result<HttpResponse, AppError> {
    let products = web::block(move || service.list_products())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn get_product(
    _actor: Actor,
    service: web::Data<AppCatalogService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let product = web::block(move || service.get_product(&id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Missing name or invalid price"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "A product with this name already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn create_product(
    actor: Actor,
    service: web::Data<AppCatalogService>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product = body.into_inner().into_new_product()?;

    let product = web::block(move || service.create_product(&actor, product))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// PUT /api/products/{id}
///
/// Partial update: absent fields are left unchanged.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Malformed id, blank name or invalid price"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Another product already has this name"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn update_product(
    actor: Actor,
    service: web::Data<AppCatalogService>,
    path: web::Path<String>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let changes = body.into_inner().into_changes()?;

    let product = web::block(move || service.update_product(&actor, &id, changes))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product is part of a menu"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn delete_product(
    actor: Actor,
    service: web::Data<AppCatalogService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || service.delete_product(&actor, &id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Product deleted successfully")))
}
