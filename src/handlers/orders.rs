use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::{ItemRequest, Order, OrderStatus};
use crate::domain::user::Actor;
use crate::errors::AppError;
use crate::AppOrderService;

use super::MessageResponse;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// One line of a new order: exactly one of `productId` or `menuId`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Option<Uuid>,
    pub menu_id: Option<Uuid>,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    /// Optional; new orders always start as `pending`.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of `pending`, `ready`, `delivered`.
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    /// `product` or `menu`.
    #[serde(rename = "type")]
    pub item_type: String,
    pub ref_id: Uuid,
    /// Unit price captured when the order was placed, e.g. "5.20"
    pub price: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub items: Vec<OrderItemResponse>,
    pub status: String,
    pub created_by: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepared_by: Option<Uuid>,
    pub total_price: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id,
            items: order
                .items
                .into_iter()
                .map(|line| OrderItemResponse {
                    item_type: line.item.kind().as_str().to_string(),
                    ref_id: line.item.id(),
                    price: line.price.to_string(),
                    quantity: line.quantity,
                })
                .collect(),
            status: order.status.as_str().to_string(),
            created_by: order.created_by,
            prepared_by: order.prepared_by,
            total_price: order.total_price.to_string(),
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Prices every item against the current catalog and stores the order as
/// `pending`. Nothing is written when any item fails to resolve.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Empty order, malformed item or unknown / unavailable item"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller may not take orders"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn create_order(
    actor: Actor,
    service: web::Data<AppOrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    if let Some(status) = body.status.as_deref() {
        if status.parse::<OrderStatus>()? != OrderStatus::Pending {
            return Err(AppError::BadRequest("New orders must be pending".into()));
        }
    }
    let items = body
        .items
        .into_iter()
        .map(|i| ItemRequest::from_parts(i.product_id, i.menu_id, i.quantity))
        .collect::<Result<Vec<_>, _>>()?;

    let order = web::block(move || service.create_order(&actor, items))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /api/orders
///
/// The preparation queue: pending orders, oldest first.
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Pending orders", body = [OrderResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller may not read the queue"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn list_orders(
    actor: Actor,
    service: web::Data<AppOrderService>,
) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || service.list_awaiting_preparation(&actor))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 400, description = "Malformed id"),
        (status = 403, description = "Caller may not read orders"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_order(
    actor: Actor,
    service: web::Data<AppOrderService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let order = web::block(move || service.get_order(&actor, &id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PATCH /api/orders/{id}/status
///
/// Moves the order one step along `pending → ready → delivered`.
#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Missing or unknown status, or wrong current status"),
        (status = 403, description = "Caller may not set this status"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn update_order_status(
    actor: Actor,
    service: web::Data<AppOrderService>,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status = body.into_inner().status;

    let order = web::block(move || service.update_status(&actor, &id, status.as_deref()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// DELETE /api/orders/{id}
///
/// Only the author of an order may delete it.
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 400, description = "Malformed id"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn delete_order(
    actor: Actor,
    service: web::Data<AppOrderService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || service.delete_order(&actor, &id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Order deleted successfully")))
}
