pub mod menus;
pub mod orders;
pub mod products;
pub mod users;

use actix_web::web;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Registers every `/api` route. Expects the services and the JWT service as
/// app data (see [`crate::AppState::configure`]).
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(orders::create_order))
            .route("", web::get().to(orders::list_orders))
            .route("/{id}", web::get().to(orders::get_order))
            .route("/{id}", web::delete().to(orders::delete_order))
            .route("/{id}/status", web::patch().to(orders::update_order_status)),
    )
    .service(
        web::scope("/products")
            .route("", web::get().to(products::list_products))
            .route("", web::post().to(products::create_product))
            .route("/{id}", web::get().to(products::get_product))
            .route("/{id}", web::put().to(products::update_product))
            .route("/{id}", web::delete().to(products::delete_product)),
    )
    .service(
        web::scope("/menus")
            .route("", web::get().to(menus::list_menus))
            .route("", web::post().to(menus::create_menu))
            .route("/{id}", web::get().to(menus::get_menu))
            .route("/{id}", web::put().to(menus::update_menu))
            .route("/{id}", web::delete().to(menus::delete_menu)),
    )
    .service(
        web::scope("/users")
            .route("", web::post().to(users::register))
            .route("", web::get().to(users::list_users))
            .route("/login", web::post().to(users::login)),
    );
}
