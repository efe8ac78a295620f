use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{self, menus, orders, products, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fast-food orders API",
        description = "Order taking, kitchen queue and catalog management for counter staff."
    ),
    paths(
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::update_order_status,
        orders::delete_order,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        menus::list_menus,
        menus::get_menu,
        menus::create_menu,
        menus::update_menu,
        menus::delete_menu,
        users::register,
        users::list_users,
        users::login,
    ),
    components(schemas(
        handlers::MessageResponse,
        orders::CreateOrderRequest,
        orders::OrderItemRequest,
        orders::UpdateStatusRequest,
        orders::OrderResponse,
        orders::OrderItemResponse,
        products::ProductRequest,
        products::ProductResponse,
        menus::MenuRequest,
        menus::MenuResponse,
        users::RegisterRequest,
        users::LoginRequest,
        users::LoginResponse,
        users::UserResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "orders", description = "Order lifecycle"),
        (name = "products", description = "Catalog products"),
        (name = "menus", description = "Catalog menus"),
        (name = "users", description = "Staff accounts and login"),
    )
)]
pub struct ApiDoc;

/// Declares the `bearer_auth` scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
