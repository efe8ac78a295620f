pub mod catalog_service;
pub mod order_service;
pub mod pricing;
pub mod user_service;

pub use catalog_service::CatalogService;
pub use order_service::OrderService;
pub use pricing::{PricedItems, PricingEngine};
pub use user_service::UserService;
