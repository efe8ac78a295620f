pub mod application;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::{CatalogService, OrderService, UserService};
use auth::JwtService;
use domain::ports::{CatalogRepository, OrderRepository, UserRepository};
use errors::AppError;
use infrastructure::{DieselCatalogRepository, DieselOrderRepository, DieselUserRepository};

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in applied {
        log::info!("applied migration {}", version);
    }
    Ok(())
}

pub type AppOrderService = OrderService<Arc<dyn OrderRepository>, Arc<dyn CatalogRepository>>;
pub type AppCatalogService = CatalogService<Arc<dyn CatalogRepository>>;
pub type AppUserService = UserService<Arc<dyn UserRepository>>;

/// The storage backends the services are built over.
pub struct Repositories {
    pub orders: Arc<dyn OrderRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn diesel(pool: DbPool) -> Self {
        Self {
            orders: Arc::new(DieselOrderRepository::new(pool.clone())),
            catalog: Arc::new(DieselCatalogRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool)),
        }
    }
}

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    orders: web::Data<AppOrderService>,
    catalog: web::Data<AppCatalogService>,
    users: web::Data<AppUserService>,
    jwt: web::Data<JwtService>,
}

impl AppState {
    pub fn new(repos: Repositories, jwt: JwtService) -> Self {
        Self {
            orders: web::Data::new(OrderService::new(repos.orders, repos.catalog.clone())),
            catalog: web::Data::new(CatalogService::new(repos.catalog)),
            users: web::Data::new(UserService::new(repos.users)),
            jwt: web::Data::new(jwt),
        }
    }

    pub fn users(&self) -> &AppUserService {
        &self.users
    }

    /// Registers app data and every `/api` route.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.orders.clone())
            .app_data(self.catalog.clone())
            .app_data(self.users.clone())
            .app_data(self.jwt.clone())
            .app_data(json_config())
            .service(web::scope("/api").configure(handlers::configure));
    }
}

/// Malformed or mistyped JSON bodies become `400` validation errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        log::debug!("rejected body on {}: {}", req.path(), err);
        AppError::BadRequest(format!("Invalid request body: {err}")).into()
    })
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = openapi::ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| state.configure(cfg))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
