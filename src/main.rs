use std::io;

use dotenvy::dotenv;
use fastfood_orders::auth::JwtService;
use fastfood_orders::config::AppConfig;
use fastfood_orders::{build_server, create_pool, run_migrations, AppState, Repositories};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(io::Error::other)?;

    let pool = create_pool(&config.database_url, config.pool_size).map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;

    let state = AppState::new(Repositories::diesel(pool), JwtService::new(config.jwt.clone()));

    if let Some(admin) = &config.bootstrap_admin {
        state
            .users()
            .ensure_bootstrap_admin(&admin.username, &admin.password)
            .map_err(io::Error::other)?;
    }

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    log::info!(
        "API docs at http://{}:{}/swagger-ui/",
        config.host,
        config.port
    );

    build_server(state, &config.host, config.port)?.await
}
