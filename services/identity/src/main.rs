use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use identity::config::AppConfig;
use identity::{routes, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting identity service");

    let config = AppConfig::from_env()?;

    let db_config = common::database::DatabaseConfig::from_env()?;
    let pool = common::database::init_pool(&db_config).await?;

    common::database::health_check(&pool).await?;
    info!("Database connection successful");

    let bind_addr = config.bind_addr.clone();
    let app = routes::create_router(AppState::new(config, pool));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Identity service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
