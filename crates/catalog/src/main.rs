use anyhow::{Context, Result};
use catalog::{
    handler::AppRouter,
    state::{AppState, DEFAULT_CATEGORIES},
};
use dotenv::dotenv;
use shared::{
    config::{Config, ConnectionManager, ConnectionPool},
    repository::InMemoryCatalog,
    utils::init_logger,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    init_logger("catalog-service", is_dev, is_enable_file);

    let config = Config::init().context("Failed to load configuration")?;

    info!("🚀 Starting Catalog Service initialization...");

    let state = match &config.database_url {
        Some(database_url) => {
            let pool = ConnectionManager::new_pool(database_url, config.db_max_conn)
                .await
                .context("Failed to initialize database pool")?;

            if config.run_migrations {
                run_migrations(&pool)
                    .await
                    .context("Failed to run database migrations")?;
            }

            AppState::new(pool).await
        }
        None => {
            warn!("⚠️ DATABASE_URL is not set, records live in memory only");

            let catalog = InMemoryCatalog::with_categories(DEFAULT_CATEGORIES).await;
            AppState::in_memory(Arc::new(catalog)).await
        }
    }
    .context("Failed to create AppState")?;

    info!("✅ Application setup completed successfully.");

    AppRouter::serve(config.port, state)
        .await
        .context("Failed to start server")?;

    info!("✅ Catalog Service shutdown complete.");

    Ok(())
}

async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    info!("📦 Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
