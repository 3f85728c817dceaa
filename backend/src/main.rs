use actix_cors::Cors;
use actix_web::{App, HttpServer};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use campaign_platform_backend::config::{AppConfig, StorageBackend};
use campaign_platform_backend::database::Database;
use campaign_platform_backend::error::AppError;
use campaign_platform_backend::middleware::RequestTracing;
use campaign_platform_backend::repositories::{EntityStore, MemoryStore, PgStore};
use campaign_platform_backend::routes;
use campaign_platform_backend::services::AppServices;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting Campaign Platform Backend on {}", config.bind_address());

    let store: Arc<dyn EntityStore> = match config.storage {
        StorageBackend::Postgres => {
            let database_url = config.database_url.as_deref().ok_or_else(|| {
                AppError::Internal("DATABASE_URL is required for postgres storage".to_string())
            })?;
            let database = Database::new(database_url, config.max_connections).await?;

            if config.run_migrations {
                database.migrate().await?;
            }

            Arc::new(PgStore::new(database.pool().clone()))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage, data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let services = AppServices::new(store);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestTracing)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(routes::configure(services.clone()))
    })
    .bind(config.bind_address())?
    .run()
    .await?;

    Ok(())
}
