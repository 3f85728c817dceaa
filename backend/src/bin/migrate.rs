use anyhow::{Context, Result};
use campaign_platform_backend::config::AppConfig;
use campaign_platform_backend::database::Database;
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL environment variable is required")?;

    let database = Database::new(database_url, 2)
        .await
        .context("Failed to connect to database")?;

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("up");

    match command {
        "up" => {
            info!("Running database migrations...");
            database
                .migrate()
                .await
                .context("Failed to apply migrations")?;
            info!("Database migrations completed successfully");
        }
        "status" => {
            let status = database
                .migration_status()
                .await
                .context("Failed to read migration status")?;

            println!("Applied migrations: {}", status.applied.len());
            for migration in &status.applied {
                println!(
                    "  {} {} ({}){}",
                    migration.version,
                    migration.description,
                    migration.installed_on.format("%Y-%m-%d %H:%M:%S"),
                    if migration.success { "" } else { " FAILED" }
                );
            }

            println!("Pending migrations: {}", status.pending.len());
            for (version, description) in &status.pending {
                println!("  {} {}", version, description);
            }
        }
        _ => {
            eprintln!("Usage: migrate [up|status]");
            eprintln!("  up      - Run all pending migrations (default)");
            eprintln!("  status  - Show applied and pending migrations");
            std::process::exit(1);
        }
    }

    Ok(())
}
