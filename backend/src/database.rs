use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::{FromRow, PgPool};
use std::time::Duration;
use tracing::info;

use crate::error::AppError;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

/// A row of the `_sqlx_migrations` bookkeeping table.
#[derive(Debug, Clone, FromRow)]
pub struct AppliedMigration {
    pub version: i64,
    pub description: String,
    pub installed_on: DateTime<Utc>,
    pub success: bool,
}

#[derive(Debug, Clone)]
pub struct MigrationStatus {
    pub applied: Vec<AppliedMigration>,
    pub pending: Vec<(i64, String)>,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        let start_time = std::time::Instant::now();
        MIGRATOR.run(&self.pool).await?;
        info!("Database migrations applied in {:?}", start_time.elapsed());
        Ok(())
    }

    pub async fn migration_status(&self) -> Result<MigrationStatus, AppError> {
        let table_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM information_schema.tables \
             WHERE table_name = '_sqlx_migrations' AND table_schema = current_schema())",
        )
        .fetch_one(&self.pool)
        .await?;

        let applied = if table_exists {
            sqlx::query_as::<_, AppliedMigration>(
                "SELECT version, description, installed_on, success \
                 FROM _sqlx_migrations ORDER BY version",
            )
            .fetch_all(&self.pool)
            .await?
        } else {
            Vec::new()
        };

        let pending = MIGRATOR
            .iter()
            .filter(|m| !applied.iter().any(|a| a.version == m.version))
            .map(|m| (m.version, m.description.to_string()))
            .collect();

        Ok(MigrationStatus { applied, pending })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
