use serde::Deserialize;

/// Which entity store backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub storage: StorageBackend,
    pub log_level: String,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("max_connections", 20)?
            .set_default("storage", "postgres")?
            .set_default("log_level", "info")?
            .set_default("run_migrations", true)?
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
