use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::repositories::EntityStore;

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub storage: &'static str,
    pub version: &'static str,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Reports whether the backing store answers.
#[derive(Clone)]
pub struct HealthService {
    store: Arc<dyn EntityStore>,
}

impl HealthService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn check(&self) -> HealthReport {
        let storage = self.store.backend_name();
        let status = match self.store.ping().await {
            Ok(()) => "healthy",
            Err(e) => {
                error!(storage, error = %e, "Storage health check failed");
                "unhealthy"
            }
        };

        HealthReport {
            status,
            storage,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
