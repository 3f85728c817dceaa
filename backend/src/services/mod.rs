pub mod campaign_service;
pub mod capacity_guard;
pub mod health_service;
pub mod shop_service;
pub mod status_gate;
pub mod stock_reservation;
pub mod toggle_coordinator;

pub use campaign_service::CampaignService;
pub use health_service::HealthService;
pub use shop_service::ShopService;
pub use stock_reservation::StockReservation;
pub use toggle_coordinator::ToggleCoordinator;

use std::sync::Arc;

use crate::repositories::EntityStore;

/// All services built over one shared entity store.
#[derive(Clone)]
pub struct AppServices {
    pub campaigns: CampaignService,
    pub shop: ShopService,
    pub health: HealthService,
}

impl AppServices {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            campaigns: CampaignService::new(store.clone()),
            shop: ShopService::new(store.clone()),
            health: HealthService::new(store),
        }
    }
}
