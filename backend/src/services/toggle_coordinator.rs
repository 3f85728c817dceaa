use campaign_platform_shared::{RelationKind, ToggleOutcome};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::RelationSnapshot;
use crate::repositories::EntityStore;
use crate::services::capacity_guard;
use crate::services::status_gate::{self, CampaignAction};

/// Admission rule applied to a relation snapshot held under lock.
///
/// The status gate runs first. Leaving is never blocked by capacity, only
/// joining is.
pub fn admission_check(snapshot: &RelationSnapshot) -> Result<(), AppError> {
    status_gate::ensure_allowed(&snapshot.campaign, CampaignAction::from(snapshot.kind))?;

    if snapshot.kind == RelationKind::Participate && !snapshot.exists {
        capacity_guard::ensure_room(&snapshot.campaign, snapshot.active_participants)?;
    }

    Ok(())
}

/// Flips like and participation relations between a user and a campaign.
#[derive(Clone)]
pub struct ToggleCoordinator {
    store: Arc<dyn EntityStore>,
}

impl ToggleCoordinator {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn toggle(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        kind: RelationKind,
    ) -> Result<ToggleOutcome, AppError> {
        debug!(%user_id, %campaign_id, %kind, "Toggling relation");

        match self
            .store
            .toggle_relation(user_id, campaign_id, kind, &admission_check)
            .await
        {
            Err(AppError::CapacityExceeded { capacity }) => {
                warn!(%campaign_id, capacity, "Participation rejected, campaign is full");
                Err(AppError::CapacityExceeded { capacity })
            }
            other => other,
        }
    }
}
