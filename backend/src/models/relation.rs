use campaign_platform_shared::RelationKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::campaign::Campaign;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub is_participated: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CampaignLike {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// State of one (user, campaign) relation observed while the campaign row is
/// held by the current operation.
#[derive(Debug, Clone)]
pub struct RelationSnapshot {
    pub campaign: Campaign,
    pub kind: RelationKind,
    pub exists: bool,
    pub active_participants: i64,
}
