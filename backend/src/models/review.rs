use campaign_platform_shared::{CommentResponse, ReviewResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CampaignReview {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CampaignReview {
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn to_response(&self) -> ReviewResponse {
        ReviewResponse {
            id: self.id,
            campaign_id: self.campaign_id,
            user_id: self.user_id,
            title: self.title.clone(),
            content: self.content.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CampaignComment {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CampaignComment {
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn to_response(&self) -> CommentResponse {
        CommentResponse {
            id: self.id,
            campaign_id: self.campaign_id,
            user_id: self.user_id,
            content: self.content.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
}
