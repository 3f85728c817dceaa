use campaign_platform_shared::{
    CampaignResponse, CampaignStatus, CreateCampaignRequest, UpdateCampaignRequest,
};
use rust_decimal::Decimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::funding::Funding;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub members: i32,
    pub status: CampaignStatus,
    pub is_funding: bool,
    pub campaign_start_date: DateTime<Utc>,
    pub campaign_end_date: DateTime<Utc>,
    pub activity_start_date: Option<DateTime<Utc>>,
    pub activity_end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a campaign. Status is supplied by the caller so that
/// imports and fixtures can seed campaigns in any lifecycle state.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub members: i32,
    pub status: CampaignStatus,
    pub is_funding: bool,
    pub campaign_start_date: DateTime<Utc>,
    pub campaign_end_date: DateTime<Utc>,
    pub activity_start_date: Option<DateTime<Utc>>,
    pub activity_end_date: Option<DateTime<Utc>>,
}

impl NewCampaign {
    /// New campaigns wait for approval before recruiting opens.
    pub fn from_request(user_id: Uuid, request: &CreateCampaignRequest) -> Self {
        Self {
            user_id,
            title: request.title.clone(),
            content: request.content.clone(),
            members: request.members,
            status: CampaignStatus::Unapproved,
            is_funding: request.is_funding,
            campaign_start_date: request.campaign_start_date,
            campaign_end_date: request.campaign_end_date,
            activity_start_date: request.activity_start_date,
            activity_end_date: request.activity_end_date,
        }
    }

    pub fn into_campaign(self, id: Uuid, now: DateTime<Utc>) -> Campaign {
        Campaign {
            id,
            user_id: self.user_id,
            title: self.title,
            content: self.content,
            members: self.members,
            status: self.status,
            is_funding: self.is_funding,
            campaign_start_date: self.campaign_start_date,
            campaign_end_date: self.campaign_end_date,
            activity_start_date: self.activity_start_date,
            activity_end_date: self.activity_end_date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Owner edits applied to an existing campaign.
#[derive(Debug, Clone)]
pub struct CampaignChanges {
    pub title: String,
    pub content: String,
    pub members: i32,
    pub campaign_start_date: DateTime<Utc>,
    pub campaign_end_date: DateTime<Utc>,
    pub activity_start_date: Option<DateTime<Utc>>,
    pub activity_end_date: Option<DateTime<Utc>>,
    pub goal: Option<Decimal>,
}

impl From<UpdateCampaignRequest> for CampaignChanges {
    fn from(request: UpdateCampaignRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
            members: request.members,
            campaign_start_date: request.campaign_start_date,
            campaign_end_date: request.campaign_end_date,
            activity_start_date: request.activity_start_date,
            activity_end_date: request.activity_end_date,
            goal: request.goal,
        }
    }
}

impl CampaignChanges {
    pub fn apply_to(&self, campaign: &mut Campaign, now: DateTime<Utc>) {
        campaign.title = self.title.clone();
        campaign.content = self.content.clone();
        campaign.members = self.members;
        campaign.campaign_start_date = self.campaign_start_date;
        campaign.campaign_end_date = self.campaign_end_date;
        campaign.activity_start_date = self.activity_start_date;
        campaign.activity_end_date = self.activity_end_date;
        campaign.updated_at = now;
    }
}

impl Campaign {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Convert to response DTO
    pub fn to_response(
        &self,
        participant_count: i64,
        like_count: i64,
        funding: Option<&Funding>,
    ) -> CampaignResponse {
        CampaignResponse {
            id: self.id,
            user_id: self.user_id,
            title: self.title.clone(),
            content: self.content.clone(),
            members: self.members,
            participant_count,
            like_count,
            status: self.status,
            is_funding: self.is_funding,
            campaign_start_date: self.campaign_start_date,
            campaign_end_date: self.campaign_end_date,
            activity_start_date: self.activity_start_date,
            activity_end_date: self.activity_end_date,
            funding: funding.map(|f| f.to_response()),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Aggregated read model for a single campaign.
#[derive(Debug, Clone)]
pub struct CampaignDetail {
    pub campaign: Campaign,
    pub participant_count: i64,
    pub like_count: i64,
    pub funding: Option<Funding>,
}

impl CampaignDetail {
    pub fn to_response(&self) -> CampaignResponse {
        self.campaign.to_response(
            self.participant_count,
            self.like_count,
            self.funding.as_ref(),
        )
    }
}
