use campaign_platform_shared::{FundingOrderResponse, FundingResponse};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;
use crate::utils::validation::checked_money;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Funding {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub goal: Decimal,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Funding {
    pub fn is_goal_reached(&self) -> bool {
        self.amount >= self.goal
    }

    /// Raised amount after adding `contribution`, kept within the money range.
    pub fn total_after(&self, contribution: Decimal) -> Result<Decimal, AppError> {
        checked_money("amount", self.amount.checked_add(contribution))
    }

    pub fn to_response(&self) -> FundingResponse {
        FundingResponse {
            id: self.id,
            campaign_id: self.campaign_id,
            goal: self.goal,
            amount: self.amount,
            goal_reached: self.is_goal_reached(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A single contribution towards a campaign's funding goal.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FundingOrder {
    pub id: Uuid,
    pub funding_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl FundingOrder {
    pub fn to_response(&self, funding: &Funding) -> FundingOrderResponse {
        FundingOrderResponse {
            id: self.id,
            funding_id: self.funding_id,
            user_id: self.user_id,
            amount: self.amount,
            funding: funding.to_response(),
            created_at: self.created_at,
        }
    }
}
