//! Lifecycle gate: which campaign actions are permitted in which status.
//!
//! | action      | required status |
//! |-------------|-----------------|
//! | like        | recruiting      |
//! | participate | recruiting      |
//! | fund        | recruiting      |
//! | review      | ended           |

use campaign_platform_shared::constants::{
    ERROR_NOT_ENDED_REVIEW, ERROR_NOT_RECRUITING_FUND, ERROR_NOT_RECRUITING_LIKE,
    ERROR_NOT_RECRUITING_PARTICIPATE,
};
use campaign_platform_shared::{CampaignStatus, RelationKind};

use crate::error::AppError;
use crate::models::Campaign;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignAction {
    Like,
    Participate,
    Fund,
    Review,
}

impl From<RelationKind> for CampaignAction {
    fn from(kind: RelationKind) -> Self {
        match kind {
            RelationKind::Like => CampaignAction::Like,
            RelationKind::Participate => CampaignAction::Participate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotRecruiting,
    NotEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Deny(DenyReason),
}

pub fn authorize(campaign: &Campaign, action: CampaignAction) -> GateDecision {
    authorize_status(campaign.status, action)
}

pub fn authorize_status(status: CampaignStatus, action: CampaignAction) -> GateDecision {
    use CampaignStatus::*;

    // Every (action, status) pair is spelled out so a new status cannot
    // slip through as allowed.
    match action {
        CampaignAction::Like | CampaignAction::Participate | CampaignAction::Fund => match status {
            Recruiting => GateDecision::Allow,
            Unapproved | Ended | Failed => GateDecision::Deny(DenyReason::NotRecruiting),
        },
        CampaignAction::Review => match status {
            Ended => GateDecision::Allow,
            Unapproved | Recruiting | Failed => GateDecision::Deny(DenyReason::NotEnded),
        },
    }
}

/// Gate decision turned into the error the caller reports.
pub fn ensure_allowed(campaign: &Campaign, action: CampaignAction) -> Result<(), AppError> {
    match authorize(campaign, action) {
        GateDecision::Allow => Ok(()),
        GateDecision::Deny(_) => Err(denial(action)),
    }
}

/// Each action is gated on a single status, so it has exactly one denial.
fn denial(action: CampaignAction) -> AppError {
    match action {
        CampaignAction::Like => AppError::NotRecruiting(ERROR_NOT_RECRUITING_LIKE.to_string()),
        CampaignAction::Participate => {
            AppError::NotRecruiting(ERROR_NOT_RECRUITING_PARTICIPATE.to_string())
        }
        CampaignAction::Fund => AppError::NotRecruiting(ERROR_NOT_RECRUITING_FUND.to_string()),
        CampaignAction::Review => AppError::NotEnded(ERROR_NOT_ENDED_REVIEW.to_string()),
    }
}
