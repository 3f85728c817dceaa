use serde::{Deserialize, Serialize};
use std::fmt;

// Campaign-related enums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "campaign_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Unapproved,
    Recruiting,
    Ended,
    Failed,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 4] = [
        CampaignStatus::Unapproved,
        CampaignStatus::Recruiting,
        CampaignStatus::Ended,
        CampaignStatus::Failed,
    ];

    /// Numeric code used by the legacy choice field (0..=3).
    pub fn code(self) -> i16 {
        match self {
            CampaignStatus::Unapproved => 0,
            CampaignStatus::Recruiting => 1,
            CampaignStatus::Ended => 2,
            CampaignStatus::Failed => 3,
        }
    }

    pub fn from_code(code: i16) -> Result<Self, StatusCodeError> {
        match code {
            0 => Ok(CampaignStatus::Unapproved),
            1 => Ok(CampaignStatus::Recruiting),
            2 => Ok(CampaignStatus::Ended),
            3 => Ok(CampaignStatus::Failed),
            other => Err(StatusCodeError::Unknown(other)),
        }
    }

    /// Map a status code of the superseded 8-state schema onto the 4-state model.
    ///
    /// `approved` has not opened recruitment yet and collapses into `Unapproved`;
    /// the three failure variants collapse into `Failed`. The "activity in
    /// progress" phase has no counterpart and is rejected.
    pub fn from_legacy_code(code: i16) -> Result<Self, StatusCodeError> {
        match code {
            0 | 1 => Ok(CampaignStatus::Unapproved),
            2 => Ok(CampaignStatus::Recruiting),
            3 => Err(StatusCodeError::NoEquivalent(code)),
            4 => Ok(CampaignStatus::Ended),
            5..=7 => Ok(CampaignStatus::Failed),
            other => Err(StatusCodeError::Unknown(other)),
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignStatus::Unapproved => write!(f, "unapproved"),
            CampaignStatus::Recruiting => write!(f, "recruiting"),
            CampaignStatus::Ended => write!(f, "ended"),
            CampaignStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StatusCodeError {
    #[error("unknown status code {0}")]
    Unknown(i16),

    #[error("legacy status code {0} has no equivalent status")]
    NoEquivalent(i16),
}

// Shop-related enums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_detail_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderDetailStatus {
    Received,
    Paid,
    Cancelled,
    Shipped,
    InTransit,
    Delivered,
}

impl OrderDetailStatus {
    pub fn code(self) -> i16 {
        match self {
            OrderDetailStatus::Received => 0,
            OrderDetailStatus::Paid => 1,
            OrderDetailStatus::Cancelled => 2,
            OrderDetailStatus::Shipped => 3,
            OrderDetailStatus::InTransit => 4,
            OrderDetailStatus::Delivered => 5,
        }
    }

    /// Human readable label shown next to an order line.
    pub fn label(self) -> &'static str {
        match self {
            OrderDetailStatus::Received => "Order received",
            OrderDetailStatus::Paid => "Payment confirmed",
            OrderDetailStatus::Cancelled => "Order cancelled",
            OrderDetailStatus::Shipped => "Shipment started",
            OrderDetailStatus::InTransit => "In transit",
            OrderDetailStatus::Delivered => "Delivered",
        }
    }
}

impl Default for OrderDetailStatus {
    fn default() -> Self {
        OrderDetailStatus::Received
    }
}

impl fmt::Display for OrderDetailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDetailStatus::Received => write!(f, "received"),
            OrderDetailStatus::Paid => write!(f, "paid"),
            OrderDetailStatus::Cancelled => write!(f, "cancelled"),
            OrderDetailStatus::Shipped => write!(f, "shipped"),
            OrderDetailStatus::InTransit => write!(f, "in_transit"),
            OrderDetailStatus::Delivered => write!(f, "delivered"),
        }
    }
}

// Relation toggles between a user and a campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Like,
    Participate,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::Like => write!(f, "like"),
            RelationKind::Participate => write!(f, "participate"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Activated,
    Deactivated,
}
