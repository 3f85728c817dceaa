use crate::types::*;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Campaign DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_campaign_window", skip_on_field_errors = false))]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 50))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,

    #[validate(range(min = 1))]
    pub members: i32,

    pub campaign_start_date: DateTime<Utc>,
    pub campaign_end_date: DateTime<Utc>,
    pub activity_start_date: Option<DateTime<Utc>>,
    pub activity_end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub is_funding: bool,

    pub goal: Option<Decimal>,
}

fn check_windows(
    campaign_start: DateTime<Utc>,
    campaign_end: DateTime<Utc>,
    activity_start: Option<DateTime<Utc>>,
    activity_end: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    if campaign_start > campaign_end {
        let mut error = ValidationError::new("campaign_start_date");
        error.message = Some(crate::constants::ERROR_CAMPAIGN_WINDOW.into());
        return Err(error);
    }

    if let (Some(start), Some(end)) = (activity_start, activity_end) {
        if start > end {
            let mut error = ValidationError::new("activity_start_date");
            error.message = Some(crate::constants::ERROR_ACTIVITY_WINDOW.into());
            return Err(error);
        }
    }

    Ok(())
}

fn validate_campaign_window(request: &CreateCampaignRequest) -> Result<(), ValidationError> {
    check_windows(
        request.campaign_start_date,
        request.campaign_end_date,
        request.activity_start_date,
        request.activity_end_date,
    )?;

    if request.is_funding {
        match request.goal {
            Some(goal) if goal > Decimal::ZERO => {}
            _ => {
                let mut error = ValidationError::new("goal");
                error.message = Some(crate::constants::ERROR_FUNDING_GOAL.into());
                return Err(error);
            }
        }
    }

    Ok(())
}

/// Full replacement of the owner-editable campaign fields. Status and the
/// funding flag are not editable here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_window", skip_on_field_errors = false))]
pub struct UpdateCampaignRequest {
    #[validate(length(min = 1, max = 50))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,

    #[validate(range(min = 1))]
    pub members: i32,

    pub campaign_start_date: DateTime<Utc>,
    pub campaign_end_date: DateTime<Utc>,
    pub activity_start_date: Option<DateTime<Utc>>,
    pub activity_end_date: Option<DateTime<Utc>>,

    /// New funding goal; ignored for campaigns without funding.
    pub goal: Option<Decimal>,
}

fn validate_update_window(request: &UpdateCampaignRequest) -> Result<(), ValidationError> {
    check_windows(
        request.campaign_start_date,
        request.campaign_end_date,
        request.activity_start_date,
        request.activity_end_date,
    )?;

    if let Some(goal) = request.goal {
        if goal <= Decimal::ZERO {
            let mut error = ValidationError::new("goal");
            error.message = Some(crate::constants::ERROR_FUNDING_GOAL.into());
            return Err(error);
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCampaignsQuery {
    pub status: Option<CampaignStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingResponse {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub goal: Decimal,
    pub amount: Decimal,
    pub goal_reached: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub members: i32,
    pub participant_count: i64,
    pub like_count: i64,
    pub status: CampaignStatus,
    pub is_funding: bool,
    pub campaign_start_date: DateTime<Utc>,
    pub campaign_end_date: DateTime<Utc>,
    pub activity_start_date: Option<DateTime<Utc>>,
    pub activity_end_date: Option<DateTime<Utc>>,
    pub funding: Option<FundingResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub campaign_id: Uuid,
    pub kind: RelationKind,
    pub outcome: ToggleOutcome,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationStatusResponse {
    pub campaign_id: Uuid,
    pub liked: bool,
    pub participating: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, max = 50))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingContributionRequest {
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingOrderResponse {
    pub id: Uuid,
    pub funding_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub funding: FundingResponse,
    pub created_at: DateTime<Utc>,
}

// Shop DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 30))]
    pub category_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub category_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 30))]
    pub product_name: String,

    pub product_price: Decimal,

    #[validate(range(min = 0))]
    pub product_stock: i32,

    #[serde(default)]
    pub product_desc: String,

    #[serde(default)]
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub product_name: String,
    pub product_price: Decimal,
    pub product_stock: i32,
    pub product_desc: String,
    pub category_id: Option<Uuid>,
    pub hits: i32,
    pub product_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RestockRequest {
    #[validate(range(min = 1))]
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    #[validate(range(min = 1))]
    pub order_quantity: i32,

    #[validate(length(min = 1, max = 20))]
    pub zip_code: String,

    #[validate(length(min = 1, max = 100))]
    pub address: String,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub address_detail: String,

    #[serde(default)]
    #[validate(length(max = 150))]
    pub address_message: String,

    #[validate(length(min = 1, max = 20))]
    pub receiver_name: String,

    #[validate(length(min = 1, max = 20))]
    pub receiver_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetailResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_count: i32,
    pub status: OrderDetailStatus,
    pub status_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub order_quantity: i32,
    pub order_totalprice: Decimal,
    pub order_date: DateTime<Utc>,
    pub zip_code: String,
    pub address: String,
    pub address_detail: String,
    pub address_message: String,
    pub receiver_name: String,
    pub receiver_number: String,
    pub order_info: Vec<OrderDetailResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderDetailStatus,
}

// Generic responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn campaign_request() -> CreateCampaignRequest {
        let start = Utc::now();
        CreateCampaignRequest {
            title: "Plogging along the river".to_string(),
            content: "Pick up litter every Saturday morning".to_string(),
            members: 10,
            campaign_start_date: start,
            campaign_end_date: start + Duration::days(14),
            activity_start_date: None,
            activity_end_date: None,
            is_funding: false,
            goal: None,
        }
    }

    #[test]
    fn accepts_well_formed_campaign() {
        assert!(campaign_request().validate().is_ok());
    }

    #[test]
    fn rejects_end_before_start() {
        let mut request = campaign_request();
        request.campaign_end_date = request.campaign_start_date - Duration::days(1);

        let errors = request.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
    }

    #[test]
    fn funding_campaign_needs_positive_goal() {
        let mut request = campaign_request();
        request.is_funding = true;
        assert!(request.validate().is_err());

        request.goal = Some(Decimal::from(10_000));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn rejects_zero_capacity_and_long_title() {
        let mut request = campaign_request();
        request.members = 0;
        assert!(request.validate().is_err());

        let mut request = campaign_request();
        request.title = "x".repeat(51);
        assert!(request.validate().is_err());
    }

    #[test]
    fn update_checks_windows_and_goal() {
        let start = Utc::now();
        let mut request = UpdateCampaignRequest {
            title: "Plogging along the river".to_string(),
            content: "Now on Sundays".to_string(),
            members: 12,
            campaign_start_date: start,
            campaign_end_date: start + Duration::days(14),
            activity_start_date: Some(start + Duration::days(3)),
            activity_end_date: Some(start + Duration::days(2)),
            goal: None,
        };
        assert!(request.validate().is_err());

        request.activity_end_date = Some(start + Duration::days(4));
        assert!(request.validate().is_ok());

        request.goal = Some(Decimal::ZERO);
        assert!(request.validate().is_err());
    }

    #[test]
    fn order_quantity_must_be_positive() {
        let request = PlaceOrderRequest {
            order_quantity: 0,
            zip_code: "06236".to_string(),
            address: "Teheran-ro 152".to_string(),
            address_detail: String::new(),
            address_message: String::new(),
            receiver_name: "Kim".to_string(),
            receiver_number: "010-0000-0000".to_string(),
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("order_quantity"));
    }
}
