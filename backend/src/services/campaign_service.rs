use campaign_platform_shared::constants::{
    ERROR_MEMBERS_BELOW_PARTICIPANTS, SUCCESS_JOINED, SUCCESS_LEFT, SUCCESS_LIKED, SUCCESS_UNLIKED,
};
use campaign_platform_shared::{
    CampaignResponse, CommentResponse, CreateCampaignRequest, CreateCommentRequest,
    CreateReviewRequest, FundingContributionRequest, FundingOrderResponse, ListCampaignsQuery,
    RelationKind, RelationStatusResponse, ReviewResponse, ToggleOutcome, ToggleResponse,
    UpdateCampaignRequest,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{
    Campaign, CampaignChanges, CampaignComment, CampaignReview, NewCampaign, NewComment, NewReview,
};
use crate::repositories::EntityStore;
use crate::services::status_gate::{self, CampaignAction};
use crate::services::toggle_coordinator::ToggleCoordinator;
use crate::utils::validation::{ensure_money, ensure_positive};

/// Campaign lifecycle, relations, reviews, comments and funding.
#[derive(Clone)]
pub struct CampaignService {
    store: Arc<dyn EntityStore>,
    toggles: ToggleCoordinator,
}

fn review_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Review {} not found", id))
}

fn comment_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Comment {} not found", id))
}

fn review_check(campaign: &Campaign) -> Result<(), AppError> {
    status_gate::ensure_allowed(campaign, CampaignAction::Review)
}

fn funding_check(campaign: &Campaign) -> Result<(), AppError> {
    status_gate::ensure_allowed(campaign, CampaignAction::Fund)?;
    if !campaign.is_funding {
        return Err(AppError::Validation(format!(
            "Campaign {} does not accept funding",
            campaign.id
        )));
    }
    Ok(())
}

impl CampaignService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            toggles: ToggleCoordinator::new(store.clone()),
            store,
        }
    }

    pub async fn create_campaign(
        &self,
        owner_id: Uuid,
        request: CreateCampaignRequest,
    ) -> Result<CampaignResponse, AppError> {
        request.validate()?;

        let funding_goal = if request.is_funding { request.goal } else { None };
        if let Some(goal) = funding_goal {
            ensure_money("goal", goal)?;
        }

        let detail = self
            .store
            .create_campaign(NewCampaign::from_request(owner_id, &request), funding_goal)
            .await?;

        info!(campaign_id = %detail.campaign.id, %owner_id, "Campaign created");
        Ok(detail.to_response())
    }

    pub async fn get_campaign(&self, campaign_id: Uuid) -> Result<CampaignResponse, AppError> {
        self.store
            .find_campaign_detail(campaign_id)
            .await?
            .map(|detail| detail.to_response())
            .ok_or_else(|| AppError::NotFound(format!("Campaign {} not found", campaign_id)))
    }

    pub async fn list_campaigns(
        &self,
        query: ListCampaignsQuery,
    ) -> Result<Vec<CampaignResponse>, AppError> {
        let campaigns = self.store.list_campaigns(query.status).await?;
        Ok(campaigns.iter().map(|c| c.to_response()).collect())
    }

    /// Owner edit. Capacity may not drop below the current participant count;
    /// both are checked with the campaign row held.
    pub async fn update_campaign(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        request: UpdateCampaignRequest,
    ) -> Result<CampaignResponse, AppError> {
        request.validate()?;
        if let Some(goal) = request.goal {
            ensure_money("goal", goal)?;
        }

        let members = request.members;
        let check = move |campaign: &Campaign, active: i64| -> Result<(), AppError> {
            if !campaign.is_owned_by(user_id) {
                return Err(AppError::Authorization(
                    "Only the campaign owner can edit it".to_string(),
                ));
            }
            if i64::from(members) < active {
                return Err(AppError::Validation(
                    ERROR_MEMBERS_BELOW_PARTICIPANTS.to_string(),
                ));
            }
            Ok(())
        };

        let detail = self
            .store
            .update_campaign(campaign_id, CampaignChanges::from(request), &check)
            .await?;

        info!(%campaign_id, %user_id, "Campaign updated");
        Ok(detail.to_response())
    }

    pub async fn delete_campaign(&self, user_id: Uuid, campaign_id: Uuid) -> Result<(), AppError> {
        let campaign = self.find_campaign(campaign_id).await?;
        if !campaign.is_owned_by(user_id) {
            return Err(AppError::Authorization(
                "Only the campaign owner can delete it".to_string(),
            ));
        }

        // a concurrent delete already did the work
        if self.store.delete_campaign(campaign_id).await? {
            info!(%campaign_id, %user_id, "Campaign deleted");
        }
        Ok(())
    }

    pub async fn relation_status(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
    ) -> Result<RelationStatusResponse, AppError> {
        self.find_campaign(campaign_id).await?;

        Ok(RelationStatusResponse {
            campaign_id,
            liked: self
                .store
                .exists_relation(user_id, campaign_id, RelationKind::Like)
                .await?,
            participating: self
                .store
                .exists_relation(user_id, campaign_id, RelationKind::Participate)
                .await?,
        })
    }

    pub async fn toggle_like(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
    ) -> Result<ToggleResponse, AppError> {
        self.toggle(user_id, campaign_id, RelationKind::Like).await
    }

    pub async fn toggle_participation(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
    ) -> Result<ToggleResponse, AppError> {
        self.toggle(user_id, campaign_id, RelationKind::Participate)
            .await
    }

    async fn toggle(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        kind: RelationKind,
    ) -> Result<ToggleResponse, AppError> {
        let outcome = self.toggles.toggle(user_id, campaign_id, kind).await?;
        let message = match (kind, outcome) {
            (RelationKind::Like, ToggleOutcome::Activated) => SUCCESS_LIKED,
            (RelationKind::Like, ToggleOutcome::Deactivated) => SUCCESS_UNLIKED,
            (RelationKind::Participate, ToggleOutcome::Activated) => SUCCESS_JOINED,
            (RelationKind::Participate, ToggleOutcome::Deactivated) => SUCCESS_LEFT,
        };

        Ok(ToggleResponse {
            campaign_id,
            kind,
            outcome,
            message: message.to_string(),
        })
    }

    pub async fn create_review(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        request: CreateReviewRequest,
    ) -> Result<ReviewResponse, AppError> {
        request.validate()?;

        let review = NewReview {
            campaign_id,
            user_id,
            title: request.title,
            content: request.content,
        };
        let review = self.store.create_review(review, &review_check).await?;

        info!(review_id = %review.id, %campaign_id, %user_id, "Review created");
        Ok(review.to_response())
    }

    pub async fn list_reviews(&self, campaign_id: Uuid) -> Result<Vec<ReviewResponse>, AppError> {
        let reviews = self.store.list_reviews(campaign_id).await?;
        Ok(reviews.iter().map(|r| r.to_response()).collect())
    }

    pub async fn update_review(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        review_id: Uuid,
        request: CreateReviewRequest,
    ) -> Result<ReviewResponse, AppError> {
        request.validate()?;
        self.authored_review(user_id, campaign_id, review_id).await?;

        let review = self
            .store
            .update_review(review_id, request.title, request.content)
            .await?
            .ok_or_else(|| review_not_found(review_id))?;

        debug!(%review_id, %user_id, "Review updated");
        Ok(review.to_response())
    }

    pub async fn delete_review(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        review_id: Uuid,
    ) -> Result<(), AppError> {
        self.authored_review(user_id, campaign_id, review_id).await?;

        if self.store.delete_review(review_id).await? {
            info!(%review_id, %user_id, "Review deleted");
        }
        Ok(())
    }

    pub async fn create_comment(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        request: CreateCommentRequest,
    ) -> Result<CommentResponse, AppError> {
        request.validate()?;

        let comment = self
            .store
            .create_comment(NewComment {
                campaign_id,
                user_id,
                content: request.content,
            })
            .await?;

        debug!(comment_id = %comment.id, %campaign_id, "Comment created");
        Ok(comment.to_response())
    }

    pub async fn list_comments(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<CommentResponse>, AppError> {
        let comments = self.store.list_comments(campaign_id).await?;
        Ok(comments.iter().map(|c| c.to_response()).collect())
    }

    pub async fn update_comment(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        comment_id: Uuid,
        request: CreateCommentRequest,
    ) -> Result<CommentResponse, AppError> {
        request.validate()?;
        self.authored_comment(user_id, campaign_id, comment_id).await?;

        let comment = self
            .store
            .update_comment(comment_id, request.content)
            .await?
            .ok_or_else(|| comment_not_found(comment_id))?;
        Ok(comment.to_response())
    }

    pub async fn delete_comment(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), AppError> {
        self.authored_comment(user_id, campaign_id, comment_id).await?;

        if self.store.delete_comment(comment_id).await? {
            debug!(%comment_id, %user_id, "Comment deleted");
        }
        Ok(())
    }

    pub async fn contribute_funding(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        request: FundingContributionRequest,
    ) -> Result<FundingOrderResponse, AppError> {
        ensure_positive("amount", request.amount)?;
        ensure_money("amount", request.amount)?;

        let (order, funding) = self
            .store
            .contribute_funding(user_id, campaign_id, request.amount, &funding_check)
            .await?;

        if funding.is_goal_reached() {
            info!(%campaign_id, goal = %funding.goal, "Funding goal reached");
        }
        Ok(order.to_response(&funding))
    }

    /// Review under the given campaign written by `user_id`. A review filed
    /// under another campaign is reported as missing.
    async fn authored_review(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        review_id: Uuid,
    ) -> Result<CampaignReview, AppError> {
        let review = self
            .store
            .find_review(review_id)
            .await?
            .filter(|r| r.campaign_id == campaign_id)
            .ok_or_else(|| review_not_found(review_id))?;

        if !review.is_authored_by(user_id) {
            return Err(AppError::Authorization(
                "Only the author can change a review".to_string(),
            ));
        }
        Ok(review)
    }

    async fn authored_comment(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        comment_id: Uuid,
    ) -> Result<CampaignComment, AppError> {
        let comment = self
            .store
            .find_comment(comment_id)
            .await?
            .filter(|c| c.campaign_id == campaign_id)
            .ok_or_else(|| comment_not_found(comment_id))?;

        if !comment.is_authored_by(user_id) {
            return Err(AppError::Authorization(
                "Only the author can change a comment".to_string(),
            ));
        }
        Ok(comment)
    }

    async fn find_campaign(&self, campaign_id: Uuid) -> Result<Campaign, AppError> {
        self.store
            .find_campaign(campaign_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Campaign {} not found", campaign_id)))
    }
}
