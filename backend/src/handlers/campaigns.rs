use actix_web::{web, HttpResponse, Result};
use campaign_platform_shared::constants::{
    SUCCESS_CAMPAIGN_CREATED, SUCCESS_CAMPAIGN_UPDATED, SUCCESS_REVIEW_CREATED,
    SUCCESS_REVIEW_UPDATED,
};
use campaign_platform_shared::{
    ApiResponse, CreateCampaignRequest, CreateCommentRequest, CreateReviewRequest,
    FundingContributionRequest, ListCampaignsQuery, UpdateCampaignRequest,
};
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::CampaignService;

/// Create a campaign owned by the caller
#[actix_web::post("")]
pub async fn create_campaign(
    user: AuthenticatedUser,
    request: web::Json<CreateCampaignRequest>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    debug!("Creating campaign for user: {}", user.user_id);

    let campaign = campaigns
        .create_campaign(user.user_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        campaign,
        SUCCESS_CAMPAIGN_CREATED,
    )))
}

/// All campaigns, newest first; `?status=` narrows to one lifecycle state
#[actix_web::get("")]
pub async fn list_campaigns(
    query: web::Query<ListCampaignsQuery>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let list = campaigns.list_campaigns(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

#[actix_web::get("/{id}")]
pub async fn get_campaign(
    path: web::Path<Uuid>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let campaign = campaigns.get_campaign(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(campaign)))
}

#[actix_web::put("/{id}")]
pub async fn update_campaign(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: web::Json<UpdateCampaignRequest>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let campaign = campaigns
        .update_campaign(user.user_id, path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        campaign,
        SUCCESS_CAMPAIGN_UPDATED,
    )))
}

#[actix_web::delete("/{id}")]
pub async fn delete_campaign(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    campaigns
        .delete_campaign(user.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Whether the caller currently likes / participates in the campaign
#[actix_web::get("/{id}/relations")]
pub async fn relation_status(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let status = campaigns
        .relation_status(user.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(status)))
}

#[actix_web::post("/{id}/like")]
pub async fn toggle_like(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let campaign_id = path.into_inner();
    debug!("User {} toggling like on campaign {}", user.user_id, campaign_id);

    let toggled = campaigns.toggle_like(user.user_id, campaign_id).await?;
    let message = toggled.message.clone();
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(toggled, message)))
}

#[actix_web::post("/{id}/participation")]
pub async fn toggle_participation(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let campaign_id = path.into_inner();
    debug!(
        "User {} toggling participation on campaign {}",
        user.user_id, campaign_id
    );

    let toggled = campaigns
        .toggle_participation(user.user_id, campaign_id)
        .await?;
    let message = toggled.message.clone();
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(toggled, message)))
}

#[actix_web::get("/{id}/reviews")]
pub async fn list_reviews(
    path: web::Path<Uuid>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let reviews = campaigns.list_reviews(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(reviews)))
}

#[actix_web::post("/{id}/reviews")]
pub async fn create_review(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: web::Json<CreateReviewRequest>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let review = campaigns
        .create_review(user.user_id, path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        review,
        SUCCESS_REVIEW_CREATED,
    )))
}

#[actix_web::put("/{id}/reviews/{review_id}")]
pub async fn update_review(
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
    request: web::Json<CreateReviewRequest>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let (campaign_id, review_id) = path.into_inner();
    let review = campaigns
        .update_review(user.user_id, campaign_id, review_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        review,
        SUCCESS_REVIEW_UPDATED,
    )))
}

#[actix_web::delete("/{id}/reviews/{review_id}")]
pub async fn delete_review(
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let (campaign_id, review_id) = path.into_inner();
    campaigns
        .delete_review(user.user_id, campaign_id, review_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[actix_web::get("/{id}/comments")]
pub async fn list_comments(
    path: web::Path<Uuid>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let comments = campaigns.list_comments(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(comments)))
}

#[actix_web::post("/{id}/comments")]
pub async fn create_comment(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: web::Json<CreateCommentRequest>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let comment = campaigns
        .create_comment(user.user_id, path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(comment)))
}

#[actix_web::put("/{id}/comments/{comment_id}")]
pub async fn update_comment(
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
    request: web::Json<CreateCommentRequest>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let (campaign_id, comment_id) = path.into_inner();
    let comment = campaigns
        .update_comment(user.user_id, campaign_id, comment_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(comment)))
}

#[actix_web::delete("/{id}/comments/{comment_id}")]
pub async fn delete_comment(
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let (campaign_id, comment_id) = path.into_inner();
    campaigns
        .delete_comment(user.user_id, campaign_id, comment_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[actix_web::post("/{id}/funding")]
pub async fn contribute_funding(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: web::Json<FundingContributionRequest>,
    campaigns: web::Data<CampaignService>,
) -> Result<HttpResponse, AppError> {
    let contribution = campaigns
        .contribute_funding(user.user_id, path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(contribution)))
}
