//! Repository pattern implementation for the entity store
//!
//! Services talk to persistence only through [`EntityStore`]. Every mutating
//! method is atomic with respect to the single aggregate it touches: the
//! campaign row for relation toggles, reviews and funding, the product row
//! for stock changes. Predicates passed in by the services are evaluated
//! while that aggregate is held, so a check and the write it guards can never
//! be separated by a concurrent request.

use async_trait::async_trait;
use campaign_platform_shared::{CampaignStatus, OrderDetailStatus, RelationKind, ToggleOutcome};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Campaign, CampaignChanges, CampaignComment, CampaignDetail, CampaignReview, Funding,
    FundingOrder, NewCampaign, NewComment, NewOrder, NewProduct, NewReview, OrderWithDetails,
    RelationSnapshot, ShopCategory, ShopProduct,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Predicate evaluated against a held relation snapshot before a toggle commits.
pub type RelationCheck = dyn Fn(&RelationSnapshot) -> Result<(), AppError> + Send + Sync;

/// Predicate evaluated against a held campaign row before a dependent write.
pub type CampaignCheck = dyn Fn(&Campaign) -> Result<(), AppError> + Send + Sync;

/// Predicate evaluated against a held campaign row and its active participant
/// count before an edit commits.
pub type CampaignUpdateCheck = dyn Fn(&Campaign, i64) -> Result<(), AppError> + Send + Sync;

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Short name of the backing storage, reported by the health check.
    fn backend_name(&self) -> &'static str;

    /// Round trip to the storage; `Ok` means it can serve requests.
    async fn ping(&self) -> Result<(), AppError>;

    /// Insert a campaign, plus its funding row when `funding_goal` is set.
    async fn create_campaign(
        &self,
        campaign: NewCampaign,
        funding_goal: Option<Decimal>,
    ) -> Result<CampaignDetail, AppError>;

    async fn find_campaign(&self, id: Uuid) -> Result<Option<Campaign>, AppError>;

    async fn find_campaign_detail(&self, id: Uuid) -> Result<Option<CampaignDetail>, AppError>;

    /// Campaigns newest first, optionally restricted to one status.
    async fn list_campaigns(
        &self,
        status: Option<CampaignStatus>,
    ) -> Result<Vec<CampaignDetail>, AppError>;

    /// Apply owner edits while the campaign row is held. A funding goal in
    /// `changes` is written only when the campaign has a funding row.
    async fn update_campaign(
        &self,
        id: Uuid,
        changes: CampaignChanges,
        check: &CampaignUpdateCheck,
    ) -> Result<CampaignDetail, AppError>;

    /// Delete a campaign and everything hanging off it. Returns false when absent.
    async fn delete_campaign(&self, id: Uuid) -> Result<bool, AppError>;

    async fn exists_relation(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        kind: RelationKind,
    ) -> Result<bool, AppError>;

    /// Flip the (user, campaign) relation: insert when absent, delete when present.
    ///
    /// `check` sees the state under lock; an `Err` aborts without any write.
    async fn toggle_relation(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        kind: RelationKind,
        check: &RelationCheck,
    ) -> Result<ToggleOutcome, AppError>;

    async fn create_review(
        &self,
        review: NewReview,
        check: &CampaignCheck,
    ) -> Result<CampaignReview, AppError>;

    async fn list_reviews(&self, campaign_id: Uuid) -> Result<Vec<CampaignReview>, AppError>;

    async fn find_review(&self, id: Uuid) -> Result<Option<CampaignReview>, AppError>;

    async fn update_review(
        &self,
        id: Uuid,
        title: String,
        content: String,
    ) -> Result<Option<CampaignReview>, AppError>;

    async fn delete_review(&self, id: Uuid) -> Result<bool, AppError>;

    async fn create_comment(&self, comment: NewComment) -> Result<CampaignComment, AppError>;

    async fn list_comments(&self, campaign_id: Uuid) -> Result<Vec<CampaignComment>, AppError>;

    async fn find_comment(&self, id: Uuid) -> Result<Option<CampaignComment>, AppError>;

    async fn update_comment(
        &self,
        id: Uuid,
        content: String,
    ) -> Result<Option<CampaignComment>, AppError>;

    async fn delete_comment(&self, id: Uuid) -> Result<bool, AppError>;

    /// Add `amount` to the campaign's funding and record the contribution.
    async fn contribute_funding(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        amount: Decimal,
        check: &CampaignCheck,
    ) -> Result<(FundingOrder, Funding), AppError>;

    async fn create_category(&self, category_name: String) -> Result<ShopCategory, AppError>;

    async fn list_categories(&self) -> Result<Vec<ShopCategory>, AppError>;

    /// Products of one category, newest first. Fails with `NotFound` for an
    /// unknown category.
    async fn list_products_in_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<ShopProduct>, AppError>;

    /// Fails with `NotFound` when the product names an unknown category.
    async fn create_product(&self, product: NewProduct) -> Result<ShopProduct, AppError>;

    async fn find_product(&self, id: Uuid) -> Result<Option<ShopProduct>, AppError>;

    /// Increment the product's hit counter and return the updated row.
    async fn record_product_view(&self, id: Uuid) -> Result<Option<ShopProduct>, AppError>;

    /// Add `amount` units while the product row is held. Overflow is a
    /// validation error and leaves the stock unchanged.
    async fn restock_product(&self, id: Uuid, amount: i32) -> Result<ShopProduct, AppError>;

    /// Reserve stock and create the order with exactly one `received` detail line.
    ///
    /// Fails with `InsufficientStock` and writes nothing when the product
    /// holds fewer units than requested.
    async fn place_order(&self, order: NewOrder) -> Result<OrderWithDetails, AppError>;

    async fn find_order(&self, id: Uuid) -> Result<Option<OrderWithDetails>, AppError>;

    /// Rewrite the status of every detail line of an order. Stock and
    /// quantities are untouched.
    async fn update_order_status(
        &self,
        order_id: Uuid,
        status: OrderDetailStatus,
    ) -> Result<OrderWithDetails, AppError>;
}

pub(crate) fn campaign_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Campaign {} not found", id))
}

pub(crate) fn product_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Product {} not found", id))
}

pub(crate) fn order_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Order {} not found", id))
}

pub(crate) fn category_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Category {} not found", id))
}
