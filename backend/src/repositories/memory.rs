use async_trait::async_trait;
use campaign_platform_shared::{CampaignStatus, OrderDetailStatus, RelationKind, ToggleOutcome};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Campaign, CampaignChanges, CampaignComment, CampaignDetail, CampaignLike, CampaignReview,
    Funding, FundingOrder, NewCampaign, NewComment, NewOrder, NewProduct, NewReview,
    OrderWithDetails, Participant, RelationSnapshot, ShopCategory, ShopOrder, ShopOrderDetail,
    ShopProduct,
};
use crate::repositories::{
    campaign_not_found, category_not_found, order_not_found, product_not_found, CampaignCheck,
    CampaignUpdateCheck, EntityStore, RelationCheck,
};

/// In-process entity store.
///
/// Every operation runs under one `RwLock` guard, so each call is atomic and
/// a failed check leaves the state exactly as it was.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    campaigns: HashMap<Uuid, Campaign>,
    // keyed by (campaign_id, user_id)
    participants: HashMap<(Uuid, Uuid), Participant>,
    likes: HashMap<(Uuid, Uuid), CampaignLike>,
    // keyed by campaign_id
    fundings: HashMap<Uuid, Funding>,
    funding_orders: Vec<FundingOrder>,
    reviews: Vec<CampaignReview>,
    comments: Vec<CampaignComment>,
    categories: Vec<ShopCategory>,
    products: HashMap<Uuid, ShopProduct>,
    orders: HashMap<Uuid, ShopOrder>,
    order_details: Vec<ShopOrderDetail>,
}

impl MemoryState {
    fn active_participants(&self, campaign_id: Uuid) -> i64 {
        self.participants
            .values()
            .filter(|p| p.campaign_id == campaign_id && p.is_participated)
            .count() as i64
    }

    fn like_count(&self, campaign_id: Uuid) -> i64 {
        self.likes
            .values()
            .filter(|l| l.campaign_id == campaign_id)
            .count() as i64
    }

    fn relation_exists(&self, user_id: Uuid, campaign_id: Uuid, kind: RelationKind) -> bool {
        let key = (campaign_id, user_id);
        match kind {
            RelationKind::Like => self.likes.contains_key(&key),
            RelationKind::Participate => self
                .participants
                .get(&key)
                .map(|p| p.is_participated)
                .unwrap_or(false),
        }
    }

    fn detail(&self, campaign: &Campaign) -> CampaignDetail {
        CampaignDetail {
            campaign: campaign.clone(),
            participant_count: self.active_participants(campaign.id),
            like_count: self.like_count(campaign.id),
            funding: self.fundings.get(&campaign.id).cloned(),
        }
    }

    fn order_with_details(&self, order_id: Uuid) -> Option<OrderWithDetails> {
        let order = self.orders.get(&order_id)?.clone();
        let details = self
            .order_details
            .iter()
            .filter(|d| d.order_id == order_id)
            .cloned()
            .collect();
        Some(OrderWithDetails { order, details })
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_campaign(
        &self,
        campaign: NewCampaign,
        funding_goal: Option<Decimal>,
    ) -> Result<CampaignDetail, AppError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let campaign = campaign.into_campaign(Uuid::new_v4(), now);

        if let Some(goal) = funding_goal {
            state.fundings.insert(
                campaign.id,
                Funding {
                    id: Uuid::new_v4(),
                    campaign_id: campaign.id,
                    goal,
                    amount: Decimal::ZERO,
                    created_at: now,
                    updated_at: now,
                },
            );
        }

        state.campaigns.insert(campaign.id, campaign.clone());
        Ok(state.detail(&campaign))
    }

    async fn find_campaign(&self, id: Uuid) -> Result<Option<Campaign>, AppError> {
        let state = self.state.read().await;
        Ok(state.campaigns.get(&id).cloned())
    }

    async fn find_campaign_detail(&self, id: Uuid) -> Result<Option<CampaignDetail>, AppError> {
        let state = self.state.read().await;
        Ok(state.campaigns.get(&id).map(|c| state.detail(c)))
    }

    async fn list_campaigns(
        &self,
        status: Option<CampaignStatus>,
    ) -> Result<Vec<CampaignDetail>, AppError> {
        let state = self.state.read().await;
        let mut campaigns: Vec<&Campaign> = state
            .campaigns
            .values()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .collect();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(campaigns.into_iter().map(|c| state.detail(c)).collect())
    }

    async fn update_campaign(
        &self,
        id: Uuid,
        changes: CampaignChanges,
        check: &CampaignUpdateCheck,
    ) -> Result<CampaignDetail, AppError> {
        let mut state = self.state.write().await;
        let active = state.active_participants(id);
        let campaign = state
            .campaigns
            .get_mut(&id)
            .ok_or_else(|| campaign_not_found(id))?;
        check(campaign, active)?;

        let now = Utc::now();
        changes.apply_to(campaign, now);
        let campaign = campaign.clone();

        if let (Some(goal), Some(funding)) = (changes.goal, state.fundings.get_mut(&id)) {
            funding.goal = goal;
            funding.updated_at = now;
        }

        Ok(state.detail(&campaign))
    }

    async fn delete_campaign(&self, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        if state.campaigns.remove(&id).is_none() {
            return Ok(false);
        }

        state.participants.retain(|(campaign_id, _), _| *campaign_id != id);
        state.likes.retain(|(campaign_id, _), _| *campaign_id != id);
        if let Some(funding) = state.fundings.remove(&id) {
            state.funding_orders.retain(|o| o.funding_id != funding.id);
        }
        state.reviews.retain(|r| r.campaign_id != id);
        state.comments.retain(|c| c.campaign_id != id);

        Ok(true)
    }

    async fn exists_relation(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        kind: RelationKind,
    ) -> Result<bool, AppError> {
        let state = self.state.read().await;
        Ok(state.relation_exists(user_id, campaign_id, kind))
    }

    async fn toggle_relation(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        kind: RelationKind,
        check: &RelationCheck,
    ) -> Result<ToggleOutcome, AppError> {
        let mut state = self.state.write().await;
        let campaign = state
            .campaigns
            .get(&campaign_id)
            .cloned()
            .ok_or_else(|| campaign_not_found(campaign_id))?;

        let snapshot = RelationSnapshot {
            exists: state.relation_exists(user_id, campaign_id, kind),
            active_participants: state.active_participants(campaign_id),
            campaign,
            kind,
        };
        check(&snapshot)?;

        let key = (campaign_id, user_id);
        let now = Utc::now();
        let outcome = match (kind, snapshot.exists) {
            (RelationKind::Like, true) => {
                state.likes.remove(&key);
                ToggleOutcome::Deactivated
            }
            (RelationKind::Like, false) => {
                state.likes.insert(
                    key,
                    CampaignLike {
                        id: Uuid::new_v4(),
                        campaign_id,
                        user_id,
                        created_at: now,
                    },
                );
                ToggleOutcome::Activated
            }
            (RelationKind::Participate, true) => {
                state.participants.remove(&key);
                ToggleOutcome::Deactivated
            }
            (RelationKind::Participate, false) => {
                // replaces any inactive legacy row for the same pair
                state.participants.insert(
                    key,
                    Participant {
                        id: Uuid::new_v4(),
                        campaign_id,
                        user_id,
                        is_participated: true,
                        created_at: now,
                    },
                );
                ToggleOutcome::Activated
            }
        };

        debug!(%campaign_id, %user_id, %kind, ?outcome, "relation toggled");
        Ok(outcome)
    }

    async fn create_review(
        &self,
        review: NewReview,
        check: &CampaignCheck,
    ) -> Result<CampaignReview, AppError> {
        let mut state = self.state.write().await;
        let campaign = state
            .campaigns
            .get(&review.campaign_id)
            .ok_or_else(|| campaign_not_found(review.campaign_id))?;
        check(campaign)?;

        let now = Utc::now();
        let review = CampaignReview {
            id: Uuid::new_v4(),
            campaign_id: review.campaign_id,
            user_id: review.user_id,
            title: review.title,
            content: review.content,
            created_at: now,
            updated_at: now,
        };
        state.reviews.push(review.clone());
        Ok(review)
    }

    async fn list_reviews(&self, campaign_id: Uuid) -> Result<Vec<CampaignReview>, AppError> {
        let state = self.state.read().await;
        if !state.campaigns.contains_key(&campaign_id) {
            return Err(campaign_not_found(campaign_id));
        }
        Ok(state
            .reviews
            .iter()
            .filter(|r| r.campaign_id == campaign_id)
            .cloned()
            .collect())
    }

    async fn find_review(&self, id: Uuid) -> Result<Option<CampaignReview>, AppError> {
        let state = self.state.read().await;
        Ok(state.reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn update_review(
        &self,
        id: Uuid,
        title: String,
        content: String,
    ) -> Result<Option<CampaignReview>, AppError> {
        let mut state = self.state.write().await;
        Ok(state.reviews.iter_mut().find(|r| r.id == id).map(|review| {
            review.title = title;
            review.content = content;
            review.updated_at = Utc::now();
            review.clone()
        }))
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let before = state.reviews.len();
        state.reviews.retain(|r| r.id != id);
        Ok(state.reviews.len() < before)
    }

    async fn create_comment(&self, comment: NewComment) -> Result<CampaignComment, AppError> {
        let mut state = self.state.write().await;
        if !state.campaigns.contains_key(&comment.campaign_id) {
            return Err(campaign_not_found(comment.campaign_id));
        }

        let now = Utc::now();
        let comment = CampaignComment {
            id: Uuid::new_v4(),
            campaign_id: comment.campaign_id,
            user_id: comment.user_id,
            content: comment.content,
            created_at: now,
            updated_at: now,
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, campaign_id: Uuid) -> Result<Vec<CampaignComment>, AppError> {
        let state = self.state.read().await;
        if !state.campaigns.contains_key(&campaign_id) {
            return Err(campaign_not_found(campaign_id));
        }
        Ok(state
            .comments
            .iter()
            .filter(|c| c.campaign_id == campaign_id)
            .cloned()
            .collect())
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<CampaignComment>, AppError> {
        let state = self.state.read().await;
        Ok(state.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn update_comment(
        &self,
        id: Uuid,
        content: String,
    ) -> Result<Option<CampaignComment>, AppError> {
        let mut state = self.state.write().await;
        Ok(state.comments.iter_mut().find(|c| c.id == id).map(|comment| {
            comment.content = content;
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        Ok(state.comments.len() < before)
    }

    async fn contribute_funding(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        amount: Decimal,
        check: &CampaignCheck,
    ) -> Result<(FundingOrder, Funding), AppError> {
        let mut state = self.state.write().await;
        let campaign = state
            .campaigns
            .get(&campaign_id)
            .ok_or_else(|| campaign_not_found(campaign_id))?;
        check(campaign)?;

        let now = Utc::now();
        let funding = state.fundings.get_mut(&campaign_id).ok_or_else(|| {
            AppError::NotFound(format!("Campaign {} has no funding", campaign_id))
        })?;
        funding.amount = funding.total_after(amount)?;
        funding.updated_at = now;
        let funding = funding.clone();

        let order = FundingOrder {
            id: Uuid::new_v4(),
            funding_id: funding.id,
            user_id,
            amount,
            created_at: now,
        };
        state.funding_orders.push(order.clone());

        Ok((order, funding))
    }

    async fn create_category(&self, category_name: String) -> Result<ShopCategory, AppError> {
        let mut state = self.state.write().await;
        let category = ShopCategory {
            id: Uuid::new_v4(),
            category_name,
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<ShopCategory>, AppError> {
        let state = self.state.read().await;
        let mut categories = state.categories.clone();
        categories.sort_by(|a, b| a.category_name.cmp(&b.category_name));
        Ok(categories)
    }

    async fn list_products_in_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<ShopProduct>, AppError> {
        let state = self.state.read().await;
        if !state.categories.iter().any(|c| c.id == category_id) {
            return Err(category_not_found(category_id));
        }

        let mut products: Vec<ShopProduct> = state
            .products
            .values()
            .filter(|p| p.category_id == Some(category_id))
            .cloned()
            .collect();
        products.sort_by(|a, b| b.product_date.cmp(&a.product_date));
        Ok(products)
    }

    async fn create_product(&self, product: NewProduct) -> Result<ShopProduct, AppError> {
        let mut state = self.state.write().await;
        if let Some(category_id) = product.category_id {
            if !state.categories.iter().any(|c| c.id == category_id) {
                return Err(category_not_found(category_id));
            }
        }

        let product = ShopProduct {
            id: Uuid::new_v4(),
            product_name: product.product_name,
            product_price: product.product_price,
            product_stock: product.product_stock,
            product_desc: product.product_desc,
            category_id: product.category_id,
            hits: 0,
            product_date: Utc::now(),
        };
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<ShopProduct>, AppError> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).cloned())
    }

    async fn record_product_view(&self, id: Uuid) -> Result<Option<ShopProduct>, AppError> {
        let mut state = self.state.write().await;
        Ok(state.products.get_mut(&id).map(|product| {
            product.hits += 1;
            product.clone()
        }))
    }

    async fn restock_product(&self, id: Uuid, amount: i32) -> Result<ShopProduct, AppError> {
        let mut state = self.state.write().await;
        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| product_not_found(id))?;
        product.product_stock = product.restocked(amount)?;
        Ok(product.clone())
    }

    async fn place_order(&self, order: NewOrder) -> Result<OrderWithDetails, AppError> {
        let mut state = self.state.write().await;
        let product = state
            .products
            .get_mut(&order.product_id)
            .ok_or_else(|| product_not_found(order.product_id))?;

        let remaining = product.reserve(order.order_quantity)?;
        let total_price = product.total_price(order.order_quantity)?;
        product.product_stock = remaining;

        let shop_order = ShopOrder {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            product_id: order.product_id,
            order_quantity: order.order_quantity,
            order_totalprice: total_price,
            order_date: Utc::now(),
            zip_code: order.zip_code,
            address: order.address,
            address_detail: order.address_detail,
            address_message: order.address_message,
            receiver_name: order.receiver_name,
            receiver_number: order.receiver_number,
        };
        let detail = ShopOrderDetail {
            id: Uuid::new_v4(),
            order_id: shop_order.id,
            product_id: order.product_id,
            product_count: order.order_quantity,
            order_detail_status: OrderDetailStatus::Received,
        };

        state.orders.insert(shop_order.id, shop_order.clone());
        state.order_details.push(detail.clone());

        Ok(OrderWithDetails {
            order: shop_order,
            details: vec![detail],
        })
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<OrderWithDetails>, AppError> {
        let state = self.state.read().await;
        Ok(state.order_with_details(id))
    }

    async fn update_order_status(
        &self,
        order_id: Uuid,
        status: OrderDetailStatus,
    ) -> Result<OrderWithDetails, AppError> {
        let mut state = self.state.write().await;
        if !state.orders.contains_key(&order_id) {
            return Err(order_not_found(order_id));
        }

        for detail in state
            .order_details
            .iter_mut()
            .filter(|d| d.order_id == order_id)
        {
            detail.order_detail_status = status;
        }

        state
            .order_with_details(order_id)
            .ok_or_else(|| order_not_found(order_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_platform_shared::CampaignStatus;
    use chrono::Duration;

    fn new_campaign(status: CampaignStatus, members: i32) -> NewCampaign {
        let start = Utc::now();
        NewCampaign {
            user_id: Uuid::new_v4(),
            title: "Beach cleanup".to_string(),
            content: "Bring gloves".to_string(),
            members,
            status,
            is_funding: false,
            campaign_start_date: start,
            campaign_end_date: start + Duration::days(7),
            activity_start_date: None,
            activity_end_date: None,
        }
    }

    fn allow_all(_: &RelationSnapshot) -> Result<(), AppError> {
        Ok(())
    }

    #[tokio::test]
    async fn rejected_check_leaves_state_untouched() {
        let store = MemoryStore::new();
        let detail = store
            .create_campaign(new_campaign(CampaignStatus::Recruiting, 1), None)
            .await
            .unwrap();
        let user = Uuid::new_v4();

        let result = store
            .toggle_relation(user, detail.campaign.id, RelationKind::Participate, &|_| {
                Err(AppError::Internal("denied".into()))
            })
            .await;

        assert!(result.is_err());
        assert!(!store
            .exists_relation(user, detail.campaign.id, RelationKind::Participate)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn delete_cascades_to_relations_and_funding() {
        let store = MemoryStore::new();
        let mut campaign = new_campaign(CampaignStatus::Recruiting, 5);
        campaign.is_funding = true;
        let detail = store
            .create_campaign(campaign, Some(Decimal::from(1000)))
            .await
            .unwrap();
        let id = detail.campaign.id;
        let user = Uuid::new_v4();

        store
            .toggle_relation(user, id, RelationKind::Like, &allow_all)
            .await
            .unwrap();
        store
            .toggle_relation(user, id, RelationKind::Participate, &allow_all)
            .await
            .unwrap();

        assert!(store.delete_campaign(id).await.unwrap());
        assert!(!store.delete_campaign(id).await.unwrap());
        assert!(!store.exists_relation(user, id, RelationKind::Like).await.unwrap());
        assert!(store.find_campaign_detail(id).await.unwrap().is_none());
        assert!(store.state.read().await.fundings.is_empty());
    }

    #[tokio::test]
    async fn failed_edit_check_leaves_campaign_untouched() {
        let store = MemoryStore::new();
        let detail = store
            .create_campaign(new_campaign(CampaignStatus::Recruiting, 5), None)
            .await
            .unwrap();
        let id = detail.campaign.id;
        store
            .toggle_relation(Uuid::new_v4(), id, RelationKind::Participate, &allow_all)
            .await
            .unwrap();

        let changes = CampaignChanges {
            title: "Renamed".to_string(),
            content: "Changed".to_string(),
            members: 1,
            campaign_start_date: detail.campaign.campaign_start_date,
            campaign_end_date: detail.campaign.campaign_end_date,
            activity_start_date: None,
            activity_end_date: None,
            goal: None,
        };
        let seen = std::sync::Arc::new(std::sync::Mutex::new(None));
        let seen_in_check = seen.clone();
        let result = store
            .update_campaign(id, changes, &move |_, active| {
                *seen_in_check.lock().unwrap() = Some(active);
                Err(AppError::Validation("denied".into()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(*seen.lock().unwrap(), Some(1));
        let campaign = store.find_campaign(id).await.unwrap().unwrap();
        assert_eq!(campaign.title, "Beach cleanup");
        assert_eq!(campaign.members, 5);
    }

    #[tokio::test]
    async fn overflowing_contribution_leaves_funding_untouched() {
        let store = MemoryStore::new();
        let mut campaign = new_campaign(CampaignStatus::Recruiting, 5);
        campaign.is_funding = true;
        let detail = store
            .create_campaign(campaign, Some(Decimal::from(1000)))
            .await
            .unwrap();
        let id = detail.campaign.id;
        let allow = |_: &Campaign| -> Result<(), AppError> { Ok(()) };
        let large = Decimal::from(600_000_000_000_000_000i64);

        store
            .contribute_funding(Uuid::new_v4(), id, large, &allow)
            .await
            .unwrap();
        let overflow = store
            .contribute_funding(Uuid::new_v4(), id, large, &allow)
            .await;

        assert!(matches!(overflow, Err(AppError::Validation(_))));
        let state = store.state.read().await;
        assert_eq!(state.funding_orders.len(), 1);
        assert_eq!(state.fundings[&id].amount, large);
    }

    #[tokio::test]
    async fn order_status_update_keeps_stock() {
        let store = MemoryStore::new();
        let product = store
            .create_product(NewProduct {
                product_name: "Eco bag".to_string(),
                product_price: Decimal::from(5000),
                product_stock: 3,
                product_desc: String::new(),
                category_id: None,
            })
            .await
            .unwrap();

        let placed = store
            .place_order(NewOrder {
                user_id: Uuid::new_v4(),
                product_id: product.id,
                order_quantity: 2,
                zip_code: "04524".to_string(),
                address: "Sejong-daero 110".to_string(),
                address_detail: String::new(),
                address_message: String::new(),
                receiver_name: "Lee".to_string(),
                receiver_number: "010-1111-2222".to_string(),
            })
            .await
            .unwrap();

        let updated = store
            .update_order_status(placed.order.id, OrderDetailStatus::Shipped)
            .await
            .unwrap();

        assert_eq!(updated.details.len(), 1);
        assert_eq!(updated.details[0].order_detail_status, OrderDetailStatus::Shipped);
        assert_eq!(updated.details[0].product_count, 2);
        let product = store.find_product(product.id).await.unwrap().unwrap();
        assert_eq!(product.product_stock, 1);
    }
}
