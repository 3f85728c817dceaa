use campaign_platform_backend::models::{
    Campaign, NewCampaign, NewProduct, ShopCategory, ShopProduct,
};
use campaign_platform_backend::repositories::{EntityStore, MemoryStore};
use campaign_platform_backend::services::AppServices;
use campaign_platform_shared::{CampaignStatus, PlaceOrderRequest};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// Services wired over a fresh in-process store.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub services: AppServices,
}

pub fn test_context() -> TestContext {
    let store = Arc::new(MemoryStore::new());
    let services = AppServices::new(store.clone());
    TestContext { store, services }
}

pub fn new_campaign(owner: Uuid, status: CampaignStatus, members: i32) -> NewCampaign {
    let start = Utc::now();
    NewCampaign {
        user_id: owner,
        title: "Neighbourhood cleanup".to_string(),
        content: "Gloves and bags provided".to_string(),
        members,
        status,
        is_funding: false,
        campaign_start_date: start,
        campaign_end_date: start + Duration::days(30),
        activity_start_date: None,
        activity_end_date: None,
    }
}

/// Seed a campaign directly in the given lifecycle state.
pub async fn seed_campaign(
    store: &dyn EntityStore,
    status: CampaignStatus,
    members: i32,
) -> Campaign {
    store
        .create_campaign(new_campaign(Uuid::new_v4(), status, members), None)
        .await
        .expect("seed campaign")
        .campaign
}

pub async fn seed_funding_campaign(
    store: &dyn EntityStore,
    status: CampaignStatus,
    goal: Decimal,
) -> Campaign {
    let mut campaign = new_campaign(Uuid::new_v4(), status, 10);
    campaign.is_funding = true;
    store
        .create_campaign(campaign, Some(goal))
        .await
        .expect("seed funding campaign")
        .campaign
}

pub async fn seed_product(store: &dyn EntityStore, stock: i32, price: i64) -> ShopProduct {
    store
        .create_product(NewProduct {
            product_name: "Reusable tumbler".to_string(),
            product_price: Decimal::from(price),
            product_stock: stock,
            product_desc: "Stainless steel, 500ml".to_string(),
            category_id: None,
        })
        .await
        .expect("seed product")
}

pub async fn seed_category(store: &dyn EntityStore, name: &str) -> ShopCategory {
    store
        .create_category(name.to_string())
        .await
        .expect("seed category")
}

pub fn order_request(quantity: i32) -> PlaceOrderRequest {
    PlaceOrderRequest {
        order_quantity: quantity,
        zip_code: "06236".to_string(),
        address: "Teheran-ro 152".to_string(),
        address_detail: "3F".to_string(),
        address_message: "Leave at the door".to_string(),
        receiver_name: "Kim".to_string(),
        receiver_number: "010-1234-5678".to_string(),
    }
}
