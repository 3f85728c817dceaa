//! Database models for the campaign platform
//!
//! Plain row types shared by every entity store implementation, plus the
//! conversions into the response DTOs of the shared crate.

pub mod campaign;
pub mod funding;
pub mod relation;
pub mod review;
pub mod shop;

// Re-export commonly used models
pub use campaign::{Campaign, CampaignChanges, CampaignDetail, NewCampaign};
pub use funding::{Funding, FundingOrder};
pub use relation::{CampaignLike, Participant, RelationSnapshot};
pub use review::{CampaignComment, CampaignReview, NewComment, NewReview};
pub use shop::{
    NewOrder, NewProduct, OrderWithDetails, ShopCategory, ShopOrder, ShopOrderDetail, ShopProduct,
};
