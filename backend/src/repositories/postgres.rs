use async_trait::async_trait;
use campaign_platform_shared::{CampaignStatus, OrderDetailStatus, RelationKind, ToggleOutcome};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Campaign, CampaignChanges, CampaignComment, CampaignDetail, CampaignReview, Funding,
    FundingOrder, NewCampaign, NewComment, NewOrder, NewProduct, NewReview, OrderWithDetails,
    RelationSnapshot, ShopCategory, ShopOrder, ShopOrderDetail, ShopProduct,
};
use crate::repositories::{
    campaign_not_found, category_not_found, order_not_found, product_not_found, CampaignCheck,
    CampaignUpdateCheck, EntityStore, RelationCheck,
};

macro_rules! campaign_columns {
    () => {
        "id, user_id, title, content, members, status, is_funding, campaign_start_date, \
         campaign_end_date, activity_start_date, activity_end_date, created_at, updated_at"
    };
}

macro_rules! funding_columns {
    () => {
        "id, campaign_id, goal, amount, created_at, updated_at"
    };
}

macro_rules! product_columns {
    () => {
        "id, product_name, product_price, product_stock, product_desc, category_id, hits, \
         product_date"
    };
}

macro_rules! review_columns {
    () => {
        "id, campaign_id, user_id, title, content, created_at, updated_at"
    };
}

macro_rules! comment_columns {
    () => {
        "id, campaign_id, user_id, content, created_at, updated_at"
    };
}

macro_rules! order_columns {
    () => {
        "id, user_id, product_id, order_quantity, order_totalprice, order_date, zip_code, \
         address, address_detail, address_message, receiver_name, receiver_number"
    };
}

macro_rules! order_detail_columns {
    () => {
        "id, order_id, product_id, product_count, order_detail_status"
    };
}

/// Campaign row plus the relation counts the list view needs.
#[derive(FromRow)]
struct CampaignListRow {
    #[sqlx(flatten)]
    campaign: Campaign,
    participant_count: i64,
    like_count: i64,
}

/// PostgreSQL-backed entity store.
///
/// Guarded writes run in a transaction that first locks the aggregate row
/// (`FOR UPDATE` on the campaign or product), so concurrent requests on the
/// same aggregate are serialized by the database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn lock_campaign(
    conn: &mut PgConnection,
    campaign_id: Uuid,
    exclusive: bool,
) -> Result<Campaign, AppError> {
    let sql = if exclusive {
        concat!("SELECT ", campaign_columns!(), " FROM campaigns WHERE id = $1 FOR UPDATE")
    } else {
        concat!("SELECT ", campaign_columns!(), " FROM campaigns WHERE id = $1 FOR SHARE")
    };

    sqlx::query_as::<_, Campaign>(sql)
        .bind(campaign_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| campaign_not_found(campaign_id))
}

async fn campaign_exists(conn: &mut PgConnection, campaign_id: Uuid) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM campaigns WHERE id = $1)")
        .bind(campaign_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

async fn relation_exists(
    conn: &mut PgConnection,
    user_id: Uuid,
    campaign_id: Uuid,
    kind: RelationKind,
) -> Result<bool, AppError> {
    let sql = match kind {
        RelationKind::Like => {
            "SELECT EXISTS(SELECT 1 FROM campaign_likes WHERE campaign_id = $1 AND user_id = $2)"
        }
        RelationKind::Participate => {
            "SELECT EXISTS(SELECT 1 FROM campaign_participants \
             WHERE campaign_id = $1 AND user_id = $2 AND is_participated)"
        }
    };

    let exists = sqlx::query_scalar::<_, bool>(sql)
        .bind(campaign_id)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

async fn count_participants(conn: &mut PgConnection, campaign_id: Uuid) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM campaign_participants WHERE campaign_id = $1 AND is_participated",
    )
    .bind(campaign_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count)
}

async fn count_likes(conn: &mut PgConnection, campaign_id: Uuid) -> Result<i64, AppError> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM campaign_likes WHERE campaign_id = $1")
            .bind(campaign_id)
            .fetch_one(&mut *conn)
            .await?;
    Ok(count)
}

async fn find_funding(
    conn: &mut PgConnection,
    campaign_id: Uuid,
) -> Result<Option<Funding>, AppError> {
    let funding = sqlx::query_as::<_, Funding>(concat!(
        "SELECT ",
        funding_columns!(),
        " FROM fundings WHERE campaign_id = $1"
    ))
    .bind(campaign_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(funding)
}

async fn lock_product(conn: &mut PgConnection, product_id: Uuid) -> Result<ShopProduct, AppError> {
    sqlx::query_as::<_, ShopProduct>(concat!(
        "SELECT ",
        product_columns!(),
        " FROM shop_products WHERE id = $1 FOR UPDATE"
    ))
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| product_not_found(product_id))
}

async fn category_exists(conn: &mut PgConnection, category_id: Uuid) -> Result<bool, AppError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM shop_categories WHERE id = $1)")
            .bind(category_id)
            .fetch_one(&mut *conn)
            .await?;
    Ok(exists)
}

async fn load_order(
    conn: &mut PgConnection,
    order_id: Uuid,
) -> Result<Option<OrderWithDetails>, AppError> {
    let order = sqlx::query_as::<_, ShopOrder>(concat!(
        "SELECT ",
        order_columns!(),
        " FROM shop_orders WHERE id = $1"
    ))
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await?;

    let order = match order {
        Some(order) => order,
        None => return Ok(None),
    };

    let details = sqlx::query_as::<_, ShopOrderDetail>(concat!(
        "SELECT ",
        order_detail_columns!(),
        " FROM shop_order_details WHERE order_id = $1 ORDER BY id"
    ))
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(OrderWithDetails { order, details }))
}

#[async_trait]
impl EntityStore for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_campaign(
        &self,
        campaign: NewCampaign,
        funding_goal: Option<Decimal>,
    ) -> Result<CampaignDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let campaign = sqlx::query_as::<_, Campaign>(concat!(
            "INSERT INTO campaigns (id, user_id, title, content, members, status, is_funding, \
             campaign_start_date, campaign_end_date, activity_start_date, activity_end_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING ",
            campaign_columns!()
        ))
        .bind(Uuid::new_v4())
        .bind(campaign.user_id)
        .bind(&campaign.title)
        .bind(&campaign.content)
        .bind(campaign.members)
        .bind(campaign.status)
        .bind(campaign.is_funding)
        .bind(campaign.campaign_start_date)
        .bind(campaign.campaign_end_date)
        .bind(campaign.activity_start_date)
        .bind(campaign.activity_end_date)
        .fetch_one(&mut *tx)
        .await?;

        let funding = match funding_goal {
            Some(goal) => Some(
                sqlx::query_as::<_, Funding>(concat!(
                    "INSERT INTO fundings (id, campaign_id, goal, amount) VALUES ($1, $2, $3, 0) RETURNING ",
                    funding_columns!()
                ))
                .bind(Uuid::new_v4())
                .bind(campaign.id)
                .bind(goal)
                .fetch_one(&mut *tx)
                .await?,
            ),
            None => None,
        };

        tx.commit().await?;

        info!(campaign_id = %campaign.id, owner = %campaign.user_id, "Campaign created");
        Ok(CampaignDetail {
            campaign,
            participant_count: 0,
            like_count: 0,
            funding,
        })
    }

    async fn find_campaign(&self, id: Uuid) -> Result<Option<Campaign>, AppError> {
        let campaign = sqlx::query_as::<_, Campaign>(concat!(
            "SELECT ",
            campaign_columns!(),
            " FROM campaigns WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(campaign)
    }

    async fn find_campaign_detail(&self, id: Uuid) -> Result<Option<CampaignDetail>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let campaign = sqlx::query_as::<_, Campaign>(concat!(
            "SELECT ",
            campaign_columns!(),
            " FROM campaigns WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        let campaign = match campaign {
            Some(campaign) => campaign,
            None => return Ok(None),
        };

        let participant_count = count_participants(&mut conn, id).await?;
        let like_count = count_likes(&mut conn, id).await?;
        let funding = find_funding(&mut conn, id).await?;

        Ok(Some(CampaignDetail {
            campaign,
            participant_count,
            like_count,
            funding,
        }))
    }

    async fn list_campaigns(
        &self,
        status: Option<CampaignStatus>,
    ) -> Result<Vec<CampaignDetail>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, CampaignListRow>(concat!(
            "SELECT ",
            campaign_columns!(),
            ", (SELECT COUNT(*) FROM campaign_participants p \
                WHERE p.campaign_id = campaigns.id AND p.is_participated) AS participant_count, \
               (SELECT COUNT(*) FROM campaign_likes l \
                WHERE l.campaign_id = campaigns.id) AS like_count \
             FROM campaigns \
             WHERE ($1::campaign_status IS NULL OR status = $1) \
             ORDER BY created_at DESC"
        ))
        .bind(status)
        .fetch_all(&mut *conn)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.campaign.id).collect();
        let mut fundings = sqlx::query_as::<_, Funding>(concat!(
            "SELECT ",
            funding_columns!(),
            " FROM fundings WHERE campaign_id = ANY($1)"
        ))
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let funding = fundings
                    .iter()
                    .position(|f| f.campaign_id == row.campaign.id)
                    .map(|i| fundings.swap_remove(i));
                CampaignDetail {
                    campaign: row.campaign,
                    participant_count: row.participant_count,
                    like_count: row.like_count,
                    funding,
                }
            })
            .collect())
    }

    async fn update_campaign(
        &self,
        id: Uuid,
        changes: CampaignChanges,
        check: &CampaignUpdateCheck,
    ) -> Result<CampaignDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let campaign = lock_campaign(&mut tx, id, true).await?;
        let participant_count = count_participants(&mut tx, id).await?;
        check(&campaign, participant_count)?;

        let campaign = sqlx::query_as::<_, Campaign>(concat!(
            "UPDATE campaigns SET title = $1, content = $2, members = $3, \
             campaign_start_date = $4, campaign_end_date = $5, \
             activity_start_date = $6, activity_end_date = $7, updated_at = NOW() \
             WHERE id = $8 RETURNING ",
            campaign_columns!()
        ))
        .bind(&changes.title)
        .bind(&changes.content)
        .bind(changes.members)
        .bind(changes.campaign_start_date)
        .bind(changes.campaign_end_date)
        .bind(changes.activity_start_date)
        .bind(changes.activity_end_date)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(goal) = changes.goal {
            sqlx::query("UPDATE fundings SET goal = $1, updated_at = NOW() WHERE campaign_id = $2")
                .bind(goal)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let like_count = count_likes(&mut tx, id).await?;
        let funding = find_funding(&mut tx, id).await?;

        tx.commit().await?;

        info!(campaign_id = %id, "Campaign updated");
        Ok(CampaignDetail {
            campaign,
            participant_count,
            like_count,
            funding,
        })
    }

    async fn delete_campaign(&self, id: Uuid) -> Result<bool, AppError> {
        // dependent rows go through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists_relation(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        kind: RelationKind,
    ) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await?;
        relation_exists(&mut conn, user_id, campaign_id, kind).await
    }

    async fn toggle_relation(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        kind: RelationKind,
        check: &RelationCheck,
    ) -> Result<ToggleOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let campaign = lock_campaign(&mut tx, campaign_id, true).await?;
        let exists = relation_exists(&mut tx, user_id, campaign_id, kind).await?;
        let active_participants = count_participants(&mut tx, campaign_id).await?;

        check(&RelationSnapshot {
            campaign,
            kind,
            exists,
            active_participants,
        })?;

        let outcome = match (kind, exists) {
            (RelationKind::Like, true) => {
                sqlx::query("DELETE FROM campaign_likes WHERE campaign_id = $1 AND user_id = $2")
                    .bind(campaign_id)
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?;
                ToggleOutcome::Deactivated
            }
            (RelationKind::Like, false) => {
                sqlx::query(
                    "INSERT INTO campaign_likes (id, campaign_id, user_id) VALUES ($1, $2, $3)",
                )
                .bind(Uuid::new_v4())
                .bind(campaign_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
                ToggleOutcome::Activated
            }
            (RelationKind::Participate, true) => {
                sqlx::query(
                    "DELETE FROM campaign_participants WHERE campaign_id = $1 AND user_id = $2",
                )
                .bind(campaign_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
                ToggleOutcome::Deactivated
            }
            (RelationKind::Participate, false) => {
                // an inactive row for the same pair is reactivated in place
                sqlx::query(
                    "INSERT INTO campaign_participants (id, campaign_id, user_id, is_participated) \
                     VALUES ($1, $2, $3, TRUE) \
                     ON CONFLICT (campaign_id, user_id) DO UPDATE SET is_participated = TRUE",
                )
                .bind(Uuid::new_v4())
                .bind(campaign_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
                ToggleOutcome::Activated
            }
        };

        tx.commit().await?;

        debug!(%campaign_id, %user_id, %kind, ?outcome, "relation toggled");
        Ok(outcome)
    }

    async fn create_review(
        &self,
        review: NewReview,
        check: &CampaignCheck,
    ) -> Result<CampaignReview, AppError> {
        let mut tx = self.pool.begin().await?;

        let campaign = lock_campaign(&mut tx, review.campaign_id, false).await?;
        check(&campaign)?;

        let review = sqlx::query_as::<_, CampaignReview>(concat!(
            "INSERT INTO campaign_reviews (id, campaign_id, user_id, title, content) \
             VALUES ($1, $2, $3, $4, $5) RETURNING ",
            review_columns!()
        ))
        .bind(Uuid::new_v4())
        .bind(review.campaign_id)
        .bind(review.user_id)
        .bind(&review.title)
        .bind(&review.content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(review)
    }

    async fn list_reviews(&self, campaign_id: Uuid) -> Result<Vec<CampaignReview>, AppError> {
        let mut conn = self.pool.acquire().await?;
        if !campaign_exists(&mut conn, campaign_id).await? {
            return Err(campaign_not_found(campaign_id));
        }

        let reviews = sqlx::query_as::<_, CampaignReview>(concat!(
            "SELECT ",
            review_columns!(),
            " FROM campaign_reviews WHERE campaign_id = $1 ORDER BY created_at"
        ))
        .bind(campaign_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(reviews)
    }

    async fn find_review(&self, id: Uuid) -> Result<Option<CampaignReview>, AppError> {
        let review = sqlx::query_as::<_, CampaignReview>(concat!(
            "SELECT ",
            review_columns!(),
            " FROM campaign_reviews WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(review)
    }

    async fn update_review(
        &self,
        id: Uuid,
        title: String,
        content: String,
    ) -> Result<Option<CampaignReview>, AppError> {
        let review = sqlx::query_as::<_, CampaignReview>(concat!(
            "UPDATE campaign_reviews SET title = $1, content = $2, updated_at = NOW() \
             WHERE id = $3 RETURNING ",
            review_columns!()
        ))
        .bind(&title)
        .bind(&content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(review)
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM campaign_reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_comment(&self, comment: NewComment) -> Result<CampaignComment, AppError> {
        let mut conn = self.pool.acquire().await?;
        if !campaign_exists(&mut conn, comment.campaign_id).await? {
            return Err(campaign_not_found(comment.campaign_id));
        }

        let comment = sqlx::query_as::<_, CampaignComment>(concat!(
            "INSERT INTO campaign_comments (id, campaign_id, user_id, content) \
             VALUES ($1, $2, $3, $4) RETURNING ",
            comment_columns!()
        ))
        .bind(Uuid::new_v4())
        .bind(comment.campaign_id)
        .bind(comment.user_id)
        .bind(&comment.content)
        .fetch_one(&mut *conn)
        .await?;
        Ok(comment)
    }

    async fn list_comments(&self, campaign_id: Uuid) -> Result<Vec<CampaignComment>, AppError> {
        let mut conn = self.pool.acquire().await?;
        if !campaign_exists(&mut conn, campaign_id).await? {
            return Err(campaign_not_found(campaign_id));
        }

        let comments = sqlx::query_as::<_, CampaignComment>(concat!(
            "SELECT ",
            comment_columns!(),
            " FROM campaign_comments WHERE campaign_id = $1 ORDER BY created_at"
        ))
        .bind(campaign_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(comments)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<CampaignComment>, AppError> {
        let comment = sqlx::query_as::<_, CampaignComment>(concat!(
            "SELECT ",
            comment_columns!(),
            " FROM campaign_comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn update_comment(
        &self,
        id: Uuid,
        content: String,
    ) -> Result<Option<CampaignComment>, AppError> {
        let comment = sqlx::query_as::<_, CampaignComment>(concat!(
            "UPDATE campaign_comments SET content = $1, updated_at = NOW() \
             WHERE id = $2 RETURNING ",
            comment_columns!()
        ))
        .bind(&content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM campaign_comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn contribute_funding(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        amount: Decimal,
        check: &CampaignCheck,
    ) -> Result<(FundingOrder, Funding), AppError> {
        let mut tx = self.pool.begin().await?;

        let campaign = lock_campaign(&mut tx, campaign_id, false).await?;
        check(&campaign)?;

        // backers share the campaign lock; the funding row serializes them
        let current = sqlx::query_as::<_, Funding>(concat!(
            "SELECT ",
            funding_columns!(),
            " FROM fundings WHERE campaign_id = $1 FOR UPDATE"
        ))
        .bind(campaign_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Campaign {} has no funding", campaign_id)))?;
        let total = current.total_after(amount)?;

        let funding = sqlx::query_as::<_, Funding>(concat!(
            "UPDATE fundings SET amount = $1, updated_at = NOW() WHERE id = $2 RETURNING ",
            funding_columns!()
        ))
        .bind(total)
        .bind(current.id)
        .fetch_one(&mut *tx)
        .await?;

        let order = sqlx::query_as::<_, FundingOrder>(
            "INSERT INTO funding_orders (id, funding_id, user_id, amount) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, funding_id, user_id, amount, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(funding.id)
        .bind(user_id)
        .bind(amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(%campaign_id, %user_id, %amount, total = %funding.amount, "Funding contributed");
        Ok((order, funding))
    }

    async fn create_category(&self, category_name: String) -> Result<ShopCategory, AppError> {
        let category = sqlx::query_as::<_, ShopCategory>(
            "INSERT INTO shop_categories (id, category_name) VALUES ($1, $2) \
             RETURNING id, category_name",
        )
        .bind(Uuid::new_v4())
        .bind(&category_name)
        .fetch_one(&self.pool)
        .await?;

        info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<ShopCategory>, AppError> {
        let categories = sqlx::query_as::<_, ShopCategory>(
            "SELECT id, category_name FROM shop_categories ORDER BY category_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn list_products_in_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<ShopProduct>, AppError> {
        let mut conn = self.pool.acquire().await?;
        if !category_exists(&mut conn, category_id).await? {
            return Err(category_not_found(category_id));
        }

        let products = sqlx::query_as::<_, ShopProduct>(concat!(
            "SELECT ",
            product_columns!(),
            " FROM shop_products WHERE category_id = $1 ORDER BY product_date DESC"
        ))
        .bind(category_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(products)
    }

    async fn create_product(&self, product: NewProduct) -> Result<ShopProduct, AppError> {
        let mut conn = self.pool.acquire().await?;
        if let Some(category_id) = product.category_id {
            if !category_exists(&mut conn, category_id).await? {
                return Err(category_not_found(category_id));
            }
        }

        let product = sqlx::query_as::<_, ShopProduct>(concat!(
            "INSERT INTO shop_products \
             (id, product_name, product_price, product_stock, product_desc, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING ",
            product_columns!()
        ))
        .bind(Uuid::new_v4())
        .bind(&product.product_name)
        .bind(product.product_price)
        .bind(product.product_stock)
        .bind(&product.product_desc)
        .bind(product.category_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(product)
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<ShopProduct>, AppError> {
        let product = sqlx::query_as::<_, ShopProduct>(concat!(
            "SELECT ",
            product_columns!(),
            " FROM shop_products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    async fn record_product_view(&self, id: Uuid) -> Result<Option<ShopProduct>, AppError> {
        let product = sqlx::query_as::<_, ShopProduct>(concat!(
            "UPDATE shop_products SET hits = hits + 1 WHERE id = $1 RETURNING ",
            product_columns!()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    async fn restock_product(&self, id: Uuid, amount: i32) -> Result<ShopProduct, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = lock_product(&mut tx, id).await?;
        let stock = current.restocked(amount)?;

        let product = sqlx::query_as::<_, ShopProduct>(concat!(
            "UPDATE shop_products SET product_stock = $1 WHERE id = $2 RETURNING ",
            product_columns!()
        ))
        .bind(stock)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(product_id = %id, stock = product.product_stock, "Product restocked");
        Ok(product)
    }

    async fn place_order(&self, order: NewOrder) -> Result<OrderWithDetails, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = lock_product(&mut tx, order.product_id).await?;

        product.reserve(order.order_quantity)?;
        let total_price = product.total_price(order.order_quantity)?;

        let result = sqlx::query(
            "UPDATE shop_products SET product_stock = product_stock - $1 \
             WHERE id = $2 AND product_stock >= $1",
        )
        .bind(order.order_quantity)
        .bind(order.product_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::InsufficientStock {
                requested: order.order_quantity,
                available: product.product_stock,
            });
        }

        let shop_order = sqlx::query_as::<_, ShopOrder>(concat!(
            "INSERT INTO shop_orders (id, user_id, product_id, order_quantity, order_totalprice, \
             zip_code, address, address_detail, address_message, receiver_name, receiver_number) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING ",
            order_columns!()
        ))
        .bind(Uuid::new_v4())
        .bind(order.user_id)
        .bind(order.product_id)
        .bind(order.order_quantity)
        .bind(total_price)
        .bind(&order.zip_code)
        .bind(&order.address)
        .bind(&order.address_detail)
        .bind(&order.address_message)
        .bind(&order.receiver_name)
        .bind(&order.receiver_number)
        .fetch_one(&mut *tx)
        .await?;

        let detail = sqlx::query_as::<_, ShopOrderDetail>(concat!(
            "INSERT INTO shop_order_details (id, order_id, product_id, product_count, order_detail_status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING ",
            order_detail_columns!()
        ))
        .bind(Uuid::new_v4())
        .bind(shop_order.id)
        .bind(order.product_id)
        .bind(order.order_quantity)
        .bind(OrderDetailStatus::Received)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            order_id = %shop_order.id,
            product_id = %order.product_id,
            quantity = order.order_quantity,
            "Order placed"
        );
        Ok(OrderWithDetails {
            order: shop_order,
            details: vec![detail],
        })
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<OrderWithDetails>, AppError> {
        let mut conn = self.pool.acquire().await?;
        load_order(&mut conn, id).await
    }

    async fn update_order_status(
        &self,
        order_id: Uuid,
        status: OrderDetailStatus,
    ) -> Result<OrderWithDetails, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM shop_orders WHERE id = $1 FOR UPDATE")
            .bind(order_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(order_not_found(order_id));
        }

        sqlx::query("UPDATE shop_order_details SET order_detail_status = $1 WHERE order_id = $2")
            .bind(status)
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        let order = load_order(&mut tx, order_id)
            .await?
            .ok_or_else(|| order_not_found(order_id))?;

        tx.commit().await?;
        Ok(order)
    }
}
