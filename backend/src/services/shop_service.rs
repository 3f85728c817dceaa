use campaign_platform_shared::{
    CategoryResponse, CreateCategoryRequest, CreateProductRequest, OrderResponse,
    PlaceOrderRequest, ProductResponse, RestockRequest, UpdateOrderStatusRequest,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::NewProduct;
use crate::repositories::EntityStore;
use crate::services::stock_reservation::StockReservation;
use crate::utils::validation::{ensure_money, ensure_non_negative};

#[derive(Clone)]
pub struct ShopService {
    store: Arc<dyn EntityStore>,
    reservation: StockReservation,
}

impl ShopService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            reservation: StockReservation::new(store.clone()),
            store,
        }
    }

    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<CategoryResponse, AppError> {
        request.validate()?;
        let category = self.store.create_category(request.category_name).await?;
        Ok(category.to_response())
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryResponse>, AppError> {
        let categories = self.store.list_categories().await?;
        Ok(categories.iter().map(|c| c.to_response()).collect())
    }

    pub async fn list_category_products(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<ProductResponse>, AppError> {
        let products = self.store.list_products_in_category(category_id).await?;
        Ok(products.iter().map(|p| p.to_response()).collect())
    }

    pub async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<ProductResponse, AppError> {
        request.validate()?;
        ensure_non_negative("product_price", request.product_price)?;
        ensure_money("product_price", request.product_price)?;

        let product = self.store.create_product(NewProduct::from(request)).await?;
        info!(product_id = %product.id, stock = product.product_stock, "Product created");
        Ok(product.to_response())
    }

    /// Product lookup; every successful read counts as a view.
    pub async fn get_product(&self, product_id: Uuid) -> Result<ProductResponse, AppError> {
        self.store
            .record_product_view(product_id)
            .await?
            .map(|p| p.to_response())
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", product_id)))
    }

    pub async fn restock_product(
        &self,
        product_id: Uuid,
        request: RestockRequest,
    ) -> Result<ProductResponse, AppError> {
        request.validate()?;
        let product = self.store.restock_product(product_id, request.amount).await?;
        Ok(product.to_response())
    }

    pub async fn place_order(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        request: PlaceOrderRequest,
    ) -> Result<OrderResponse, AppError> {
        let placed = self
            .reservation
            .place_order(user_id, product_id, request)
            .await?;
        Ok(placed.to_response())
    }

    pub async fn get_order(&self, user_id: Uuid, order_id: Uuid) -> Result<OrderResponse, AppError> {
        let order = self
            .store
            .find_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;

        if order.order.user_id != user_id {
            return Err(AppError::Authorization(
                "Orders are only visible to the buyer".to_string(),
            ));
        }
        Ok(order.to_response())
    }

    pub async fn update_order_status(
        &self,
        order_id: Uuid,
        request: UpdateOrderStatusRequest,
    ) -> Result<OrderResponse, AppError> {
        let order = self
            .store
            .update_order_status(order_id, request.status)
            .await?;

        info!(%order_id, status = %request.status, "Order status updated");
        Ok(order.to_response())
    }
}
