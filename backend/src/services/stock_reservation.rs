use campaign_platform_shared::PlaceOrderRequest;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{NewOrder, OrderWithDetails};
use crate::repositories::EntityStore;

/// Decrements product stock and records the order as one atomic unit.
///
/// Stock never goes negative: the store re-checks availability while the
/// product row is held, and a shortfall leaves stock and orders unchanged.
#[derive(Clone)]
pub struct StockReservation {
    store: Arc<dyn EntityStore>,
}

impl StockReservation {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn place_order(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        request: PlaceOrderRequest,
    ) -> Result<OrderWithDetails, AppError> {
        request.validate()?;

        let order = NewOrder::from_request(user_id, product_id, request);
        match self.store.place_order(order).await {
            Ok(placed) => {
                info!(
                    order_id = %placed.order.id,
                    %product_id,
                    quantity = placed.order.order_quantity,
                    "Stock reserved"
                );
                Ok(placed)
            }
            Err(AppError::InsufficientStock {
                requested,
                available,
            }) => {
                warn!(%product_id, requested, available, "Order rejected for insufficient stock");
                Err(AppError::InsufficientStock {
                    requested,
                    available,
                })
            }
            Err(e) => Err(e),
        }
    }
}
