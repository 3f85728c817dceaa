use campaign_platform_shared::{
    CategoryResponse, CreateProductRequest, OrderDetailResponse, OrderDetailStatus, OrderResponse,
    PlaceOrderRequest, ProductResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;
use crate::utils::validation::checked_money;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ShopCategory {
    pub id: Uuid,
    pub category_name: String,
}

impl ShopCategory {
    pub fn to_response(&self) -> CategoryResponse {
        CategoryResponse {
            id: self.id,
            category_name: self.category_name.clone(),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ShopProduct {
    pub id: Uuid,
    pub product_name: String,
    pub product_price: Decimal,
    pub product_stock: i32,
    pub product_desc: String,
    pub category_id: Option<Uuid>,
    pub hits: i32,
    pub product_date: DateTime<Utc>,
}

impl ShopProduct {
    /// Stock left after reserving `quantity` units, or the shortfall as an error.
    ///
    /// Pure evaluation; the caller must apply the result under the same
    /// atomic unit that produced `self`.
    pub fn reserve(&self, quantity: i32) -> Result<i32, AppError> {
        evaluate_reservation(self.product_stock, quantity)
    }

    pub fn total_price(&self, quantity: i32) -> Result<Decimal, AppError> {
        checked_money(
            "order_totalprice",
            self.product_price.checked_mul(Decimal::from(quantity)),
        )
    }

    /// Stock after adding `amount` units; overflow is a validation error.
    pub fn restocked(&self, amount: i32) -> Result<i32, AppError> {
        self.product_stock
            .checked_add(amount)
            .ok_or_else(|| AppError::Validation("Restock overflows product stock".to_string()))
    }

    pub fn to_response(&self) -> ProductResponse {
        ProductResponse {
            id: self.id,
            product_name: self.product_name.clone(),
            product_price: self.product_price,
            product_stock: self.product_stock,
            product_desc: self.product_desc.clone(),
            category_id: self.category_id,
            hits: self.hits,
            product_date: self.product_date,
        }
    }
}

pub fn evaluate_reservation(stock: i32, quantity: i32) -> Result<i32, AppError> {
    if quantity <= 0 {
        return Err(AppError::Validation(format!(
            "order_quantity must be a positive integer, got {}",
            quantity
        )));
    }

    if stock < quantity {
        return Err(AppError::InsufficientStock {
            requested: quantity,
            available: stock,
        });
    }

    Ok(stock - quantity)
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub product_name: String,
    pub product_price: Decimal,
    pub product_stock: i32,
    pub product_desc: String,
    pub category_id: Option<Uuid>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        Self {
            product_name: request.product_name,
            product_price: request.product_price,
            product_stock: request.product_stock,
            product_desc: request.product_desc,
            category_id: request.category_id,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ShopOrder {
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
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ShopOrderDetail {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_count: i32,
    pub order_detail_status: OrderDetailStatus,
}

impl ShopOrderDetail {
    pub fn to_response(&self) -> OrderDetailResponse {
        OrderDetailResponse {
            id: self.id,
            order_id: self.order_id,
            product_id: self.product_id,
            product_count: self.product_count,
            status: self.order_detail_status,
            status_label: self.order_detail_status.label().to_string(),
        }
    }
}

/// Order metadata supplied by the buyer; quantity is validated before the
/// store sees it.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub order_quantity: i32,
    pub zip_code: String,
    pub address: String,
    pub address_detail: String,
    pub address_message: String,
    pub receiver_name: String,
    pub receiver_number: String,
}

impl NewOrder {
    pub fn from_request(user_id: Uuid, product_id: Uuid, request: PlaceOrderRequest) -> Self {
        Self {
            user_id,
            product_id,
            order_quantity: request.order_quantity,
            zip_code: request.zip_code,
            address: request.address,
            address_detail: request.address_detail,
            address_message: request.address_message,
            receiver_name: request.receiver_name,
            receiver_number: request.receiver_number,
        }
    }
}

/// An order together with its detail lines.
#[derive(Debug, Clone)]
pub struct OrderWithDetails {
    pub order: ShopOrder,
    pub details: Vec<ShopOrderDetail>,
}

impl OrderWithDetails {
    pub fn to_response(&self) -> OrderResponse {
        let order = &self.order;
        OrderResponse {
            id: order.id,
            user_id: order.user_id,
            product_id: order.product_id,
            order_quantity: order.order_quantity,
            order_totalprice: order.order_totalprice,
            order_date: order.order_date,
            zip_code: order.zip_code.clone(),
            address: order.address.clone(),
            address_detail: order.address_detail.clone(),
            address_message: order.address_message.clone(),
            receiver_name: order.receiver_name.clone(),
            receiver_number: order.receiver_number.clone(),
            order_info: self.details.iter().map(|d| d.to_response()).collect(),
        }
    }
}
