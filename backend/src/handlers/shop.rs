use actix_web::{web, HttpResponse, Result};
use campaign_platform_shared::constants::{SUCCESS_CATEGORY_CREATED, SUCCESS_ORDER_PLACED};
use campaign_platform_shared::{
    ApiResponse, CreateCategoryRequest, CreateProductRequest, PlaceOrderRequest, RestockRequest,
    UpdateOrderStatusRequest,
};
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::ShopService;

#[actix_web::post("/categories")]
pub async fn create_category(
    _user: AuthenticatedUser,
    request: web::Json<CreateCategoryRequest>,
    shop: web::Data<ShopService>,
) -> Result<HttpResponse, AppError> {
    let category = shop.create_category(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        category,
        SUCCESS_CATEGORY_CREATED,
    )))
}

#[actix_web::get("/categories")]
pub async fn list_categories(shop: web::Data<ShopService>) -> Result<HttpResponse, AppError> {
    let categories = shop.list_categories().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(categories)))
}

#[actix_web::get("/categories/{id}/products")]
pub async fn list_category_products(
    path: web::Path<Uuid>,
    shop: web::Data<ShopService>,
) -> Result<HttpResponse, AppError> {
    let products = shop.list_category_products(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(products)))
}

#[actix_web::post("/products")]
pub async fn create_product(
    _user: AuthenticatedUser,
    request: web::Json<CreateProductRequest>,
    shop: web::Data<ShopService>,
) -> Result<HttpResponse, AppError> {
    let product = shop.create_product(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(product)))
}

/// Product detail; counts as a view
#[actix_web::get("/products/{id}")]
pub async fn get_product(
    path: web::Path<Uuid>,
    shop: web::Data<ShopService>,
) -> Result<HttpResponse, AppError> {
    let product = shop.get_product(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(product)))
}

#[actix_web::post("/products/{id}/restock")]
pub async fn restock_product(
    _user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: web::Json<RestockRequest>,
    shop: web::Data<ShopService>,
) -> Result<HttpResponse, AppError> {
    let product = shop
        .restock_product(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(product)))
}

#[actix_web::post("/products/{id}/orders")]
pub async fn place_order(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: web::Json<PlaceOrderRequest>,
    shop: web::Data<ShopService>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    debug!("User {} ordering product {}", user.user_id, product_id);

    let order = shop
        .place_order(user.user_id, product_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        order,
        SUCCESS_ORDER_PLACED,
    )))
}

#[actix_web::get("/orders/{id}")]
pub async fn get_order(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    shop: web::Data<ShopService>,
) -> Result<HttpResponse, AppError> {
    let order = shop.get_order(user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(order)))
}

#[actix_web::put("/orders/{id}/status")]
pub async fn update_order_status(
    _user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: web::Json<UpdateOrderStatusRequest>,
    shop: web::Data<ShopService>,
) -> Result<HttpResponse, AppError> {
    let order = shop
        .update_order_status(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(order)))
}
