use actix_web::web;

use crate::error::AppError;
use crate::handlers;
use crate::services::AppServices;

/// Register service data, body limits and every route under `/api/v1`.
pub fn configure(services: AppServices) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(services.campaigns))
            .app_data(web::Data::new(services.shop))
            .app_data(web::Data::new(services.health))
            .app_data(json_config())
            .app_data(query_config())
            .service(
                web::scope("/api/v1")
                    .service(handlers::health::health_check)
                    .service(
                        web::scope("/campaigns")
                            .service(handlers::campaigns::list_campaigns)
                            .service(handlers::campaigns::create_campaign)
                            .service(handlers::campaigns::get_campaign)
                            .service(handlers::campaigns::update_campaign)
                            .service(handlers::campaigns::delete_campaign)
                            .service(handlers::campaigns::relation_status)
                            .service(handlers::campaigns::toggle_like)
                            .service(handlers::campaigns::toggle_participation)
                            .service(handlers::campaigns::list_reviews)
                            .service(handlers::campaigns::create_review)
                            .service(handlers::campaigns::update_review)
                            .service(handlers::campaigns::delete_review)
                            .service(handlers::campaigns::list_comments)
                            .service(handlers::campaigns::create_comment)
                            .service(handlers::campaigns::update_comment)
                            .service(handlers::campaigns::delete_comment)
                            .service(handlers::campaigns::contribute_funding),
                    )
                    .service(
                        web::scope("/shop")
                            .service(handlers::shop::create_category)
                            .service(handlers::shop::list_categories)
                            .service(handlers::shop::list_category_products)
                            .service(handlers::shop::create_product)
                            .service(handlers::shop::get_product)
                            .service(handlers::shop::restock_product)
                            .service(handlers::shop::place_order)
                            .service(handlers::shop::get_order)
                            .service(handlers::shop::update_order_status),
                    ),
            );
    }
}

/// Malformed JSON bodies surface as validation errors rather than plain-text 400s.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}
