use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not recruiting: {0}")]
    NotRecruiting(String),

    #[error("Not ended: {0}")]
    NotEnded(String),

    #[error("Capacity exceeded: campaign allows {capacity} participants")]
    CapacityExceeded { capacity: i32 },

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code returned in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::NotRecruiting(_) => "not_recruiting",
            AppError::NotEnded(_) => "not_ended",
            AppError::CapacityExceeded { .. } => "capacity_exceeded",
            AppError::InsufficientStock { .. } => "insufficient_stock",
            AppError::Authentication(_) => "authentication_error",
            AppError::Authorization(_) => "authorization_error",
            AppError::NotFound(_) => "not_found",
            _ => "internal_server_error",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(crate::utils::validation::describe_errors(&errors))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::CapacityExceeded { .. }
            | AppError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::NotRecruiting(_) | AppError::NotEnded(_) | AppError::Authorization(_) => {
                StatusCode::FORBIDDEN
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Validation(msg)
            | AppError::NotRecruiting(msg)
            | AppError::NotEnded(msg)
            | AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::CapacityExceeded { .. } => {
                campaign_platform_shared::constants::ERROR_CAPACITY_EXCEEDED.to_string()
            }
            AppError::InsufficientStock { .. } => {
                campaign_platform_shared::constants::ERROR_INSUFFICIENT_STOCK.to_string()
            }
            _ => "An internal server error occurred".to_string(),
        };

        let (requested, available) = match self {
            AppError::InsufficientStock { requested, available } => {
                (Some(*requested), Some(*available))
            }
            _ => (None, None),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.code().to_string(),
            message,
            requested,
            available,
        })
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    requested: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<i32>,
}
