use campaign_platform_shared::constants::{ERROR_MONEY_RANGE, ERROR_MONEY_SCALE};
use rust_decimal::Decimal;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::error::AppError;

/// Flatten validator output into a single `field: message` line.
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .errors()
        .iter()
        .flat_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(list) => list
                .iter()
                .map(|error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    if *field == "__all__" {
                        message
                    } else {
                        format!("{}: {}", field, message)
                    }
                })
                .collect::<Vec<_>>(),
            ValidationErrorsKind::Struct(_) | ValidationErrorsKind::List(_) => {
                vec![format!("{}: invalid", field)]
            }
        })
        .collect();

    // HashMap order is unstable
    parts.sort();
    parts.join("; ")
}

/// Money amounts arrive as decimals, which the derive macros cannot range-check.
pub fn ensure_positive(field: &str, value: Decimal) -> Result<(), AppError> {
    if value <= Decimal::ZERO {
        return Err(AppError::Validation(format!("{} must be positive", field)));
    }
    Ok(())
}

pub fn ensure_non_negative(field: &str, value: Decimal) -> Result<(), AppError> {
    if value < Decimal::ZERO {
        return Err(AppError::Validation(format!("{} cannot be negative", field)));
    }
    Ok(())
}

/// Money columns are NUMERIC(20, 2): at most 18 integer digits, 2 fractional.
const MONEY_SCALE: u32 = 2;
const MONEY_LIMIT: i64 = 1_000_000_000_000_000_000;

/// Reject amounts the money columns cannot hold exactly.
pub fn ensure_money(field: &str, value: Decimal) -> Result<(), AppError> {
    if value.abs() >= Decimal::from(MONEY_LIMIT) {
        return Err(AppError::Validation(format!("{} {}", field, ERROR_MONEY_RANGE)));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(AppError::Validation(format!("{} {}", field, ERROR_MONEY_SCALE)));
    }
    Ok(())
}

/// Result of checked money arithmetic, still within the storable range.
pub fn checked_money(field: &str, value: Option<Decimal>) -> Result<Decimal, AppError> {
    let value = value
        .ok_or_else(|| AppError::Validation(format!("{} {}", field, ERROR_MONEY_RANGE)))?;
    ensure_money(field, value)?;
    Ok(value)
}
