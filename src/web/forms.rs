//! Form field parsing helpers.
//!
//! HTML forms submit everything as strings; these helpers turn the raw
//! fields into domain values with [`AppError::Validation`] on bad input.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Trims a text field, mapping empty strings to `None`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Requires a non-empty text field.
pub fn required(field: &'static str, value: Option<String>) -> AppResult<String> {
    non_empty(value).ok_or(AppError::Validation {
        field,
        message: "is required".to_string(),
    })
}

/// Parses a required `YYYY-MM-DD` date field.
pub fn parse_date(field: &'static str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| AppError::Validation {
        field,
        message: format!("'{}' is not a valid date", value.trim()),
    })
}

/// Parses an optional date field.
pub fn parse_opt_date(field: &'static str, value: Option<String>) -> AppResult<Option<NaiveDate>> {
    match non_empty(value) {
        Some(text) => parse_date(field, &text).map(Some),
        None => Ok(None),
    }
}

/// Parses a required decimal field.
pub fn parse_decimal(field: &'static str, value: &str) -> AppResult<Decimal> {
    Decimal::from_str(value.trim()).map_err(|_| AppError::Validation {
        field,
        message: format!("'{}' is not a valid number", value.trim()),
    })
}

/// Parses a required decimal field that must not be negative.
pub fn parse_non_negative(field: &'static str, value: &str) -> AppResult<Decimal> {
    let amount = parse_decimal(field, value)?;
    if amount.is_sign_negative() {
        return Err(AppError::Validation {
            field,
            message: "cannot be negative".to_string(),
        });
    }
    Ok(amount)
}
