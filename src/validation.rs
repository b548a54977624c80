//! Shape checks for free-text contact fields supplied by patients and staff.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::AppError;

pub const MAX_NAME_LEN: usize = 120;

// Digits with optional leading +, inner spaces or dashes; 8 to 20 characters overall.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Trims and returns a non-empty name of bounded length.
pub fn name(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LEN
        )));
    }
    Ok(value.to_string())
}

pub fn phone(value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if PHONE_RE.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(AppError::Validation(format!("'{}' is not a valid phone number", value)))
    }
}

/// Returns the email lower-cased.
pub fn email(value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if EMAIL_RE.is_match(value) {
        Ok(value.to_lowercase())
    } else {
        Err(AppError::Validation(format!("'{}' is not a valid email", value)))
    }
}
