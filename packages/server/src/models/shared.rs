use serde::Serialize;

use crate::error::AppError;

/// Request types check their own invariants before any side effect.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

/// `{"message": "..."}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reject a missing or blank field with `"<field> is required"`.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}
