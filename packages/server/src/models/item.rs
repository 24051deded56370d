use axum::body::Bytes;
use serde::{Deserialize, Serialize};

use super::shared::{Validate, require_non_blank};
use crate::error::AppError;
use crate::repository::Item;

/// Image part of an add-item form.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Client-side file name; only its extension is used.
    pub file_name: Option<String>,
    pub data: Bytes,
}

/// Parsed `POST /items` form.
#[derive(Debug, Clone, Default)]
pub struct AddItemRequest {
    pub name: String,
    pub category: String,
    pub image: Option<UploadedImage>,
}

impl Validate for AddItemRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_blank("name", &self.name)?;
        require_non_blank("category", &self.category)
    }
}

/// Query string of `GET /items/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
}

impl SearchQuery {
    pub fn keyword(&self) -> &str {
        self.keyword.as_deref().unwrap_or_default()
    }
}

impl Validate for SearchQuery {
    fn validate(&self) -> Result<(), AppError> {
        require_non_blank("keyword", self.keyword())
    }
}

/// Path of `GET /images/{filename}`.
#[derive(Debug)]
pub struct GetImageRequest {
    pub filename: String,
}

impl Validate for GetImageRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.filename.is_empty() {
            return Err(AppError::Validation("filename is required".into()));
        }
        Ok(())
    }
}

/// `{"items": [...]}`
#[derive(Debug, Serialize)]
pub struct ItemListResponse {
    pub items: Vec<Item>,
}
