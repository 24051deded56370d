use serde::{Deserialize, Serialize};

use super::error::{RepositoryError, RepositoryResult};

/// A listed item as stored by a repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Assigned by the repository on insert.
    pub id: i64,
    pub name: String,
    pub category: String,
    /// Only the relational backend tracks categories as rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    pub image_name: String,
}

/// Payload for [`ItemRepository::insert`](super::ItemRepository::insert).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub image_name: String,
}

impl NewItem {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        image_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            image_name: image_name.into(),
        }
    }

    /// Both `name` and `category` must be non-blank.
    pub fn validate(&self) -> RepositoryResult<()> {
        if self.name.trim().is_empty() {
            return Err(RepositoryError::Validation("name is required".into()));
        }
        if self.category.trim().is_empty() {
            return Err(RepositoryError::Validation("category is required".into()));
        }
        Ok(())
    }

    pub(crate) fn into_item(self, id: i64, category_id: Option<i64>) -> Item {
        Item {
            id,
            name: self.name,
            category: self.category,
            category_id,
            image_name: self.image_name,
        }
    }
}
