use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ItemRepository;
use super::error::{RepositoryError, RepositoryResult};
use super::item::{Item, NewItem};

/// In-memory implementation of [`ItemRepository`] for tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryItemRepository {
    items: Arc<RwLock<Vec<Item>>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn insert(&self, item: NewItem) -> RepositoryResult<Item> {
        item.validate()?;

        let mut items = self.items.write().await;
        let id = items.last().map_or(1, |last| last.id + 1);
        let item = item.into_item(id, None);
        items.push(item.clone());
        Ok(item)
    }

    async fn list(&self) -> RepositoryResult<Vec<Item>> {
        Ok(self.items.read().await.clone())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Item> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn search_by_name(&self, keyword: &str) -> RepositoryResult<Vec<Item>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|item| item.name.contains(keyword))
            .cloned()
            .collect())
    }
}
