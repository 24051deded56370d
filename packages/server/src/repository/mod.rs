//! Item persistence.
//!
//! One [`ItemRepository`] interface with two production backends, chosen at
//! startup by `storage.backend`: a flat JSON document
//! ([`JsonFileItemRepository`]) and a SQLite database through sea-orm
//! ([`SqlItemRepository`]). [`InMemoryItemRepository`] is a fake with the
//! same semantics for tests.

mod error;
mod item;
mod json_file;
mod memory;
mod sql;

use async_trait::async_trait;

pub use error::{RepositoryError, RepositoryResult};
pub use item::{Item, NewItem};
pub use json_file::JsonFileItemRepository;
pub use memory::InMemoryItemRepository;
pub use sql::SqlItemRepository;

/// Storage for listed items.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Validate and persist a new item, returning it with its assigned id.
    async fn insert(&self, item: NewItem) -> RepositoryResult<Item>;

    /// All items in insertion order.
    async fn list(&self) -> RepositoryResult<Vec<Item>>;

    /// Fails with [`RepositoryError::NotFound`] when no item has `id`.
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Item>;

    /// Items whose name contains `keyword` (case-sensitive).
    async fn search_by_name(&self, keyword: &str) -> RepositoryResult<Vec<Item>>;
}
