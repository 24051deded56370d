use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use super::ItemRepository;
use super::error::{RepositoryError, RepositoryResult};
use super::item::{Item, NewItem};

/// On-disk document: `{"items": [...]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ItemsDocument {
    #[serde(default)]
    items: Vec<Item>,
}

/// Item repository backed by a single JSON file.
///
/// Every insert rewrites the whole document. Writers are serialized by an
/// internal mutex so overlapping inserts cannot drop each other's items, and
/// the new document is written to a sibling temp file and renamed over the
/// target, so readers see either the old or the new collection. The mutex
/// only covers this process; two processes sharing one file can still lose
/// updates.
pub struct JsonFileItemRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileItemRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> RepositoryResult<ItemsDocument> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ItemsDocument::default());
            }
            Err(e) => return Err(e.into()),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(ItemsDocument::default());
        }
        Ok(serde_json::from_slice(&raw)?)
    }

    async fn save(&self, document: &ItemsDocument) -> RepositoryResult<()> {
        let data = serde_json::to_vec_pretty(document)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(format!(".{}.tmp", uuid::Uuid::new_v4()));
        let temp_path = PathBuf::from(temp_name);

        if let Err(e) = fs::write(&temp_path, &data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for JsonFileItemRepository {
    async fn insert(&self, item: NewItem) -> RepositoryResult<Item> {
        item.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;

        let id = document.items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let item = item.into_item(id, None);
        document.items.push(item.clone());

        self.save(&document).await?;
        debug!(item_id = id, path = %self.path.display(), "item appended");
        Ok(item)
    }

    async fn list(&self) -> RepositoryResult<Vec<Item>> {
        Ok(self.load().await?.items)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Item> {
        self.load()
            .await?
            .items
            .into_iter()
            .find(|item| item.id == id)
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn search_by_name(&self, keyword: &str) -> RepositoryResult<Vec<Item>> {
        Ok(self
            .load()
            .await?
            .items
            .into_iter()
            .filter(|item| item.name.contains(keyword))
            .collect())
    }
}
