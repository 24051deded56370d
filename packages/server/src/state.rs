use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use common::storage::ImageStore;
use common::storage::filesystem::FilesystemImageStore;
use tokio::fs;
use tracing::info;

use crate::config::{AppConfig, RepositoryBackend};
use crate::database::init_db;
use crate::repository::{ItemRepository, JsonFileItemRepository, SqlItemRepository};

/// Placeholder written as the default image when the image directory has none.
pub const BUNDLED_DEFAULT_IMAGE: &[u8] = include_bytes!("../assets/default.jpg");

/// Handles shared by every request. Handlers hold no other state.
#[derive(Clone)]
pub struct AppState {
    pub items: Arc<dyn ItemRepository>,
    pub images: Arc<dyn ImageStore>,
    pub config: AppConfig,
}

impl AppState {
    /// Build the configured repository and image store.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let items: Arc<dyn ItemRepository> = match config.storage.backend {
            RepositoryBackend::Json => Arc::new(JsonFileItemRepository::new(
                config.storage.items_file.clone(),
            )),
            RepositoryBackend::Sqlite => {
                let db = init_db(&config.storage.database.url)
                    .await
                    .context("Failed to initialize database")?;
                Arc::new(SqlItemRepository::new(db))
            }
        };

        let images = FilesystemImageStore::new(
            config.storage.images_dir.clone(),
            config.storage.max_image_size,
        )
        .await
        .context("Failed to initialize image directory")?;

        ensure_default_image(images.root(), &config.storage.default_image)
            .await
            .context("Failed to install default image")?;

        Ok(Self {
            items,
            images: Arc::new(images),
            config,
        })
    }
}

/// Write [`BUNDLED_DEFAULT_IMAGE`] as `root/name` unless a file is already
/// there. An operator-provided image is never replaced.
async fn ensure_default_image(root: &Path, name: &str) -> std::io::Result<()> {
    let path = root.join(name);
    if fs::try_exists(&path).await? {
        return Ok(());
    }

    fs::write(&path, BUNDLED_DEFAULT_IMAGE).await?;
    info!(path = %path.display(), "installed bundled default image");
    Ok(())
}
