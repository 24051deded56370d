use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;
use tracing::debug;

use super::error::StorageError;
use super::hash::ImageName;
use super::path::resolve;
use super::traits::{ImageBlob, ImageStore};

const TEMP_DIR: &str = ".tmp";

/// Filesystem-backed content-addressed image store.
///
/// Images live flat under the root as `{root}/{sha256 hex}.{ext}`. Writes
/// land in `{root}/.tmp` first and are renamed into place, so readers never
/// observe a partially written image. A second upload of identical bytes
/// finds the existing file and returns its name without rewriting it.
pub struct FilesystemImageStore {
    root: PathBuf,
    max_size: u64,
}

impl FilesystemImageStore {
    /// Create the store, creating the root directory if needed.
    pub async fn new(root: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(root.join(TEMP_DIR)).await?;
        Ok(Self { root, max_size })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn image_path(&self, name: &ImageName) -> PathBuf {
        self.root.join(name.to_string())
    }

    fn temp_path(&self) -> PathBuf {
        self.root
            .join(TEMP_DIR)
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn put(
        &self,
        data: &[u8],
        original_name: Option<&str>,
    ) -> Result<ImageName, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        if !fs::try_exists(&self.root).await? {
            return Err(StorageError::MissingRoot(self.root.display().to_string()));
        }

        let name = ImageName::for_upload(data, original_name);
        let image_path = self.image_path(&name);

        if fs::try_exists(&image_path).await? {
            debug!(image = %name, "image already stored");
            return Ok(name);
        }

        fs::create_dir_all(self.root.join(TEMP_DIR)).await?;
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &image_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!(image = %name, size = data.len(), "stored image");
        Ok(name)
    }

    async fn open(&self, requested: &str) -> Result<ImageBlob, StorageError> {
        let path = resolve(requested, &self.root)?;

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(requested.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let meta = file.metadata().await?;
        if !meta.is_file() {
            return Err(StorageError::NotFound(requested.to_string()));
        }

        let name = path
            .strip_prefix(&self.root)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| requested.to_string());

        Ok(ImageBlob {
            name,
            size: meta.len(),
            reader: Box::new(BufReader::new(file)),
        })
    }
}
