use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;
use super::hash::ImageName;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// An opened image ready to be streamed.
pub struct ImageBlob {
    /// File name relative to the image root.
    pub name: String,
    pub size: u64,
    pub reader: BoxReader,
}

/// Content-addressed image storage.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store bytes and return the content-derived name.
    ///
    /// Only the extension of `original_name` is used.
    async fn put(&self, data: &[u8], original_name: Option<&str>)
    -> Result<ImageName, StorageError>;

    /// Open a client-requested image for reading.
    ///
    /// Fails with `InvalidPath`/`InvalidSuffix` for names that do not
    /// resolve safely, and `NotFound` when the file is absent.
    async fn open(&self, requested: &str) -> Result<ImageBlob, StorageError>;
}
