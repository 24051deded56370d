use std::fmt;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Extension used unless the upload is explicitly a `.jpeg`.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// SHA-256 digest of an image payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn compute(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Lowercase hex encoding of the digest.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.to_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Stored image file name: `<sha256 hex>.jpg` or `<sha256 hex>.jpeg`.
///
/// Nothing but the `.jpeg` spelling is taken from client input, so every
/// stored name is one the image endpoint will serve.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ImageName {
    hash: ContentHash,
    extension: &'static str,
}

impl ImageName {
    /// Build the stored name for `data`. Keeps `jpeg` when `original_name`
    /// ends in `.jpeg` (any case); everything else is stored as `jpg`.
    pub fn for_upload(data: &[u8], original_name: Option<&str>) -> Self {
        let is_jpeg = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jpeg"));

        Self {
            hash: ContentHash::compute(data),
            extension: if is_jpeg { "jpeg" } else { DEFAULT_EXTENSION },
        }
    }

    pub fn extension(&self) -> &str {
        self.extension
    }
}

impl fmt::Debug for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageName({self})")
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.hash, self.extension)
    }
}
