use std::fmt;

/// Errors that can occur while storing or resolving images.
#[derive(Debug)]
pub enum StorageError {
    /// The requested image does not exist on disk.
    NotFound(String),
    /// An I/O error occurred.
    Io(std::io::Error),
    /// The configured image root directory is missing.
    MissingRoot(String),
    /// The requested name escapes the image root or is not a plain path.
    InvalidPath(String),
    /// The requested name does not end in an accepted image suffix.
    InvalidSuffix(String),
    /// The upload exceeds the configured size limit.
    SizeLimitExceeded { actual: u64, limit: u64 },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "image not found: {name}"),
            Self::Io(err) => write!(f, "storage IO error: {err}"),
            Self::MissingRoot(root) => write!(f, "image directory does not exist: {root}"),
            Self::InvalidPath(name) => write!(f, "invalid image path: {name}"),
            Self::InvalidSuffix(name) => {
                write!(f, "image path does not end with .jpg or .jpeg: {name}")
            }
            Self::SizeLimitExceeded { actual, limit } => {
                write!(f, "image exceeds size limit ({actual} > {limit} bytes)")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
