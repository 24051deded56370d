mod error;
mod hash;
mod path;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use hash::ImageName;
pub use path::{ACCEPTED_SUFFIXES, resolve};
pub use traits::{BoxReader, ImageBlob, ImageStore};
