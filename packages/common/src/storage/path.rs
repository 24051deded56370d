use std::path::{Component, Path, PathBuf};

use super::error::StorageError;

/// Suffixes the image endpoint is willing to serve.
pub const ACCEPTED_SUFFIXES: [&str; 2] = [".jpg", ".jpeg"];

/// Resolve a client-requested file name to a path under `root`.
///
/// The name is cleaned lexically, so the file does not need to exist. Any
/// name that is empty, absolute, or climbs out of `root` is rejected with
/// [`StorageError::InvalidPath`]; the cleaned name must end in one of
/// [`ACCEPTED_SUFFIXES`] or [`StorageError::InvalidSuffix`] is returned.
pub fn resolve(requested: &str, root: &Path) -> Result<PathBuf, StorageError> {
    let relative = clean(requested)?;

    let name = relative.to_string_lossy();
    if !ACCEPTED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
        return Err(StorageError::InvalidSuffix(requested.to_string()));
    }

    Ok(root.join(relative))
}

fn clean(requested: &str) -> Result<PathBuf, StorageError> {
    let invalid = || StorageError::InvalidPath(requested.to_string());

    if requested.contains('\0') {
        return Err(invalid());
    }

    let mut cleaned = PathBuf::new();
    for component in Path::new(requested).components() {
        match component {
            Component::Normal(part) => cleaned.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    return Err(invalid());
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(invalid()),
        }
    }

    if cleaned.as_os_str().is_empty() {
        return Err(invalid());
    }
    Ok(cleaned)
}
