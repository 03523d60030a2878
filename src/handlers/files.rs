//! Filesystem-backed file transfer confined to a root directory.
//!
//! Every name is resolved to a canonical path and checked against the
//! canonical root before any file content is touched. Symlinks are resolved
//! by the OS, so a link pointing outside the root is rejected the same way
//! a `..` traversal is.
//!
//! Names arrive as the raw bytes of the request target and are turned into
//! paths without any decoding, so a file is stored under exactly the name
//! the client sent.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::HttpError;

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `root`, which must exist.
    pub async fn open(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = fs::canonicalize(root.as_ref()).await?;
        Ok(Self { root })
    }

    /// Canonical root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `name` under the root, rejecting anything that lands outside.
    pub async fn resolve(&self, name: impl AsRef<[u8]>) -> Result<PathBuf, HttpError> {
        let name = name.as_ref();
        let candidate = self.root.join(path_from_bytes(name));
        let resolved = canonicalize_lenient(&candidate).await?;

        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            tracing::warn!(
                name = %String::from_utf8_lossy(name),
                resolved = %resolved.display(),
                "Rejected path outside file root"
            );
            Err(HttpError::PathEscape(resolved))
        }
    }

    /// Reads a regular file under the root.
    pub async fn read(&self, name: impl AsRef<[u8]>) -> Result<Vec<u8>, HttpError> {
        let path = self.resolve(name).await?;

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(HttpError::FileNotFound(path)),
            Err(e) if is_missing(&e) => return Err(HttpError::FileNotFound(path)),
            Err(e) => return Err(e.into()),
        }

        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if is_missing(&e) => Err(HttpError::FileNotFound(path)),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes `contents` under the root, creating parent directories and
    /// overwriting any existing file.
    pub async fn write(
        &self,
        name: impl AsRef<[u8]>,
        contents: &[u8],
    ) -> Result<PathBuf, HttpError> {
        let path = self.resolve(name).await?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, contents).await?;

        Ok(path)
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

// Non-unix paths are not arbitrary bytes; invalid UTF-8 is replaced.
#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

fn is_missing(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// Canonicalizes a path whose trailing components may not exist yet.
///
/// The deepest existing ancestor is canonicalized and the missing names are
/// appended to it. A missing component that is `..`, or that exists only as
/// a dangling symlink, cannot be resolved safely and counts as an escape.
async fn canonicalize_lenient(path: &Path) -> Result<PathBuf, HttpError> {
    let mut existing = path.to_path_buf();
    let mut missing: Vec<OsString> = Vec::new();

    loop {
        match fs::canonicalize(&existing).await {
            Ok(mut base) => {
                for name in missing.iter().rev() {
                    base.push(name);
                }
                return Ok(base);
            }
            Err(e) if is_missing(&e) => {
                if fs::symlink_metadata(&existing).await.is_ok() {
                    return Err(HttpError::PathEscape(path.to_path_buf()));
                }

                let Some(name) = existing.file_name() else {
                    return Err(HttpError::PathEscape(path.to_path_buf()));
                };
                missing.push(name.to_os_string());

                if !existing.pop() {
                    return Err(HttpError::PathEscape(path.to_path_buf()));
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}
