//! Versioned object storage seam and its filesystem implementation.
//!
//! Production deployments point this at an S3-compatible bucket; the
//! directory-backed implementation below keeps the same key/prefix/mtime
//! semantics for local runs and tests.

use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// One stored object under a prefix.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub last_modified: SystemTime,
}

/// Versioned blob storage: upload, list-by-prefix, delete, stable URLs.
///
/// Keys use `/` separators and prefixes end with `/` per the artifact key
/// convention.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file under `key` and return a retrievable URL
    async fn put_file(&self, local: &Path, key: &str, content_type: &str) -> Result<String>;

    /// List every object whose key starts with `prefix`
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>>;

    /// Delete one object by key
    async fn delete(&self, key: &str) -> Result<()>;

    /// Stable retrievable URL for a key
    fn url_for(&self, key: &str) -> String;
}

/// Directory-backed [`ObjectStore`].
///
/// Objects are plain files below a root directory; last-modified ordering
/// comes from filesystem mtimes. With a public base URL configured the
/// returned URLs are `{base}/{key}`, otherwise `file://` paths.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
    public_base: Option<String>,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            public_base: None,
        }
    }

    /// Serve URLs from a public base instead of `file://` paths
    pub fn with_public_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.public_base = Some(base.trim_end_matches('/').to_string());
        self
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put_file(&self, local: &Path, key: &str, _content_type: &str) -> Result<String> {
        let dest = self.root.join(key);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::storage(key, format!("cannot create prefix dir: {e}")))?;
        }
        std::fs::copy(local, &dest)
            .map_err(|e| Error::storage(key, format!("cannot store object: {e}")))?;

        debug!(key, "stored object");
        Ok(self.url_for(key))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>> {
        let dir = self.root.join(prefix);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut objects = Vec::new();
        for entry in WalkDir::new(&dir) {
            let entry = entry
                .map_err(|e| Error::storage(prefix, format!("cannot list prefix: {e}")))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| Error::storage(prefix, format!("key outside store root: {e}")))?;
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let last_modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            objects.push(StoredObject { key, last_modified });
        }
        Ok(objects)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        std::fs::remove_file(self.root.join(key))
            .map_err(|e| Error::storage(key, format!("cannot delete object: {e}")))
    }

    fn url_for(&self, key: &str) -> String {
        match &self.public_base {
            Some(base) => format!("{base}/{key}"),
            None => format!("file://{}", self.root.join(key).display()),
        }
    }
}

/// Delete the oldest objects under a prefix, keeping the `keep_last` most
/// recently modified. Individual delete failures are logged and skipped so
/// one stuck object cannot block future publishes.
///
/// Returns the number of objects deleted.
pub async fn prune_prefix(
    store: &dyn ObjectStore,
    prefix: &str,
    keep_last: usize,
) -> Result<usize> {
    let mut objects = store.list(prefix).await?;
    if objects.len() <= keep_last {
        return Ok(0);
    }

    // Newest first; key as a tie-break keeps the ordering deterministic
    objects.sort_by(|a, b| {
        b.last_modified
            .cmp(&a.last_modified)
            .then_with(|| b.key.cmp(&a.key))
    });

    let stale = objects.split_off(keep_last);
    info!(
        prefix,
        keeping = keep_last,
        deleting = stale.len(),
        "pruning old artifact versions"
    );

    let mut deleted = 0;
    for object in stale {
        match store.delete(&object.key).await {
            Ok(()) => deleted += 1,
            Err(e) => warn!(key = object.key, error = %e, "failed to delete old version"),
        }
    }
    Ok(deleted)
}
