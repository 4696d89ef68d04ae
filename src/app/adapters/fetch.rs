//! Feed materialization: turn a named input into a readable local file
//!
//! Supplier feeds arrive either as plain delimited files or gzip-compressed.
//! Compressed inputs are decompressed into a scratch directory; every file
//! created here is registered with a [`TempFiles`] guard so it is removed
//! when the run ends, successful or not. Caller-provided plain files are
//! never registered and never deleted.

use crate::{Error, Result};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Scope guard for files materialized during one pipeline run.
///
/// Dropping the guard removes every registered file, best-effort; a failed
/// removal is logged and never surfaces as an error.
#[derive(Debug, Default)]
pub struct TempFiles {
    paths: Vec<PathBuf>,
}

impl TempFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file for removal when the guard drops.
    pub fn register(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!(file = %path.display(), "removed temp feed file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "failed to remove temp feed file")
                }
            }
        }
    }
}

/// Delivers a named feed resource as a local file path.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Materialize `resource` into a readable local file, registering any
    /// file this call created with `temps`.
    async fn materialize(&self, resource: &str, temps: &mut TempFiles) -> Result<PathBuf>;
}

/// Fetcher for resources already present on the local filesystem.
///
/// Plain `.csv` files are passed through untouched; `.gz` files are
/// decompressed into the scratch directory. Anything else is a fetch
/// error rather than a silently misparsed feed.
pub struct LocalFetcher {
    temp_dir: PathBuf,
}

impl LocalFetcher {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    fn decompress(&self, source: &Path, resource: &str, temps: &mut TempFiles) -> Result<PathBuf> {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| Error::fetch(resource, "compressed file has no name"))?;
        let target = self.temp_dir.join(stem);

        let input = File::open(source).map_err(|e| {
            Error::fetch(resource, format!("cannot open compressed feed: {e}"))
        })?;
        let mut decoder = GzDecoder::new(input);
        let mut output = File::create(&target)
            .map_err(|e| Error::fetch(resource, format!("cannot create temp file: {e}")))?;
        temps.register(&target);
        std::io::copy(&mut decoder, &mut output)
            .map_err(|e| Error::fetch(resource, format!("decompression failed: {e}")))?;

        debug!(resource, target = %target.display(), "decompressed feed");
        Ok(target)
    }
}

#[async_trait]
impl Fetcher for LocalFetcher {
    async fn materialize(&self, resource: &str, temps: &mut TempFiles) -> Result<PathBuf> {
        let source = Path::new(resource);
        if !source.is_file() {
            return Err(Error::fetch(resource, "feed file does not exist"));
        }

        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        match extension.as_deref() {
            Some("gz") => self.decompress(source, resource, temps),
            Some("csv") => Ok(source.to_path_buf()),
            _ => Err(Error::fetch(
                resource,
                "unsupported feed file type, expected .csv or .gz",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_gz(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let file = File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap();
        path
    }

    #[tokio::test]
    async fn plain_file_is_passed_through() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feed.csv");
        std::fs::write(&path, "AB1;4;10,00\n").unwrap();

        let fetcher = LocalFetcher::new(dir.path());
        let mut temps = TempFiles::new();
        let local = fetcher
            .materialize(path.to_str().unwrap(), &mut temps)
            .await
            .unwrap();

        assert_eq!(local, path);
        assert!(temps.is_empty());
    }

    #[tokio::test]
    async fn gz_feed_is_decompressed_into_scratch() {
        let feeds = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let gz = write_gz(&feeds, "feed.csv.gz", "AB1;4;10,00\n");

        let fetcher = LocalFetcher::new(scratch.path());
        let mut temps = TempFiles::new();
        let local = fetcher
            .materialize(gz.to_str().unwrap(), &mut temps)
            .await
            .unwrap();

        assert_eq!(local, scratch.path().join("feed.csv"));
        assert_eq!(std::fs::read_to_string(&local).unwrap(), "AB1;4;10,00\n");
        assert_eq!(temps.len(), 1);
    }

    #[tokio::test]
    async fn guard_removes_registered_files_on_drop() {
        let scratch = TempDir::new().unwrap();
        let feeds = TempDir::new().unwrap();
        let gz = write_gz(&feeds, "feed.csv.gz", "data\n");

        let fetcher = LocalFetcher::new(scratch.path());
        let local = {
            let mut temps = TempFiles::new();
            let local = fetcher
                .materialize(gz.to_str().unwrap(), &mut temps)
                .await
                .unwrap();
            assert!(local.exists());
            local
        };

        // Guard dropped, decompressed copy gone, original untouched
        assert!(!local.exists());
        assert!(gz.exists());
    }

    #[tokio::test]
    async fn unsupported_extension_is_a_fetch_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feed.xlsx");
        std::fs::write(&path, "not a feed\n").unwrap();

        let fetcher = LocalFetcher::new(dir.path());
        let mut temps = TempFiles::new();
        let err = fetcher
            .materialize(path.to_str().unwrap(), &mut temps)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Fetch { .. }));
        assert!(temps.is_empty());
    }

    #[tokio::test]
    async fn extension_check_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("FEED.CSV");
        std::fs::write(&path, "AB1;4;10,00\n").unwrap();

        let fetcher = LocalFetcher::new(dir.path());
        let mut temps = TempFiles::new();
        let local = fetcher
            .materialize(path.to_str().unwrap(), &mut temps)
            .await
            .unwrap();
        assert_eq!(local, path);
    }

    #[tokio::test]
    async fn missing_feed_is_a_fetch_error() {
        let scratch = TempDir::new().unwrap();
        let fetcher = LocalFetcher::new(scratch.path());
        let mut temps = TempFiles::new();

        let err = fetcher
            .materialize("/no/such/feed.csv", &mut temps)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }
}
