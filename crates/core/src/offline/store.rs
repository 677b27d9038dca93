use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::offline::CacheError;

/// One stored asset: the request path it answers, and the response payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAsset {
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// A durable cache service holding named cache generations.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Opens (creating if needed) the cache generation with the given name.
    async fn open(&self, name: &str) -> Result<Box<dyn AssetCache>, CacheError>;

    /// Names of the generations currently present in the store.
    async fn generations(&self) -> Result<Vec<String>, CacheError>;
}

/// One named cache generation.
#[async_trait]
pub trait AssetCache: Send + Sync {
    /// Looks up an asset by exact request path.
    async fn lookup(&self, path: &str) -> Result<Option<CachedAsset>, CacheError>;

    /// Stores a single asset.
    async fn put(&self, asset: &CachedAsset) -> Result<(), CacheError>;

    /// Bulk-populates the cache from a fetched asset list. The completion
    /// marker is written only after every asset is stored, so a generation
    /// interrupted mid-populate never reports itself installed.
    async fn populate(&self, assets: &[CachedAsset]) -> Result<(), CacheError>;

    /// Whether a populate pass completed for this generation.
    async fn installed(&self) -> Result<bool, CacheError>;
}

const MARKER_FILE: &str = ".installed";

#[derive(Serialize, Deserialize)]
struct EntryMeta {
    path: String,
    content_type: Option<String>,
}

/// Filesystem-backed store: one directory per generation, two files per
/// asset (payload and JSON metadata), keyed by the md5 of the asset path.
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn open(&self, name: &str) -> Result<Box<dyn AssetCache>, CacheError> {
        let dir = self.root.join(name);
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Box::new(FsAssetCache { dir }))
    }

    async fn generations(&self) -> Result<Vec<String>, CacheError> {
        let mut names = Vec::new();
        if !self.root.exists() {
            return Ok(names);
        }
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

struct FsAssetCache {
    dir: PathBuf,
}

impl FsAssetCache {
    fn key(path: &str) -> String {
        format!("{:x}", md5::compute(path.as_bytes()))
    }

    fn body_file(&self, path: &str) -> PathBuf {
        self.dir.join(Self::key(path))
    }

    fn meta_file(&self, path: &str) -> PathBuf {
        self.dir.join(format!("{}.json", Self::key(path)))
    }

    async fn write_entry(&self, asset: &CachedAsset) -> Result<(), CacheError> {
        let meta = EntryMeta {
            path: asset.path.clone(),
            content_type: asset.content_type.clone(),
        };
        tokio::fs::write(self.body_file(&asset.path), &asset.body).await?;
        tokio::fs::write(self.meta_file(&asset.path), serde_json::to_vec(&meta)?).await?;
        Ok(())
    }
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, CacheError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[async_trait]
impl AssetCache for FsAssetCache {
    async fn lookup(&self, path: &str) -> Result<Option<CachedAsset>, CacheError> {
        let Some(meta_bytes) = read_optional(&self.meta_file(path)).await? else {
            return Ok(None);
        };
        let Some(body) = read_optional(&self.body_file(path)).await? else {
            return Ok(None);
        };

        let meta: EntryMeta = serde_json::from_slice(&meta_bytes)?;
        Ok(Some(CachedAsset {
            path: meta.path,
            content_type: meta.content_type,
            body,
        }))
    }

    async fn put(&self, asset: &CachedAsset) -> Result<(), CacheError> {
        self.write_entry(asset).await
    }

    async fn populate(&self, assets: &[CachedAsset]) -> Result<(), CacheError> {
        for asset in assets {
            self.write_entry(asset).await?;
        }
        tokio::fs::write(self.dir.join(MARKER_FILE), b"").await?;
        Ok(())
    }

    async fn installed(&self) -> Result<bool, CacheError> {
        Ok(self.dir.join(MARKER_FILE).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(path: &str, body: &str) -> CachedAsset {
        CachedAsset {
            path: path.to_string(),
            content_type: Some("text/plain".to_string()),
            body: body.as_bytes().to_vec(),
        }
    }

    #[tokio::test]
    async fn test_put_and_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsAssetStore::new(tmp.path());
        let cache = store.open("repl-v1").await.unwrap();

        cache.put(&asset("app.js", "console")).await.unwrap();

        let found = cache.lookup("app.js").await.unwrap().unwrap();
        assert_eq!(found.path, "app.js");
        assert_eq!(found.content_type.as_deref(), Some("text/plain"));
        assert_eq!(found.body, b"console");

        assert!(cache.lookup("missing.js").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_populate_sets_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsAssetStore::new(tmp.path());
        let cache = store.open("repl-v1").await.unwrap();

        assert!(!cache.installed().await.unwrap());

        cache
            .populate(&[asset(".", "<html>"), asset("app.css", "body {}")])
            .await
            .unwrap();

        assert!(cache.installed().await.unwrap());
        assert!(cache.lookup(".").await.unwrap().is_some());
        assert!(cache.lookup("app.css").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_put_alone_does_not_mark_installed() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsAssetStore::new(tmp.path());
        let cache = store.open("repl-v1").await.unwrap();

        cache.put(&asset("app.js", "x")).await.unwrap();
        assert!(!cache.installed().await.unwrap());
    }

    #[tokio::test]
    async fn test_generations_are_independent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsAssetStore::new(tmp.path());

        let v1 = store.open("repl-v1").await.unwrap();
        v1.populate(&[asset("app.js", "old")]).await.unwrap();

        let v2 = store.open("repl-v2").await.unwrap();
        assert!(!v2.installed().await.unwrap());
        assert!(v2.lookup("app.js").await.unwrap().is_none());

        // the old generation stays on disk, visible via the store
        assert_eq!(
            store.generations().await.unwrap(),
            vec!["repl-v1".to_string(), "repl-v2".to_string()]
        );
    }
}
