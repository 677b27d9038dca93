use tracing::debug;

use crate::offline::{
    CacheError,
    manifest::Manifest,
    net::Network,
    store::{AssetStore, CachedAsset},
};

/// Where a served asset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeOrigin {
    Cache,
    Network,
}

/// The two-phase offline protocol: install populates the cache generation
/// named by the manifest version; serve answers requests from the cache,
/// falling back to the network.
pub struct OfflineWorker {
    store: Box<dyn AssetStore>,
    network: Box<dyn Network>,
    manifest: Manifest,
}

impl OfflineWorker {
    pub fn new(store: Box<dyn AssetStore>, network: Box<dyn Network>, manifest: Manifest) -> Self {
        Self {
            store,
            network,
            manifest,
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Fetches every manifest asset and populates the cache. All-or-nothing:
    /// any fetch failure fails the whole install and nothing is marked
    /// installed. Returns the number of assets stored.
    pub async fn install(&self) -> Result<usize, CacheError> {
        let cache = self.store.open(&self.manifest.version).await?;

        let mut assets = Vec::with_capacity(self.manifest.assets.len());
        for path in &self.manifest.assets {
            assets.push(self.network.fetch(path).await?);
        }

        cache.populate(&assets).await?;
        debug!(
            version = %self.manifest.version,
            count = assets.len(),
            "offline cache installed"
        );
        Ok(assets.len())
    }

    /// Whether the current manifest version has completed an install.
    pub async fn is_installed(&self) -> Result<bool, CacheError> {
        let cache = self.store.open(&self.manifest.version).await?;
        cache.installed().await
    }

    /// Cache generations present in the store, including stale ones left
    /// behind by earlier manifest versions.
    pub async fn generations(&self) -> Result<Vec<String>, CacheError> {
        self.store.generations().await
    }

    /// Answers one request: the cached asset if present, otherwise the
    /// network response. The network response is not written back.
    pub async fn serve(&self, path: &str) -> Result<(CachedAsset, ServeOrigin), CacheError> {
        let cache = self.store.open(&self.manifest.version).await?;

        if let Some(asset) = cache.lookup(path).await? {
            debug!(path, "serving from cache");
            return Ok((asset, ServeOrigin::Cache));
        }

        debug!(path, "cache miss, fetching from network");
        let asset = self.network.fetch(path).await?;
        Ok((asset, ServeOrigin::Network))
    }
}
