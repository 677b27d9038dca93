//! Offline availability for a fixed set of static assets: a named durable
//! cache populated at install time, consulted before the network.

pub mod manifest;
pub mod net;
pub mod store;
pub mod worker;

use thiserror::Error;

pub use manifest::Manifest;
pub use net::{HttpNetwork, Network};
pub use store::{AssetCache, AssetStore, CachedAsset, FsAssetStore};
pub use worker::{OfflineWorker, ServeOrigin};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("Invalid asset URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Fetch failed for '{path}': status {status}")]
    FetchStatus { path: String, status: u16 },
}
