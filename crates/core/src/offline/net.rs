use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::offline::{CacheError, store::CachedAsset};

/// The network fetch primitive the worker falls back to.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<CachedAsset, CacheError>;
}

/// HTTP implementation: joins relative asset paths against a base URL and
/// fails on non-success statuses.
pub struct HttpNetwork {
    client: reqwest::Client,
    base: Url,
}

impl HttpNetwork {
    pub fn new(base_url: &str) -> Result<Self, CacheError> {
        Ok(Self {
            client: reqwest::Client::new(),
            base: Url::parse(base_url)?,
        })
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, path: &str) -> Result<CachedAsset, CacheError> {
        let url = self.base.join(path)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::FetchStatus {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = response.bytes().await?.to_vec();

        Ok(CachedAsset {
            path: path.to_string(),
            content_type,
            body,
        })
    }
}
