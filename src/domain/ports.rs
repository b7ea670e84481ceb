use crate::domain::model::TokenRange;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn contract_address(&self) -> &str;
    fn token_range(&self) -> Result<TokenRange>;
    fn api_key(&self) -> Option<&str>;
    fn timeout(&self) -> Option<Duration>;
    fn output_path(&self) -> Option<&str>;
}

/// One GET per call; the full response is awaited before returning.
#[async_trait]
pub trait AssetTransport: Send + Sync {
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value>;
}
