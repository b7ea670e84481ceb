use crate::utils::error::{RefreshError, Result};
use crate::utils::validation::{validate_path_segment, validate_url};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.opensea.io";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xd8b4359143eda5b2d763e127ed27c77addbc47d3";

/// Builds `<base>/api/v1/asset/<contract>/<token_id>/?force_update=true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEndpoint {
    base_url: String,
    contract_address: String,
}

impl AssetEndpoint {
    pub fn new(base_url: &str, contract_address: &str) -> Result<Self> {
        validate_url("base_url", base_url)?;
        validate_path_segment("contract_address", contract_address)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            contract_address: contract_address.to_string(),
        })
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }

    pub fn token_url(&self, token_id: u64) -> Result<Url> {
        let raw = format!(
            "{}/api/v1/asset/{}/{}/?force_update=true",
            self.base_url, self.contract_address, token_id
        );

        Url::parse(&raw).map_err(|e| RefreshError::InvalidConfigValue {
            field: "base_url".to_string(),
            value: raw,
            reason: format!("Invalid request URL: {}", e),
        })
    }
}

impl Default for AssetEndpoint {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
        }
    }
}
