use crate::core::endpoint::{DEFAULT_BASE_URL, DEFAULT_CONTRACT_ADDRESS};
use crate::domain::model::TokenRange;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{RefreshError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Every section is optional; a missing value falls back to the built-in
/// collection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub target: TargetConfig,
    pub range: Option<RangeConfig>,
    pub client: Option<ClientConfig>,
    pub output: Option<OutputConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    pub base_url: Option<String>,
    pub contract_address: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeConfig {
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RefreshError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OPENSEA_API_KEY})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RefreshError::Config {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        self.target.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn contract_address(&self) -> &str {
        self.target
            .contract_address
            .as_deref()
            .unwrap_or(DEFAULT_CONTRACT_ADDRESS)
    }

    fn token_range(&self) -> Result<TokenRange> {
        match &self.range {
            Some(range) => TokenRange::new(range.start, range.end),
            None => Ok(TokenRange::default()),
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.target.api_key.as_deref()
    }

    fn timeout(&self) -> Option<Duration> {
        self.client
            .as_ref()
            .and_then(|c| c.timeout_seconds)
            .map(Duration::from_secs)
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_ref().map(|o| o.path.as_str())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("target.base_url", self.base_url())?;
        validation::validate_path_segment("target.contract_address", self.contract_address())?;

        if let Some(range) = &self.range {
            validation::validate_ordered("range", range.start, range.end)?;
        }

        // An unresolved ${VAR} means the environment variable was never set.
        if let Some(key) = &self.target.api_key {
            if key.starts_with("${") {
                return Err(RefreshError::MissingConfig {
                    field: format!("target.api_key ({})", key),
                });
            }
        }

        if let Some(timeout) = self.client.as_ref().and_then(|c| c.timeout_seconds) {
            validation::validate_positive_number("client.timeout_seconds", timeout, 1)?;
        }

        if let Some(path) = self.output_path() {
            validation::validate_path("output.path", path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[target]
base_url = "https://testnets-api.opensea.io"
contract_address = "0xabc"

[range]
start = 100
end = 150

[client]
timeout_seconds = 20

[output]
path = "./reports"

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.base_url(), "https://testnets-api.opensea.io");
        assert_eq!(config.contract_address(), "0xabc");
        assert_eq!(config.token_range().unwrap(), TokenRange::new(100, 150).unwrap());
        assert_eq!(config.timeout(), Some(Duration::from_secs(20)));
        assert_eq!(config.output_path(), Some("./reports"));
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_builtin_collection() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.contract_address(), DEFAULT_CONTRACT_ADDRESS);
        assert_eq!(config.token_range().unwrap(), TokenRange::default());
        assert!(config.api_key().is_none());
        assert!(config.timeout().is_none());
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("METADATA_REFRESH_TEST_KEY", "secret-key");

        let toml_content = r#"
[target]
api_key = "${METADATA_REFRESH_TEST_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("secret-key"));

        std::env::remove_var("METADATA_REFRESH_TEST_KEY");
    }

    #[test]
    fn test_unresolved_api_key_fails_validation() {
        let toml_content = r#"
[target]
api_key = "${METADATA_REFRESH_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(RefreshError::MissingConfig { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let inverted = TomlConfig::from_toml_str("[range]\nstart = 10\nend = 1\n").unwrap();
        assert!(inverted.validate().is_err());
        assert!(inverted.token_range().is_err());

        let bad_url = TomlConfig::from_toml_str("[target]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let zero_timeout = TomlConfig::from_toml_str("[client]\ntimeout_seconds = 0\n").unwrap();
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[range\nstart = 1").unwrap_err();
        assert!(matches!(err, RefreshError::Config { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[range]\nstart = 1\nend = 3\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.token_range().unwrap().len(), 3);
    }
}
