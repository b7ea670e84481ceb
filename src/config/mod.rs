pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use crate::core::endpoint::{DEFAULT_BASE_URL, DEFAULT_CONTRACT_ADDRESS};
    use crate::domain::model::{TokenRange, DEFAULT_END_TOKEN_ID, DEFAULT_START_TOKEN_ID};
    use crate::domain::ports::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use std::time::Duration;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "metadata-refresh")]
    #[command(about = "Force a marketplace metadata refresh for every token in a collection")]
    pub struct CliConfig {
        /// Marketplace API host
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        pub base_url: String,

        /// Collection contract address
        #[arg(long, default_value = DEFAULT_CONTRACT_ADDRESS)]
        pub contract_address: String,

        /// First token ID (inclusive)
        #[arg(long, default_value_t = DEFAULT_START_TOKEN_ID)]
        pub start: u64,

        /// Last token ID (inclusive)
        #[arg(long, default_value_t = DEFAULT_END_TOKEN_ID)]
        pub end: u64,

        #[arg(long, env = "OPENSEA_API_KEY", hide_env_values = true)]
        pub api_key: Option<String>,

        /// Per-request timeout; unset keeps the client default
        #[arg(long)]
        pub timeout_seconds: Option<u64>,

        /// Directory for refresh_report.json
        #[arg(long)]
        pub output_path: Option<String>,

        /// Load settings from a TOML file instead of flags
        #[arg(short, long)]
        pub config: Option<String>,

        /// Print the URLs that would be requested and exit
        #[arg(long)]
        pub dry_run: bool,

        #[arg(long, help = "Log CPU and memory usage at start and end")]
        pub monitor: bool,

        #[arg(long, help = "Emit JSON log lines")]
        pub log_json: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl ConfigProvider for CliConfig {
        fn base_url(&self) -> &str {
            &self.base_url
        }

        fn contract_address(&self) -> &str {
            &self.contract_address
        }

        fn token_range(&self) -> Result<TokenRange> {
            TokenRange::new(self.start, self.end)
        }

        fn api_key(&self) -> Option<&str> {
            self.api_key.as_deref()
        }

        fn timeout(&self) -> Option<Duration> {
            self.timeout_seconds.map(Duration::from_secs)
        }

        fn output_path(&self) -> Option<&str> {
            self.output_path.as_deref()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_url("base_url", &self.base_url)?;
            validation::validate_path_segment("contract_address", &self.contract_address)?;
            validation::validate_ordered("start..end", self.start, self.end)?;
            if let Some(timeout) = self.timeout_seconds {
                validation::validate_positive_number("timeout_seconds", timeout, 1)?;
            }
            if let Some(path) = &self.output_path {
                validation::validate_path("output_path", path)?;
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults_match_collection() {
            let config = CliConfig::parse_from(["metadata-refresh"]);

            assert_eq!(config.base_url(), "https://api.opensea.io");
            assert_eq!(
                config.contract_address(),
                "0xd8b4359143eda5b2d763e127ed27c77addbc47d3"
            );
            assert_eq!(config.token_range().unwrap(), TokenRange::default());
            assert!(config.timeout().is_none());
            assert!(config.output_path().is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_flag_overrides() {
            let config = CliConfig::parse_from([
                "metadata-refresh",
                "--start",
                "10",
                "--end",
                "20",
                "--timeout-seconds",
                "15",
                "--dry-run",
            ]);

            assert_eq!(config.token_range().unwrap(), TokenRange::new(10, 20).unwrap());
            assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
            assert!(config.dry_run);
        }

        #[test]
        fn test_inverted_range_fails_validation() {
            let config = CliConfig::parse_from(["metadata-refresh", "--start", "9", "--end", "3"]);
            assert!(config.validate().is_err());
        }
    }
}
