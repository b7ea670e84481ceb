pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::HttpTransport, storage::LocalStorage};
pub use config::toml_config::TomlConfig;
pub use crate::core::{endpoint::AssetEndpoint, runner::RefreshRunner};
pub use domain::model::{RefreshOutcome, RefreshReport, TokenRange};
pub use utils::error::{FailureKind, RefreshError, Result};
