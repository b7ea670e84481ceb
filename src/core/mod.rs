pub mod endpoint;
pub mod runner;

pub use crate::domain::model::{RefreshOutcome, RefreshReport, TokenRange};
pub use crate::domain::ports::{AssetTransport, ConfigProvider, Storage};
pub use crate::utils::error::Result;
