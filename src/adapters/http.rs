use crate::domain::ports::AssetTransport;
use crate::utils::error::{RefreshError, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

pub const API_KEY_HEADER: &str = "X-API-KEY";

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            api_key: None,
        }
    }

    /// With neither option set this behaves like `new`: no key header and
    /// no timeout beyond the client default.
    pub fn with_options(api_key: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key,
        })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

/// Connect failures and timeouts become `Connection`, carrying the whole
/// source chain so "connection refused" or "reset by peer" reaches the log.
fn transport_error(error: reqwest::Error) -> RefreshError {
    if !(error.is_connect() || error.is_timeout()) {
        return RefreshError::Request(error);
    }

    let mut message = error.to_string();
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }

    RefreshError::Connection { message }
}

#[async_trait::async_trait]
impl AssetTransport for HttpTransport {
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value> {
        let mut request = self.client.get(url.clone());
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(RefreshError::Status {
                code: status.as_u16(),
                status_text: status_text(status),
            });
        }

        let body = response.bytes().await.map_err(transport_error)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(StatusCode::NOT_FOUND), "Not Found");
        assert_eq!(status_text(StatusCode::TOO_MANY_REQUESTS), "Too Many Requests");
        assert_eq!(status_text(StatusCode::from_u16(599).unwrap()), "599");
    }

    #[tokio::test]
    async fn test_refused_connection_maps_to_connection_error() {
        let url = Url::parse("http://127.0.0.1:1/api/v1/asset/0xabc/1/?force_update=true").unwrap();

        let err = HttpTransport::new().get_json(&url).await.unwrap_err();

        assert!(
            matches!(err, RefreshError::Connection { .. }),
            "expected Connection, got {:?}",
            err
        );
        assert_eq!(err.failure_kind(), crate::utils::error::FailureKind::Transport);
    }
}
