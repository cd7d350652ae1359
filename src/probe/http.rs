//! HTTP probe against a downstream endpoint.

use std::time::Duration;

use reqwest::header::USER_AGENT;
use thiserror::Error;
use url::Url;

use crate::config::ProbeConfig;

/// Why a probe request counted as a failure.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid probe url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("non-success status {0}")]
    Status(u16),
}

/// Issues a GET against one URL and classifies the result.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    url: Url,
}

impl HttpProbe {
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let url = Url::parse(&config.url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ProbeError::Client)?;
        Ok(Self { client, url })
    }

    /// Use a preconfigured client.
    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Probe once. Returns the status code on 2xx.
    pub async fn check(&self) -> Result<u16, ProbeError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(USER_AGENT, "circuit-guard-probe")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(status.as_u16())
        } else {
            Err(ProbeError::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_url() {
        let config = ProbeConfig {
            url: "::not a url".into(),
            ..ProbeConfig::default()
        };
        assert!(matches!(HttpProbe::new(&config), Err(ProbeError::InvalidUrl(_))));
    }

    #[test]
    fn test_status_error_display() {
        assert_eq!(ProbeError::Status(503).to_string(), "non-success status 503");
    }

    #[tokio::test]
    async fn test_connection_refused_is_failure() {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(1))
            .build()
            .unwrap();
        // Reserve a free port, then release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{}/health", addr)).unwrap();
        let target = HttpProbe::with_client(client, url);
        assert!(matches!(target.check().await, Err(ProbeError::Transport(_))));
    }
}
