use super::HtmlFetcher;
use crate::config::ImportConfig;
use crate::ImportError;
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::Duration;

/// Fetches pages with a single blocking GET.
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ImportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html,*/*;q=0.8"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(HeaderValue::from_str(user_agent)?)
            .default_headers(headers)
            .build()
            .map_err(|e| ImportError::BuilderError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    pub fn from_config(config: &ImportConfig) -> Result<Self, ImportError> {
        Self::new(config.timeout_duration(), &config.user_agent)
    }
}

impl HtmlFetcher for RequestFetcher {
    fn fetch(&self, url: &str) -> Result<String, ImportError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        debug!("GET {url} -> {status}");

        if !status.is_success() {
            return Err(ImportError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text()?)
    }
}
