//! The injected fetch capability for the poll loop.

use crate::error::{BuildwatchError, Result};
use std::time::Duration;

/// Endpoint path served by CruiseControl-style dashboards.
pub const STATUS_ENDPOINT: &str = "getProjectBuildStatus.ajax";

/// Fetches one raw status response body.
///
/// The poll scheduler only sees this seam, so tests (and any future
/// transport) can stand in for the HTTP client.
pub trait StatusFetcher {
    fn fetch(&mut self) -> Result<String>;
}

/// HTTP implementation over a blocking reqwest client.
///
/// No request timeout is configured deliberately: a slow response delays
/// the next poll rather than overlapping it, and the response is processed
/// whenever it arrives.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpFetcher {
    pub fn new(server_url: &str) -> Result<Self> {
        let trimmed = server_url.trim().trim_end_matches('/');
        if trimmed.is_empty() || !(trimmed.starts_with("http://") || trimmed.starts_with("https://"))
        {
            return Err(BuildwatchError::InvalidServerUrl(server_url.to_string()));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{trimmed}/{STATUS_ENDPOINT}"),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl StatusFetcher for HttpFetcher {
    fn fetch(&mut self) -> Result<String> {
        let response = self.client.get(&self.endpoint).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(BuildwatchError::HttpStatus(status.as_u16()));
        }
        Ok(response.text()?)
    }
}
