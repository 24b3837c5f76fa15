//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the HTTP client with browser-like default headers
//! - Spacing requests with the courtesy [`Throttle`]
//! - Classifying failures as transport, HTTP status or malformed body
//!
//! There is no retry: a failed request is reported once and the caller
//! decides what to skip.

use crate::config::ClientConfig;
use crate::crawler::throttle::Throttle;
use crate::{FetchError, FetchResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use thread_ripple::config::ClientConfig;
/// use thread_ripple::crawler::build_http_client;
///
/// let client = build_http_client(&ClientConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json,text/plain,*/*"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert("dnt", HeaderValue::from_static("1"));

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends throttled GET requests and decodes JSON bodies
pub struct Fetcher {
    client: Client,
    throttle: Throttle,
    requests_sent: usize,
}

impl Fetcher {
    pub fn new(client: Client, throttle: Throttle) -> Self {
        Self {
            client,
            throttle,
            requests_sent: 0,
        }
    }

    /// Number of requests issued so far, failed ones included
    pub fn requests_sent(&self) -> usize {
        self.requests_sent
    }

    /// Waits out the courtesy delay, then fetches `url` as JSON
    ///
    /// # Error classification
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Timeout | `Timeout` |
    /// | Connection/transport failure | `Http` |
    /// | HTTP 403 or 429 | `Blocked` |
    /// | Other non-2xx | `Status` |
    /// | Body is not JSON (e.g. an HTML interstitial) | `Malformed` |
    pub async fn get_json(&mut self, url: &Url) -> FetchResult<Value> {
        self.throttle.wait().await;
        self.requests_sent += 1;

        tracing::trace!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::Blocked {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
            url: url.to_string(),
            message: format!("body is not JSON ({})", e),
        })
    }
}

fn classify_transport_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
