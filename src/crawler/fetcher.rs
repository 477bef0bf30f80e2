//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building an HTTP client with a crawler-identifying user agent
//! - One-shot GET requests with a fixed timeout
//! - Error classification (timeout, connect, TLS all become network
//!   failures; redirects are surfaced to the caller, never followed)

use crate::config::UserAgentConfig;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Result of a fetch attempt
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered; redirects and error statuses are responses too
    Response {
        /// HTTP status code
        status_code: u16,
        /// Content-Type header with parameters stripped, empty if absent
        content_type: String,
        /// Raw response body
        body: Vec<u8>,
        /// `Location` header value for redirect responses
        redirect_target: Option<String>,
    },

    /// Nothing came back: timeout, DNS, TLS, or connection failure
    NetworkFailure {
        /// Error description
        error: String,
    },
}

/// Builds the shared HTTP client
///
/// Redirects are never followed automatically; the worker decides whether a
/// redirect target re-enters the frontier. The same timeout bounds the whole
/// request/response round trip.
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a single URL
///
/// Every failure mode maps to [`FetchResult::NetworkFailure`]; this function
/// never returns an error, so one bad page cannot abort the crawl.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchResult::NetworkFailure {
                error: classify_error(&e),
            }
        }
    };

    let status_code = response.status().as_u16();

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .unwrap_or("")
        .trim()
        .to_string();

    let redirect_target = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    match response.bytes().await {
        Ok(body) => FetchResult::Response {
            status_code,
            content_type,
            body: body.to_vec(),
            redirect_target,
        },
        Err(e) => FetchResult::NetworkFailure {
            error: classify_error(&e),
        },
    }
}

/// Maps a reqwest error to a short description for the audit trail
fn classify_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timeout".to_string()
    } else if e.is_connect() {
        "connection failed".to_string()
    } else {
        e.to_string()
    }
}
