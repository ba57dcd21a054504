//! HTTP fetch with bounded retry.
//!
//! The upstream export is an external collaborator: fetch JSON, retry with
//! doubling backoff, and return `None` on exhaustion. A permanently failing
//! endpoint must never abort the run; the pipeline proceeds with empty
//! defaults.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

const CLIENT_ID: &str = "rosterforge/0.3 (+https://github.com/rosterforge/rosterforge)";
const MAX_RETRIES: u32 = 2;
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("http status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid json: {0}")]
    InvalidJson(String),
}

/// Build the HTTP client used for the whole run.
pub fn build_client() -> anyhow::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_ID));
    let client = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .build()?;
    Ok(client)
}

/// GET a JSON document, retrying with doubling backoff. Exhaustion logs and
/// yields `None`.
pub fn fetch_json(client: &Client, url: &str) -> Option<Value> {
    let mut backoff = INITIAL_BACKOFF;
    for attempt in 0..=MAX_RETRIES {
        match try_fetch(client, url) {
            Ok(value) => {
                debug!(%url, attempt, "fetched");
                return Some(value);
            }
            Err(err) if attempt < MAX_RETRIES => {
                warn!(%url, attempt, %err, "fetch failed, retrying");
                thread::sleep(backoff);
                backoff *= 2;
            }
            Err(err) => {
                warn!(%url, %err, "fetch failed, giving up");
            }
        }
    }
    None
}

fn try_fetch(client: &Client, url: &str) -> Result<Value, FetchError> {
    let resp = client
        .get(url)
        .send()
        .map_err(|e| FetchError::Network(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(FetchError::Status(resp.status().as_u16()));
    }
    resp.json().map_err(|e| FetchError::InvalidJson(e.to_string()))
}
