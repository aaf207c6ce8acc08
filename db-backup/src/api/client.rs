//! HTTP client for the remote data API.
//!
//! One attempt per request, no retry: failures are captured per resource and
//! the run moves on.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

use crate::api::document::ResourceBackup;
use crate::config::ApiConfig;
use crate::utils::errors::BackupError;

pub struct ApiClient {
    http: reqwest::Client,
    endpoint: String,
    fetch_limit: usize,
}

impl ApiClient {
    /// Build a client with the service credential attached to every request.
    pub fn new(config: &ApiConfig) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        let apikey = HeaderValue::from_str(&config.service_key).map_err(|_| {
            BackupError::Config("api.service_key contains invalid header characters".to_string())
        })?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.service_key))
            .map_err(|_| {
                BackupError::Config(
                    "api.service_key contains invalid header characters".to_string(),
                )
            })?;
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            fetch_limit: config.fetch_limit,
        })
    }

    /// Fetch every row of one resource, up to the configured cap.
    ///
    /// The caller always gets a `ResourceBackup`: transport errors and
    /// non-success statuses become an entry with `error` set and no records.
    pub async fn fetch_resource(&self, name: &str) -> ResourceBackup {
        let url = format!("{}/{}", self.endpoint, name);
        let limit = self.fetch_limit.to_string();
        let result = self
            .http
            .get(&url)
            .query(&[("select", "*"), ("limit", limit.as_str())])
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => match resp.json::<Vec<Value>>().await {
                Ok(records) => {
                    tracing::info!("{}: {} records", name, records.len());
                    ResourceBackup::success(name, records)
                }
                Err(e) => {
                    tracing::warn!("Failed to back up {}: invalid response body: {}", name, e);
                    ResourceBackup::failure(name, format!("Invalid response body: {}", e))
                }
            },
            Ok(resp) => {
                let status = resp.status();
                tracing::warn!("Failed to back up {}: HTTP {}", name, status);
                ResourceBackup::failure(name, format!("HTTP {}", status))
            }
            Err(e) => {
                tracing::warn!("Failed to back up {}: {}", name, e);
                ResourceBackup::failure(name, e.to_string())
            }
        }
    }

    /// Capability-discovery request for one resource.
    ///
    /// The response body is opaque and stored verbatim; anything other than
    /// a parseable 200 becomes a placeholder entry naming the failure.
    pub async fn probe_schema(&self, name: &str) -> Value {
        let url = format!("{}/{}", self.endpoint, name);
        let result = self
            .http
            .request(reqwest::Method::OPTIONS, &url)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status() == reqwest::StatusCode::OK => {
                match resp.json::<Value>().await {
                    Ok(body) => body,
                    Err(e) => json!({ "error": format!("Unreadable schema response: {}", e) }),
                }
            }
            Ok(resp) => json!({ "error": format!("Schema request returned HTTP {}", resp.status()) }),
            Err(e) => json!({ "error": e.to_string() }),
        }
    }
}
