//! REST implementation of [`Backend`] for a hosted PostgREST-style project

use crate::client::Backend;
use crate::error::{BackendError, BackendResult};
use crate::query::Query;
use async_trait::async_trait;
use http::header::{AUTHORIZATION, CONTENT_RANGE};
use marketplace_core::config::BackendConfig;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Backend reached over `{url}/rest/v1`
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: String,
    schema: String,
}

impl RestBackend {
    /// Create a client with the default 30 second timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is empty or the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> BackendResult<Self> {
        Self::with_options(base_url, api_key, "public", Duration::from_secs(30))
    }

    /// Create a client from the `backend` configuration section
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is empty or the HTTP client cannot be built.
    pub fn from_config(config: &BackendConfig) -> BackendResult<Self> {
        Self::with_options(
            config.url.clone(),
            config.api_key.clone(),
            config.schema.clone(),
            Duration::from_secs(config.request_timeout),
        )
    }

    fn with_options(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        schema: impl Into<String>,
        timeout: Duration,
    ) -> BackendResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(BackendError::Configuration {
                message: "backend URL must not be empty".to_string(),
            });
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
            schema: schema.into(),
        })
    }

    /// Base URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, urlencoding::encode(table))
    }

    fn rpc_url(&self, name: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, urlencoding::encode(name))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("Accept-Profile", &self.schema)
            .header("Content-Profile", &self.schema)
    }
}

/// Total from a `Content-Range` value such as `0-24/573` or `*/573`
#[must_use]
pub fn parse_content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.trim().parse().ok()
}

async fn ensure_success(response: Response, operation: &str) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body.clone()
            }
        });

    error!(
        status = status.as_u16(),
        operation = operation,
        message = %message,
        "Backend request failed"
    );

    Err(BackendError::Status {
        status: status.as_u16(),
        operation: operation.to_string(),
        message,
    })
}

#[async_trait]
impl Backend for RestBackend {
    async fn select(&self, query: &Query) -> BackendResult<Vec<Value>> {
        let url = self.table_url(query.table_name());
        let pairs = query.to_query_pairs();

        debug!(url = %url, params = ?pairs, "Selecting rows");

        let request = self.authorize(self.client.get(&url).query(&pairs));
        let response = ensure_success(request.send().await?, query.table_name()).await?;
        let rows: Vec<Value> = response.json().await?;

        debug!(table = query.table_name(), rows = rows.len(), "Rows received");
        Ok(rows)
    }

    async fn count(&self, query: &Query) -> BackendResult<u64> {
        let url = self.table_url(query.table_name());
        let pairs = query.to_query_pairs();

        debug!(url = %url, params = ?pairs, "Counting rows");

        let request = self
            .authorize(self.client.head(&url).query(&pairs))
            .header("Prefer", "count=exact");
        let response = ensure_success(request.send().await?, query.table_name()).await?;

        let header = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        header
            .as_deref()
            .and_then(parse_content_range_total)
            .ok_or_else(|| BackendError::MissingCount {
                table: query.table_name().to_string(),
                header,
            })
    }

    async fn rpc(&self, name: &str, args: Value) -> BackendResult<Value> {
        let url = self.rpc_url(name);
        let operation = format!("rpc/{name}");

        debug!(url = %url, procedure = name, "Calling remote procedure");

        let request = self.authorize(self.client.post(&url).json(&args));
        let response = ensure_success(request.send().await?, &operation).await?;

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn name(&self) -> &str {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("0-24/573"), Some(573));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total(" */12 "), Some(12));
        assert_eq!(parse_content_range_total("0-24/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[test]
    fn test_base_url_is_normalized() {
        let backend = RestBackend::new("https://project.example.co/ ", "anon");
        assert!(backend.is_ok());
        if let Ok(backend) = backend {
            assert_eq!(backend.base_url(), "https://project.example.co");
            assert_eq!(
                backend.table_url("profiles"),
                "https://project.example.co/rest/v1/profiles"
            );
            assert_eq!(
                backend.rpc_url("restore_deleted_product"),
                "https://project.example.co/rest/v1/rpc/restore_deleted_product"
            );
        }
    }

    #[test]
    fn test_empty_url_is_rejected() {
        let result = RestBackend::new("  ", "anon");
        assert!(matches!(result, Err(BackendError::Configuration { .. })));
    }
}
