//! Mailchimp HTTP transport

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method};
use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::domain::ports::MailChimpTransport;
use crate::error::TransportError;

/// reqwest-backed implementation of the Mailchimp transport
pub struct MailChimpHttpClient {
    http: Client,
    base_url: String,
    api_key: String,
    // Shared by all requests on this client; last writer wins.
    last_error: Mutex<String>,
}

impl MailChimpHttpClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            last_error: Mutex::new(String::new()),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(&config.api_url, &config.api_key, config.timeout)
    }

    fn api_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn remember_error(&self, message: String) {
        if let Ok(mut last) = self.last_error.lock() {
            *last = message;
        }
    }

    async fn make_request(
        &self,
        method: Method,
        path: &str,
        params: &Value,
    ) -> Result<Value, TransportError> {
        self.remember_error(String::new());

        let result = self.execute(method.clone(), path, params).await;
        match &result {
            Ok(payload) => {
                if let Some(status) = payload.get("status").and_then(Value::as_u64) {
                    if status >= 400 {
                        let detail = payload
                            .get("detail")
                            .and_then(Value::as_str)
                            .unwrap_or_default();
                        self.remember_error(format!("{}: {}", status, detail));
                    }
                }
            }
            Err(e) => {
                tracing::warn!(%method, path, error = %e, "Mailchimp request failed");
                self.remember_error(e.to_string());
            }
        }
        result
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        params: &Value,
    ) -> Result<Value, TransportError> {
        let mut request = self
            .http
            .request(method.clone(), self.api_url(path))
            .header(AUTHORIZATION, format!("apikey {}", self.api_key));

        request = if method == Method::GET {
            request.query(&query_pairs(params))
        } else {
            request.json(params)
        };

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(%method, path, status, "Mailchimp responded");
        decode_body(status, &body)
    }
}

/// Flatten a params object into query pairs. Nulls are skipped.
fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Some(object) = params.as_object() else {
        return Vec::new();
    };

    object
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}

/// Turn a response body into a payload.
///
/// Error statuses are returned as data so the caller can classify them: the
/// payload always carries a numeric `status` and, when Mailchimp sent a
/// `detail`, a `details` copy of it.
fn decode_body(status: u16, body: &str) -> Result<Value, TransportError> {
    let is_error = status >= 400;

    let parsed = if body.trim().is_empty() {
        Value::Object(Map::new())
    } else {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => value,
            Err(_) if is_error => json!({ "detail": body.trim() }),
            Err(e) => return Err(TransportError::Decode(e.to_string())),
        }
    };

    if !is_error {
        return Ok(parsed);
    }

    let mut problem = match parsed {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("detail".to_string(), other);
            map
        }
    };

    if !problem.get("status").is_some_and(Value::is_u64) {
        problem.insert("status".to_string(), json!(status));
    }
    if !problem.contains_key("details") {
        if let Some(detail) = problem.get("detail").cloned() {
            problem.insert("details".to_string(), detail);
        }
    }

    Ok(Value::Object(problem))
}

#[async_trait]
impl MailChimpTransport for MailChimpHttpClient {
    async fn get(&self, path: &str, params: &Value) -> Result<Value, TransportError> {
        self.make_request(Method::GET, path, params).await
    }

    async fn post(&self, path: &str, params: &Value) -> Result<Value, TransportError> {
        self.make_request(Method::POST, path, params).await
    }

    async fn put(&self, path: &str, params: &Value) -> Result<Value, TransportError> {
        self.make_request(Method::PUT, path, params).await
    }

    async fn patch(&self, path: &str, params: &Value) -> Result<Value, TransportError> {
        self.make_request(Method::PATCH, path, params).await
    }

    fn last_error(&self) -> String {
        self.last_error
            .lock()
            .map(|last| last.clone())
            .unwrap_or_default()
    }
}
