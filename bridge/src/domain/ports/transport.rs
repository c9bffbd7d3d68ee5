//! Mailchimp transport port
//!
//! The only way the repository reaches Mailchimp. A returned `Ok` payload may
//! still describe an API error (`status >= 400`); the repository classifies it.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;

/// Raw access to the Mailchimp REST API
///
/// `path` is relative to the API root (`lists/abc/members`); an empty path
/// addresses the root resource. `params` is a JSON object: query parameters
/// for `get`, request body for the other verbs.
#[async_trait]
pub trait MailChimpTransport: Send + Sync {
    async fn get(&self, path: &str, params: &Value) -> Result<Value, TransportError>;

    async fn post(&self, path: &str, params: &Value) -> Result<Value, TransportError>;

    async fn put(&self, path: &str, params: &Value) -> Result<Value, TransportError>;

    async fn patch(&self, path: &str, params: &Value) -> Result<Value, TransportError>;

    /// Message of the most recent hard failure, empty if none
    ///
    /// One slot per transport, cleared at the start of every request. With
    /// calls in flight concurrently it may describe another call's failure;
    /// callers should check it against the `TransportError` they hold.
    fn last_error(&self) -> String;
}
