//! Mock implementations of port traits
//!
//! Hand-written doubles that script responses and record what was asked of
//! them, so tests can assert on paths and bodies.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use crate::domain::ports::{AlertSink, MailChimpTransport};
use crate::error::TransportError;

// ============================================================================
// Mock Transport
// ============================================================================

/// One request seen by [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct TransportCall {
    pub method: &'static str,
    pub path: String,
    pub params: Value,
}

/// A scripted transport. Responses are consumed in order; once the script is
/// exhausted every call answers `{}`.
#[derive(Default)]
pub struct MockTransport {
    script: Arc<RwLock<VecDeque<Result<Value, String>>>>,
    calls: Arc<RwLock<Vec<TransportCall>>>,
    last_error: Arc<RwLock<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a payload (which may itself be an API error body)
    pub fn with_response(self, payload: Value) -> Self {
        self.script.write().unwrap().push_back(Ok(payload));
        self
    }

    /// Queue a hard failure whose message becomes the last error
    pub fn with_failure(self, message: &str) -> Self {
        self.script
            .write()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn set_last_error(&self, message: &str) {
        *self.last_error.write().unwrap() = message.to_string();
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<TransportCall> {
        self.calls.read().unwrap().last().cloned()
    }

    fn respond(
        &self,
        method: &'static str,
        path: &str,
        params: &Value,
    ) -> Result<Value, TransportError> {
        self.calls.write().unwrap().push(TransportCall {
            method,
            path: path.to_string(),
            params: params.clone(),
        });

        let next = self.script.write().unwrap().pop_front();
        match next {
            Some(Ok(payload)) => {
                self.set_last_error("");
                Ok(payload)
            }
            Some(Err(message)) => {
                self.set_last_error(&message);
                Err(TransportError::Unavailable(message))
            }
            None => {
                self.set_last_error("");
                Ok(json!({}))
            }
        }
    }
}

#[async_trait]
impl MailChimpTransport for MockTransport {
    async fn get(&self, path: &str, params: &Value) -> Result<Value, TransportError> {
        self.respond("GET", path, params)
    }

    async fn post(&self, path: &str, params: &Value) -> Result<Value, TransportError> {
        self.respond("POST", path, params)
    }

    async fn put(&self, path: &str, params: &Value) -> Result<Value, TransportError> {
        self.respond("PUT", path, params)
    }

    async fn patch(&self, path: &str, params: &Value) -> Result<Value, TransportError> {
        self.respond("PATCH", path, params)
    }

    fn last_error(&self) -> String {
        self.last_error.read().unwrap().clone()
    }
}

// ============================================================================
// Recording Alert Sink
// ============================================================================

/// An alert sink that keeps every warning it receives
#[derive(Default)]
pub struct RecordingAlertSink {
    pub warnings: Arc<RwLock<Vec<(String, Value)>>>,
}

impl RecordingAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<(String, Value)> {
        self.warnings.read().unwrap().clone()
    }
}

impl AlertSink for RecordingAlertSink {
    fn warning(&self, message: &str, context: &Value) {
        self.warnings
            .write()
            .unwrap()
            .push((message.to_string(), context.clone()));
    }
}
