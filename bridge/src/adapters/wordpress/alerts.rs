//! Alert sink backed by `tracing`
//!
//! Sites that forward warnings to an error tracker install their own
//! `AlertSink`; this one only writes them to the log.

use serde_json::Value;

use crate::domain::ports::AlertSink;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn warning(&self, message: &str, context: &Value) {
        tracing::warn!(context = %context, "{}", message);
    }
}
