//! Alerting port
//!
//! Warnings that should reach whoever operates the site (error tracker, logs).

use serde_json::Value;

pub trait AlertSink: Send + Sync {
    /// Record a warning with structured context
    fn warning(&self, message: &str, context: &Value);
}
