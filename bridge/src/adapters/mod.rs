//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod mailchimp;
pub mod wordpress;

pub use mailchimp::{MailChimpApiRepository, MailChimpHttpClient};
pub use wordpress::TracingAlertSink;
