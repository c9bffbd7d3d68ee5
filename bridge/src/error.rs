//! Error types for the Mailchimp bridge
//!
//! This module defines error types for each layer:
//! - `TransportError`: the HTTP transport could not complete a call
//! - `MailChimpError`: classification of a finished call inside the repository
//! - `HostError`: a WordPress host capability failed
//! - `ConfigError`: the environment is missing required settings
//!
//! None of these escape the repository's public operations; they are logged
//! and collapsed into sentinel return values there.

use thiserror::Error;

/// Hard failure of the HTTP transport (nothing usable came back)
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Could not decode response body: {0}")]
    Decode(String),

    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Outcome classification for a single Mailchimp call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailChimpError {
    /// Could not reach or complete the call. Carries the transport's last error.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The call completed but Mailchimp reported `status >= 400`.
    #[error("API error: {status} - {details}")]
    Api { status: u16, details: String },
}

/// Failure of a WordPress host capability (options, mail)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("Option {key} unavailable: {message}")]
    Option { key: String, message: String },

    #[error("Mail delivery failed: {0}")]
    Mail(String),
}

/// Configuration errors raised while reading the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}
