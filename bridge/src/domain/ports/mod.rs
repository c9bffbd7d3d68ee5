//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod alerts;
pub mod host;
pub mod repositories;
pub mod transport;

pub use alerts::AlertSink;
pub use host::WordPressHost;
pub use repositories::MailChimpRepository;
pub use transport::MailChimpTransport;

#[cfg(test)]
pub use host::MockWordPressHost;
#[cfg(test)]
pub use repositories::MockMailChimpRepository;
