//! Mailchimp adapter
//!
//! HTTP transport, repository and the helpers they share.

pub mod client;
pub mod hashing;
pub mod repository;
pub mod social_card;

pub use client::MailChimpHttpClient;
pub use hashing::subscriber_hash;
pub use repository::MailChimpApiRepository;
pub use social_card::strip_pictographs;
