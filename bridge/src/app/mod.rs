//! Application layer
//!
//! Services hand out domain models built from repository records.

pub mod mailchimp_service;

pub use mailchimp_service::MailChimpService;
