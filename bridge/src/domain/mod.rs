//! Domain layer
//!
//! - `records`: wire records shaped like Mailchimp payloads
//! - `entities`: domain models built from records
//! - `ports`: trait definitions for external dependencies

pub mod entities;
pub mod ports;
pub mod records;
