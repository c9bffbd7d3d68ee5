//! Subscriber hash
//!
//! Mailchimp addresses a list member by the MD5 hex digest of the lowercased
//! email address. Every per-member path must use this exact derivation.

use md5::{Digest, Md5};

pub fn subscriber_hash(email: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(email.to_lowercase().as_bytes());
    hex::encode(hasher.finalize())
}
