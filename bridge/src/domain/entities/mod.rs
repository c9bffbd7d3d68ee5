//! Domain entities
//!
//! Models used by application code. Separate from the wire records in
//! `records`, which mirror Mailchimp payloads.

pub mod campaign;
pub mod segment;
pub mod subscriber;

pub use campaign::{CampaignSettings, NewCampaign};
pub use segment::Segment;
pub use subscriber::{Subscriber, SubscriptionStatus};
