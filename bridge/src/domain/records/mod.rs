//! Wire records
//!
//! Passive structures shaped like subsets of Mailchimp responses.
//! Deserialized from untyped JSON with total defaulting.

pub mod de;
pub mod segment;
pub mod subscriber;

pub use segment::SegmentRecord;
pub use subscriber::SubscriberRecord;
