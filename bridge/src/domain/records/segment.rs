//! Segment wire record
//!
//! See <https://mailchimp.com/developer/marketing/api/list-segments/>.

use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_default_from_null;
use serde_json::Value;

use super::de;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentRecord {
    #[serde(deserialize_with = "de::string")]
    pub id: String,
    #[serde(deserialize_with = "de::int")]
    pub member_count: i64,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub name: String,
}

impl SegmentRecord {
    pub fn from_payload(payload: &Value) -> Self {
        de::read_or_default(payload)
    }
}

impl From<&Value> for SegmentRecord {
    fn from(payload: &Value) -> Self {
        Self::from_payload(payload)
    }
}
