//! Subscriber wire record
//!
//! Mirrors the subset of a Mailchimp list member we care about.
//! See <https://mailchimp.com/developer/marketing/api/list-members/>.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_default_from_null;
use serde_json::{Map, Value};

use super::de;

/// A list member as returned by the members endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubscriberRecord {
    pub email_address: String,
    pub interests: BTreeMap<String, bool>,
    pub last_changed: String,
    pub list_id: String,
    pub member_rating: i64,
    pub average_click_rate: i64,
    pub average_open_rate: i64,
    pub merge_fields: Map<String, Value>,
    pub timestamp_signup: String,
    pub status: String,
    pub unique_email_id: Option<String>,
}

/// Member payload as the API sends it
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MemberResponse {
    #[serde(deserialize_with = "deserialize_default_from_null")]
    email_address: String,
    #[serde(deserialize_with = "de::flag_map")]
    interests: BTreeMap<String, bool>,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    last_changed: String,
    #[serde(deserialize_with = "de::string")]
    list_id: String,
    #[serde(deserialize_with = "de::int")]
    member_rating: i64,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    stats: MemberStats,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    merge_fields: Map<String, Value>,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    timestamp_signup: String,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    status: String,
    #[serde(deserialize_with = "de::optional_string")]
    unique_email_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MemberStats {
    #[serde(deserialize_with = "de::int")]
    avg_open_rate: i64,
    #[serde(deserialize_with = "de::int")]
    avg_click_rate: i64,
}

// The two averages are read crosswise (`average_click_rate` comes from
// `stats.avg_open_rate` and vice versa). Existing WordPress data was written
// with this mapping, so it is kept as is.
impl From<MemberResponse> for SubscriberRecord {
    fn from(member: MemberResponse) -> Self {
        Self {
            email_address: member.email_address,
            interests: member.interests,
            last_changed: member.last_changed,
            list_id: member.list_id,
            member_rating: member.member_rating,
            average_click_rate: member.stats.avg_open_rate,
            average_open_rate: member.stats.avg_click_rate,
            merge_fields: member.merge_fields,
            timestamp_signup: member.timestamp_signup,
            status: member.status,
            unique_email_id: member.unique_email_id,
        }
    }
}

impl SubscriberRecord {
    /// Build a record from a raw member payload. Never fails: absent or null
    /// fields fall back to their zero value, and a payload that is not a
    /// member object at all yields the empty record.
    ///
    /// `average_click_rate` and `average_open_rate` are swapped relative to
    /// the API's `stats.avg_open_rate` and `stats.avg_click_rate`.
    pub fn from_payload(payload: &Value) -> Self {
        de::read_or_default::<MemberResponse>(payload).into()
    }
}

impl From<&Value> for SubscriberRecord {
    fn from(payload: &Value) -> Self {
        Self::from_payload(payload)
    }
}
