//! Subscriber domain entity
//!
//! Application-side view of a Mailchimp list member. Built from a
//! [`SubscriberRecord`] and convertible back for outbound writes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::records::de::is_truthy;
use crate::domain::records::SubscriberRecord;

pub const MERGE_FIELD_FIRST_NAME: &str = "FNAME";
pub const MERGE_FIELD_LAST_NAME: &str = "LNAME";
pub const MERGE_FIELD_IS_ACTIVE: &str = "ISACTIVE";
pub const MERGE_FIELD_IS_MEMBER: &str = "ISMEMBER";
pub const MERGE_FIELD_IS_TESTER: &str = "ISTESTER";

/// Member status on a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Subscribed,
    Unsubscribed,
    Cleaned,
    Pending,
    Transactional,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Subscribed => "subscribed",
            SubscriptionStatus::Unsubscribed => "unsubscribed",
            SubscriptionStatus::Cleaned => "cleaned",
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Transactional => "transactional",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscribed" => Ok(SubscriptionStatus::Subscribed),
            "unsubscribed" => Ok(SubscriptionStatus::Unsubscribed),
            "cleaned" => Ok(SubscriptionStatus::Cleaned),
            "pending" => Ok(SubscriptionStatus::Pending),
            "transactional" => Ok(SubscriptionStatus::Transactional),
            _ => Err(format!("Unknown subscription status: {}", s)),
        }
    }
}

/// A list member with merge-field accessors
///
/// Merge fields stay an open map; the named accessors only touch their own
/// well-known key and leave everything else alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Subscriber {
    email_address: String,
    interests: BTreeMap<String, bool>,
    last_changed: String,
    list_id: String,
    member_rating: i64,
    average_click_rate: i64,
    average_open_rate: i64,
    merge_fields: Map<String, Value>,
    signup_timestamp: String,
    subscription_status: String,
    unique_id: Option<String>,
}

impl Subscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_record(&self) -> SubscriberRecord {
        SubscriberRecord {
            email_address: self.email_address.clone(),
            interests: self.interests.clone(),
            last_changed: self.last_changed.clone(),
            list_id: self.list_id.clone(),
            member_rating: self.member_rating,
            average_click_rate: self.average_click_rate,
            average_open_rate: self.average_open_rate,
            merge_fields: self.merge_fields.clone(),
            timestamp_signup: self.signup_timestamp.clone(),
            status: self.subscription_status.clone(),
            unique_email_id: self.unique_id.clone(),
        }
    }

    pub fn email_address(&self) -> &str {
        &self.email_address
    }

    pub fn interests(&self) -> &BTreeMap<String, bool> {
        &self.interests
    }

    pub fn last_changed(&self) -> &str {
        &self.last_changed
    }

    /// `last_changed` parsed as RFC 3339, `None` when empty or malformed
    pub fn last_changed_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.last_changed)
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn member_rating(&self) -> i64 {
        self.member_rating
    }

    pub fn click_rate(&self) -> i64 {
        self.average_click_rate
    }

    pub fn open_rate(&self) -> i64 {
        self.average_open_rate
    }

    pub fn merge_fields(&self) -> &Map<String, Value> {
        &self.merge_fields
    }

    pub fn first_name(&self) -> &str {
        self.name_field(MERGE_FIELD_FIRST_NAME)
    }

    pub fn last_name(&self) -> &str {
        self.name_field(MERGE_FIELD_LAST_NAME)
    }

    pub fn is_active(&self) -> bool {
        self.merge_flag(MERGE_FIELD_IS_ACTIVE)
    }

    pub fn is_member(&self) -> bool {
        self.merge_flag(MERGE_FIELD_IS_MEMBER)
    }

    pub fn is_tester(&self) -> bool {
        self.merge_flag(MERGE_FIELD_IS_TESTER)
    }

    pub fn signup_timestamp(&self) -> &str {
        &self.signup_timestamp
    }

    pub fn signed_up_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.signup_timestamp)
    }

    /// Raw status string as Mailchimp sent it
    pub fn subscription_status(&self) -> &str {
        &self.subscription_status
    }

    /// Typed status, `None` for empty or unknown values
    pub fn status(&self) -> Option<SubscriptionStatus> {
        self.subscription_status.parse().ok()
    }

    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    pub fn set_email_address(&mut self, email_address: impl Into<String>) {
        self.email_address = email_address.into();
    }

    pub fn set_interests(&mut self, interests: BTreeMap<String, bool>) {
        self.interests = interests;
    }

    pub fn set_last_changed(&mut self, last_changed: impl Into<String>) {
        self.last_changed = last_changed.into();
    }

    pub fn set_list_id(&mut self, list_id: impl Into<String>) {
        self.list_id = list_id.into();
    }

    pub fn set_member_rating(&mut self, rating: i64) {
        self.member_rating = rating;
    }

    pub fn set_click_rate(&mut self, rate: i64) {
        self.average_click_rate = rate;
    }

    pub fn set_open_rate(&mut self, rate: i64) {
        self.average_open_rate = rate;
    }

    pub fn set_merge_fields(&mut self, merge_fields: Map<String, Value>) {
        self.merge_fields = merge_fields;
    }

    pub fn set_first_name(&mut self, name: impl Into<String>) {
        self.merge_fields
            .insert(MERGE_FIELD_FIRST_NAME.to_string(), Value::String(name.into()));
    }

    pub fn set_last_name(&mut self, name: impl Into<String>) {
        self.merge_fields
            .insert(MERGE_FIELD_LAST_NAME.to_string(), Value::String(name.into()));
    }

    /// `ISACTIVE` is a number merge field on the list (0/1)
    pub fn set_is_active(&mut self, is_active: i64) {
        self.merge_fields
            .insert(MERGE_FIELD_IS_ACTIVE.to_string(), Value::from(is_active));
    }

    pub fn set_is_member(&mut self, is_member: bool) {
        self.merge_fields
            .insert(MERGE_FIELD_IS_MEMBER.to_string(), Value::Bool(is_member));
    }

    pub fn set_is_tester(&mut self, is_tester: bool) {
        self.merge_fields
            .insert(MERGE_FIELD_IS_TESTER.to_string(), Value::Bool(is_tester));
    }

    pub fn set_signup_timestamp(&mut self, timestamp: impl Into<String>) {
        self.signup_timestamp = timestamp.into();
    }

    pub fn set_subscription_status(&mut self, status: SubscriptionStatus) {
        self.subscription_status = status.as_str().to_string();
    }

    pub fn set_unique_id(&mut self, unique_id: impl Into<String>) {
        self.unique_id = Some(unique_id.into());
    }

    // Mailchimp stores cleared text merge fields as the literal "null".
    fn name_field(&self, key: &str) -> &str {
        match self.merge_fields.get(key) {
            Some(Value::String(s)) if !s.eq_ignore_ascii_case("null") => s,
            _ => "",
        }
    }

    fn merge_flag(&self, key: &str) -> bool {
        self.merge_fields.get(key).map(is_truthy).unwrap_or(false)
    }
}

impl From<SubscriberRecord> for Subscriber {
    fn from(record: SubscriberRecord) -> Self {
        Self {
            email_address: record.email_address,
            interests: record.interests,
            last_changed: record.last_changed,
            list_id: record.list_id,
            member_rating: record.member_rating,
            average_click_rate: record.average_click_rate,
            average_open_rate: record.average_open_rate,
            merge_fields: record.merge_fields,
            signup_timestamp: record.timestamp_signup,
            subscription_status: record.status,
            unique_id: record.unique_email_id,
        }
    }
}

impl From<&Subscriber> for SubscriberRecord {
    fn from(subscriber: &Subscriber) -> Self {
        subscriber.to_record()
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_subscriber_record;
    use chrono::TimeZone;
    use quickcheck::{Arbitrary, Gen};
    use serde_json::json;

    #[test]
    fn record_round_trips_through_model() {
        let record = test_subscriber_record("al@whereby.us");

        let subscriber = Subscriber::from(record.clone());

        assert_eq!(subscriber.to_record(), record);
    }

    #[derive(Debug, Clone)]
    struct AnyRecord(SubscriberRecord);

    impl Arbitrary for AnyRecord {
        fn arbitrary(g: &mut Gen) -> Self {
            let mut merge_fields = Map::new();
            for key in Vec::<String>::arbitrary(g) {
                let value = match u8::arbitrary(g) % 5 {
                    0 => Value::String(String::arbitrary(g)),
                    1 => Value::from(i64::arbitrary(g)),
                    2 => Value::Bool(bool::arbitrary(g)),
                    3 => Value::Null,
                    _ => json!({ "nested": String::arbitrary(g) }),
                };
                merge_fields.insert(key, value);
            }

            Self(SubscriberRecord {
                email_address: String::arbitrary(g),
                interests: BTreeMap::arbitrary(g),
                last_changed: String::arbitrary(g),
                list_id: String::arbitrary(g),
                member_rating: i64::arbitrary(g),
                average_click_rate: i64::arbitrary(g),
                average_open_rate: i64::arbitrary(g),
                merge_fields,
                timestamp_signup: String::arbitrary(g),
                status: String::arbitrary(g),
                unique_email_id: Option::arbitrary(g),
            })
        }
    }

    #[quickcheck_macros::quickcheck]
    fn any_record_round_trips_through_model(record: AnyRecord) -> bool {
        Subscriber::from(record.0.clone()).to_record() == record.0
    }

    #[test]
    fn sparse_record_with_mixed_merge_values_round_trips() {
        let mut merge_fields = Map::new();
        merge_fields.insert("FNAME".to_string(), json!("null"));
        merge_fields.insert("ISACTIVE".to_string(), json!(1));
        merge_fields.insert("ISMEMBER".to_string(), json!(false));
        merge_fields.insert("BIRTHDAY".to_string(), Value::Null);
        merge_fields.insert("ADDRESS".to_string(), json!({ "city": "Miami" }));
        let record = SubscriberRecord {
            email_address: "al@whereby.us".to_string(),
            merge_fields,
            unique_email_id: None,
            ..SubscriberRecord::default()
        };

        let subscriber = Subscriber::from(record.clone());

        assert_eq!(subscriber.unique_id(), None);
        assert!(subscriber.interests().is_empty());
        assert_eq!(subscriber.first_name(), "");
        assert_eq!(subscriber.to_record(), record);
    }

    #[test]
    fn empty_record_round_trips() {
        let subscriber = Subscriber::from(SubscriberRecord::default());

        assert_eq!(subscriber, Subscriber::new());
        assert_eq!(subscriber.to_record(), SubscriberRecord::default());
    }

    #[test]
    fn first_and_last_name_read_merge_fields() {
        let subscriber = Subscriber::from(test_subscriber_record("al@whereby.us"));

        assert_eq!(subscriber.first_name(), "Al");
        assert_eq!(subscriber.last_name(), "Pal");
    }

    #[test]
    fn literal_null_names_are_treated_as_absent() {
        let mut subscriber = Subscriber::new();
        subscriber.set_first_name("null");
        subscriber.set_last_name("NULL");

        assert_eq!(subscriber.first_name(), "");
        assert_eq!(subscriber.last_name(), "");
    }

    #[test]
    fn name_setters_write_their_own_keys() {
        let mut subscriber = Subscriber::new();
        subscriber.set_first_name("Ada");
        subscriber.set_last_name("Lovelace");

        assert_eq!(subscriber.merge_fields().get("FNAME"), Some(&json!("Ada")));
        assert_eq!(subscriber.merge_fields().get("LNAME"), Some(&json!("Lovelace")));
    }

    #[test]
    fn flag_setters_leave_unknown_merge_fields_untouched() {
        let mut merge_fields = Map::new();
        merge_fields.insert("REFCOUNT".to_string(), json!(3));
        let mut subscriber = Subscriber::new();
        subscriber.set_merge_fields(merge_fields);

        subscriber.set_is_active(1);
        subscriber.set_is_member(true);
        subscriber.set_is_tester(false);

        let fields = subscriber.merge_fields();
        assert_eq!(fields.get("REFCOUNT"), Some(&json!(3)));
        assert_eq!(fields.get("ISACTIVE"), Some(&json!(1)));
        assert_eq!(fields.get("ISMEMBER"), Some(&json!(true)));
        assert_eq!(fields.get("ISTESTER"), Some(&json!(false)));
        assert!(subscriber.is_active());
        assert!(subscriber.is_member());
        assert!(!subscriber.is_tester());
    }

    #[test]
    fn flags_decode_string_values_from_api() {
        let mut merge_fields = Map::new();
        merge_fields.insert("ISACTIVE".to_string(), json!("1"));
        merge_fields.insert("ISMEMBER".to_string(), json!("0"));
        merge_fields.insert("ISTESTER".to_string(), json!(""));
        let mut subscriber = Subscriber::new();
        subscriber.set_merge_fields(merge_fields);

        assert!(subscriber.is_active());
        assert!(!subscriber.is_member());
        assert!(!subscriber.is_tester());
    }

    #[test]
    fn status_parses_known_values() {
        let mut subscriber = Subscriber::new();
        assert_eq!(subscriber.status(), None);

        subscriber.set_subscription_status(SubscriptionStatus::Unsubscribed);

        assert_eq!(subscriber.subscription_status(), "unsubscribed");
        assert_eq!(subscriber.status(), Some(SubscriptionStatus::Unsubscribed));
    }

    #[test]
    fn status_from_str_rejects_unknown() {
        assert_eq!(
            "cleaned".parse::<SubscriptionStatus>().unwrap(),
            SubscriptionStatus::Cleaned
        );
        assert!("active".parse::<SubscriptionStatus>().is_err());
    }

    #[test]
    fn timestamps_are_converted() {
        let subscriber = Subscriber::from(test_subscriber_record("al@whereby.us"));

        assert_eq!(
            subscriber.signed_up_at(),
            Some(Utc.with_ymd_and_hms(2019, 3, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(
            subscriber.last_changed_at(),
            Some(Utc.with_ymd_and_hms(2019, 3, 2, 8, 0, 0).unwrap())
        );
        assert_eq!(Subscriber::new().signed_up_at(), None);
    }
}
