//! Test fixtures
//!
//! Factory functions for Mailchimp payloads and the records built from them.

use serde_json::{json, Value};

use crate::domain::entities::NewCampaign;
use crate::domain::records::SubscriberRecord;

/// A complete list member payload as the members endpoints return it
pub fn member_payload(email: &str) -> Value {
    json!({
        "id": "223923k2k23923k",
        "email_address": email,
        "unique_email_id": "20",
        "status": "subscribed",
        "merge_fields": {
            "FNAME": "Al",
            "LNAME": "Pal",
            "ISACTIVE": 1,
            "ISMEMBER": "0",
        },
        "interests": { "af44a7a082": true },
        "stats": { "avg_open_rate": 80, "avg_click_rate": 55 },
        "timestamp_signup": "2019-03-01T10:00:00+00:00",
        "member_rating": 4,
        "last_changed": "2019-03-02T10:00:00+02:00",
        "list_id": "123456",
    })
}

/// Record built from [`member_payload`]
pub fn test_subscriber_record(email: &str) -> SubscriberRecord {
    SubscriberRecord::from_payload(&member_payload(email))
}

/// Problem body for a rejected call
pub fn api_error_payload(status: u16, details: &str) -> Value {
    json!({
        "type": "http://developer.mailchimp.com/documentation/mailchimp/guides/error-glossary/",
        "title": "Invalid Resource",
        "status": status,
        "details": details,
        "instance": "",
    })
}

pub fn test_campaign() -> NewCampaign {
    NewCampaign {
        from_name: "The New Tropic".to_string(),
        image_url: "https://example.com/brunch.jpg".to_string(),
        list_id: "123456".to_string(),
        post_id: 42,
        reply_to: "hello@whereby.us".to_string(),
        seo_description: "Miami's best brunch spots".to_string(),
        seo_title: "Brunch, ranked".to_string(),
        subject: "Your weekend plans".to_string(),
    }
}
