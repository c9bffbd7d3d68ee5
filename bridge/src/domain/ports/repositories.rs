//! Repository port trait
//!
//! The Mailchimp repository is the boundary where every transport or API
//! failure is absorbed. No method returns an error: each one answers with a
//! value or with the sentinel documented on it (`None`, `false`, `0`, empty).

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::entities::{CampaignSettings, NewCampaign};
use crate::domain::records::{SegmentRecord, SubscriberRecord};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailChimpRepository: Send + Sync {
    // Campaigns

    /// Create a regular campaign. `None` on failure.
    async fn create_campaign(&self, campaign: &NewCampaign) -> Option<Value>;

    /// Fetch a campaign. `None` on failure.
    async fn get_campaign_by_id(&self, campaign_id: &str) -> Option<Value>;

    /// Send a campaign to its list
    async fn send_campaign(&self, campaign_id: &str) -> bool;

    /// Send a test copy of a campaign to one address
    async fn send_test_newsletter(&self, email: &str, campaign_id: &str) -> bool;

    /// Replace the HTML content of a campaign
    async fn update_campaign_content_by_id(&self, campaign_id: &str, content: &str) -> bool;

    /// Update subject, sender and reply-to. `None` on failure.
    async fn update_campaign_settings_by_id(
        &self,
        campaign_id: &str,
        settings: &CampaignSettings,
    ) -> Option<Value>;

    // Lists

    /// Configured list id, falling back to the environment, else empty
    async fn get_list_id(&self) -> String;

    /// One page of list members starting at `offset`
    async fn get_list_members_from_api(&self, list_id: &str, offset: u32)
        -> Vec<SubscriberRecord>;

    /// `stats.member_count` of a list, 0 on failure
    async fn get_list_subscriber_count(&self, list_id: &str) -> i64;

    /// All lists of the account as raw objects
    async fn get_lists_from_api(&self) -> Vec<Value>;

    /// API root resource (account details), empty on failure
    async fn get_root_information_from_api(&self) -> Map<String, Value>;

    /// Interest category id holding the signup locations
    async fn get_signup_location_interest_id(&self) -> String;

    /// Interests of the signup location category
    async fn get_signup_locations_from_api(&self, list_id: &str) -> Vec<Value>;

    // Segments

    async fn get_segment_by_id(&self, list_id: &str, segment_id: &str) -> Option<SegmentRecord>;

    /// First page (20) of segments of a list
    async fn get_segments(&self, list_id: &str) -> Vec<SegmentRecord>;

    // Members

    async fn get_subscriber_by_email(&self, list_id: &str, email: &str)
        -> Option<SubscriberRecord>;

    async fn get_subscriber_by_unique_id(
        &self,
        list_id: &str,
        unique_id: &str,
    ) -> Option<SubscriberRecord>;

    /// Add a member as `subscribed`
    async fn subscribe_member(
        &self,
        list_id: &str,
        email: &str,
        tags: &[String],
        merge_fields: &Map<String, Value>,
    ) -> Option<SubscriberRecord>;

    /// Replace merge fields of a member. Logs a warning on failure.
    async fn update_subscriber(
        &self,
        email: &str,
        list_id: &str,
        merge_fields: &Map<String, Value>,
    ) -> bool;

    /// Set a single merge field. Logs a warning on failure.
    async fn update_subscriber_merge_tag(
        &self,
        email: &str,
        list_id: &str,
        merge_tag: &str,
        value: &Value,
    ) -> bool;

    /// Write status (and interests) of a member, returning the stored member
    async fn update_subscription_preference(
        &self,
        subscriber: &SubscriberRecord,
        list_id: &str,
    ) -> Option<SubscriberRecord>;

    async fn tag_subscriber_by_email(&self, list_id: &str, email: &str, tag: &str) -> bool;

    async fn remove_tag_from_subscriber_by_email(
        &self,
        list_id: &str,
        email: &str,
        tag: &str,
    ) -> bool;

    // WordPress

    async fn mail_from_wordpress(&self, email: &str, subject: &str, message: &str) -> bool;

    /// Store the Mailchimp API key in the site options
    async fn update_mailchimp_settings_in_wordpress(&self, key: &str) -> bool;

    /// Last transport error message
    fn get_last_error(&self) -> String;
}
