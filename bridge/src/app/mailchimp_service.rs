//! Mailchimp service
//!
//! Thin layer over the repository that hands out domain models instead of
//! wire records. Holds no state of its own.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::entities::{
    CampaignSettings, NewCampaign, Segment, Subscriber, SubscriptionStatus,
};
use crate::domain::ports::MailChimpRepository;
use crate::domain::records::SubscriberRecord;

/// Service for Mailchimp lists, members and campaigns
pub struct MailChimpService<R>
where
    R: MailChimpRepository,
{
    repository: Arc<R>,
}

impl<R> MailChimpService<R>
where
    R: MailChimpRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    // ------------------------------------------------------------------------
    // Campaigns
    // ------------------------------------------------------------------------

    pub async fn create_campaign(&self, campaign: &NewCampaign) -> Option<Value> {
        self.repository.create_campaign(campaign).await
    }

    pub async fn get_campaign_by_id(&self, campaign_id: &str) -> Option<Value> {
        self.repository.get_campaign_by_id(campaign_id).await
    }

    pub async fn send_campaign(&self, campaign_id: &str) -> bool {
        self.repository.send_campaign(campaign_id).await
    }

    pub async fn send_test_newsletter(&self, email: &str, campaign_id: &str) -> bool {
        self.repository.send_test_newsletter(email, campaign_id).await
    }

    pub async fn update_campaign_content_by_id(&self, campaign_id: &str, content: &str) -> bool {
        self.repository
            .update_campaign_content_by_id(campaign_id, content)
            .await
    }

    pub async fn update_campaign_settings_by_id(
        &self,
        campaign_id: &str,
        settings: &CampaignSettings,
    ) -> Option<Value> {
        self.repository
            .update_campaign_settings_by_id(campaign_id, settings)
            .await
    }

    // ------------------------------------------------------------------------
    // Lists
    // ------------------------------------------------------------------------

    pub async fn get_list_id(&self) -> String {
        self.repository.get_list_id().await
    }

    pub async fn get_list_members_from_api(&self, list_id: &str, offset: u32) -> Vec<Subscriber> {
        to_subscribers(
            self.repository
                .get_list_members_from_api(list_id, offset)
                .await,
        )
    }

    pub async fn get_list_subscriber_count(&self, list_id: &str) -> i64 {
        self.repository.get_list_subscriber_count(list_id).await
    }

    pub async fn get_lists_from_api(&self) -> Vec<Value> {
        self.repository.get_lists_from_api().await
    }

    pub async fn get_root_information_from_api(&self) -> Map<String, Value> {
        self.repository.get_root_information_from_api().await
    }

    pub async fn get_signup_location_interest_id(&self) -> String {
        self.repository.get_signup_location_interest_id().await
    }

    pub async fn get_signup_locations_from_api(&self, list_id: &str) -> Vec<Value> {
        self.repository.get_signup_locations_from_api(list_id).await
    }

    // ------------------------------------------------------------------------
    // Segments
    // ------------------------------------------------------------------------

    pub async fn get_segment_by_id(&self, list_id: &str, segment_id: &str) -> Option<Segment> {
        self.repository
            .get_segment_by_id(list_id, segment_id)
            .await
            .map(Segment::from)
    }

    pub async fn get_segments(&self, list_id: &str) -> Vec<Segment> {
        self.repository
            .get_segments(list_id)
            .await
            .into_iter()
            .map(Segment::from)
            .collect()
    }

    // ------------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------------

    pub async fn get_subscriber_by_email(&self, list_id: &str, email: &str) -> Option<Subscriber> {
        self.repository
            .get_subscriber_by_email(list_id, email)
            .await
            .map(Subscriber::from)
    }

    pub async fn get_subscriber_by_unique_id(
        &self,
        list_id: &str,
        unique_id: &str,
    ) -> Option<Subscriber> {
        self.repository
            .get_subscriber_by_unique_id(list_id, unique_id)
            .await
            .map(Subscriber::from)
    }

    pub async fn subscribe_member(
        &self,
        list_id: &str,
        email: &str,
        tags: &[String],
        merge_fields: &Map<String, Value>,
    ) -> Option<Subscriber> {
        self.repository
            .subscribe_member(list_id, email, tags, merge_fields)
            .await
            .map(Subscriber::from)
    }

    pub async fn update_subscriber(
        &self,
        email: &str,
        list_id: &str,
        merge_fields: &Map<String, Value>,
    ) -> bool {
        self.repository
            .update_subscriber(email, list_id, merge_fields)
            .await
    }

    pub async fn update_subscriber_merge_tag(
        &self,
        email: &str,
        list_id: &str,
        merge_tag: &str,
        value: &Value,
    ) -> bool {
        self.repository
            .update_subscriber_merge_tag(email, list_id, merge_tag, value)
            .await
    }

    pub async fn update_subscription_preference(
        &self,
        subscriber: &Subscriber,
        list_id: &str,
    ) -> Option<Subscriber> {
        self.repository
            .update_subscription_preference(&SubscriberRecord::from(subscriber), list_id)
            .await
            .map(Subscriber::from)
    }

    /// Unsubscribe a member from a list.
    ///
    /// `subscriber` is left untouched; only the copy sent to Mailchimp carries
    /// the new status. True only when Mailchimp reports the member as
    /// `unsubscribed` afterwards.
    pub async fn unsubscribe(&self, subscriber: &Subscriber, list_id: &str) -> bool {
        let mut leaving = subscriber.clone();
        leaving.set_subscription_status(SubscriptionStatus::Unsubscribed);

        match self
            .repository
            .update_subscription_preference(&leaving.to_record(), list_id)
            .await
        {
            Some(stored) => stored.status == SubscriptionStatus::Unsubscribed.as_str(),
            None => false,
        }
    }

    pub async fn tag_subscriber_by_email(&self, list_id: &str, email: &str, tag: &str) -> bool {
        self.repository
            .tag_subscriber_by_email(list_id, email, tag)
            .await
    }

    pub async fn remove_tag_from_subscriber_by_email(
        &self,
        list_id: &str,
        email: &str,
        tag: &str,
    ) -> bool {
        self.repository
            .remove_tag_from_subscriber_by_email(list_id, email, tag)
            .await
    }

    // ------------------------------------------------------------------------
    // WordPress
    // ------------------------------------------------------------------------

    pub async fn mail_from_wordpress(&self, email: &str, subject: &str, message: &str) -> bool {
        self.repository
            .mail_from_wordpress(email, subject, message)
            .await
    }

    pub async fn update_mailchimp_settings_in_wordpress(&self, key: &str) -> bool {
        self.repository
            .update_mailchimp_settings_in_wordpress(key)
            .await
    }

    pub fn get_last_error(&self) -> String {
        self.repository.get_last_error()
    }
}

fn to_subscribers(records: Vec<SubscriberRecord>) -> Vec<Subscriber> {
    records.into_iter().map(Subscriber::from).collect()
}
