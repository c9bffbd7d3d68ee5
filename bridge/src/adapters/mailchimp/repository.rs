//! Mailchimp repository
//!
//! Talks to the transport, classifies every outcome and collapses failures
//! into the sentinel documented on each port method.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_default_from_null;
use serde_json::{json, Map, Value};
use urlencoding::encode;

use super::hashing::subscriber_hash;
use super::social_card::strip_pictographs;
use crate::domain::entities::{CampaignSettings, NewCampaign};
use crate::domain::ports::{AlertSink, MailChimpRepository, MailChimpTransport, WordPressHost};
use crate::domain::records::de::{self, read_or_default};
use crate::domain::records::{SegmentRecord, SubscriberRecord};
use crate::error::{MailChimpError, TransportError};

/// Site option holding the Mailchimp API key
pub const OPTION_API_KEY: &str = "options_mcapi_key";
/// Site option holding the default list id
pub const OPTION_LIST_ID: &str = "options_mclist_id";
/// Site option holding the signup location interest category id
pub const OPTION_SIGNUP_LOCATION_ID: &str = "mcsignup_location";
pub const DEFAULT_SIGNUP_LOCATION_ID: &str = "af44a7a082";

const SEGMENT_PAGE_SIZE: u32 = 20;
const UNIQUE_ID_FIELDS: &str = "members.email_address,members.unique_email_id";

/// Repository over the Mailchimp API and the hosting WordPress site
pub struct MailChimpApiRepository {
    transport: Arc<dyn MailChimpTransport>,
    host: Arc<dyn WordPressHost>,
    alerts: Arc<dyn AlertSink>,
    fallback_list_id: Option<String>,
}

impl MailChimpApiRepository {
    pub fn new(
        transport: Arc<dyn MailChimpTransport>,
        host: Arc<dyn WordPressHost>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            transport,
            host,
            alerts,
            fallback_list_id: None,
        }
    }

    /// List id used when the site option is unset
    pub fn with_fallback_list_id(mut self, list_id: Option<String>) -> Self {
        self.fallback_list_id = list_id.filter(|id| !id.is_empty());
        self
    }

    fn classify(&self, result: Result<Value, TransportError>) -> Result<Value, MailChimpError> {
        match result {
            Err(e) => {
                // `last_error` is shared by every request on the transport and a
                // concurrent call may have replaced it. Use it only when it
                // describes the failure in hand.
                let in_hand = e.to_string();
                let last_error = self.transport.last_error();
                let message = if !last_error.is_empty() && in_hand.contains(&last_error) {
                    last_error
                } else {
                    in_hand
                };
                Err(MailChimpError::Transport(message))
            }
            Ok(payload) => match api_failure(&payload) {
                Some(err) => Err(err),
                None => Ok(payload),
            },
        }
    }

    async fn api_get(&self, path: &str, params: Value) -> Result<Value, MailChimpError> {
        self.classify(self.transport.get(path, &params).await)
    }

    async fn api_post(&self, path: &str, params: Value) -> Result<Value, MailChimpError> {
        self.classify(self.transport.post(path, &params).await)
    }

    async fn api_put(&self, path: &str, params: Value) -> Result<Value, MailChimpError> {
        self.classify(self.transport.put(path, &params).await)
    }

    async fn api_patch(&self, path: &str, params: Value) -> Result<Value, MailChimpError> {
        self.classify(self.transport.patch(path, &params).await)
    }

    async fn option_or(&self, key: &str, fallback: Option<&str>) -> String {
        match self.host.get_option(key).await {
            Ok(Some(value)) if !value.is_empty() => value,
            Ok(_) => fallback.unwrap_or_default().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, option = key, "Failed to read site option");
                fallback.unwrap_or_default().to_string()
            }
        }
    }

    async fn change_tag(&self, list_id: &str, email: &str, tag: &str, status: &str) -> bool {
        let path = format!("{}/tags", member_path(list_id, email));
        let body = json!({ "tags": [{ "name": tag, "status": status }] });

        match self.api_post(&path, body).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, tag, status, "Tag change rejected");
                false
            }
        }
    }
}

/// `Api` error for a payload reporting a numeric `status >= 400`
fn api_failure(payload: &Value) -> Option<MailChimpError> {
    let status = payload.get("status")?.as_u64()?;
    if status < 400 {
        return None;
    }

    let details = match payload.get("details").or_else(|| payload.get("detail")) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    Some(MailChimpError::Api {
        status: u16::try_from(status).unwrap_or(u16::MAX),
        details,
    })
}

fn list_path(list_id: &str) -> String {
    format!("lists/{}", encode(list_id))
}

fn member_path(list_id: &str, email: &str) -> String {
    format!("{}/members/{}", list_path(list_id), subscriber_hash(email))
}

fn campaign_path(campaign_id: &str) -> String {
    format!("campaigns/{}", encode(campaign_id))
}

// Envelopes the collection endpoints wrap their items in. Items stay raw so
// one malformed entry cannot empty the whole page.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MembersPage {
    #[serde(deserialize_with = "deserialize_default_from_null")]
    members: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListsPage {
    #[serde(deserialize_with = "deserialize_default_from_null")]
    lists: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InterestsPage {
    #[serde(deserialize_with = "deserialize_default_from_null")]
    interests: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SegmentsPage {
    #[serde(deserialize_with = "deserialize_default_from_null")]
    segments: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListResponse {
    #[serde(deserialize_with = "deserialize_default_from_null")]
    stats: ListStats,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListStats {
    #[serde(deserialize_with = "de::int")]
    member_count: i64,
}

/// A member payload counts as found only with a non-null `id`
fn has_id(payload: &Value) -> bool {
    payload.get("id").is_some_and(|id| !id.is_null())
}

#[async_trait]
impl MailChimpRepository for MailChimpApiRepository {
    #[tracing::instrument(
        skip_all,
        fields(post_id = campaign.post_id, list_id = %campaign.list_id)
    )]
    async fn create_campaign(&self, campaign: &NewCampaign) -> Option<Value> {
        let body = json!({
            "recipients": { "list_id": campaign.list_id },
            "settings": {
                "from_name": campaign.from_name,
                "reply_to": campaign.reply_to,
                "subject_line": campaign.subject,
                "use_conversation": false,
            },
            "social_card": {
                "description": strip_pictographs(&campaign.seo_description),
                "image_url": campaign.image_url,
                "title": campaign.seo_title,
            },
            "type": "regular",
        });

        match self.api_post("campaigns", body).await {
            Ok(created) => Some(created),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create campaign");
                None
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_campaign_by_id(&self, campaign_id: &str) -> Option<Value> {
        self.api_get(&campaign_path(campaign_id), json!({}))
            .await
            .map_err(|e| tracing::debug!(error = %e, "Campaign lookup failed"))
            .ok()
    }

    #[tracing::instrument(skip(self))]
    async fn send_campaign(&self, campaign_id: &str) -> bool {
        let path = format!("{}/actions/send", campaign_path(campaign_id));
        match self.api_post(&path, json!({})).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to send campaign");
                false
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn send_test_newsletter(&self, email: &str, campaign_id: &str) -> bool {
        let path = format!("{}/actions/test", campaign_path(campaign_id));
        let body = json!({ "test_emails": [email], "send_type": "html" });

        match self.api_post(&path, body).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to send test newsletter");
                false
            }
        }
    }

    #[tracing::instrument(skip(self, content), fields(content_len = content.len()))]
    async fn update_campaign_content_by_id(&self, campaign_id: &str, content: &str) -> bool {
        let path = format!("{}/content", campaign_path(campaign_id));
        match self.api_put(&path, json!({ "html": content })).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to update campaign content");
                false
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign_settings_by_id(
        &self,
        campaign_id: &str,
        settings: &CampaignSettings,
    ) -> Option<Value> {
        let body = json!({
            "settings": {
                "subject_line": settings.subject_line,
                "reply_to": settings.reply_to,
                "from_name": settings.from_name,
            }
        });

        self.api_patch(&campaign_path(campaign_id), body)
            .await
            .map_err(|e| tracing::warn!(error = %e, "Failed to update campaign settings"))
            .ok()
    }

    async fn get_list_id(&self) -> String {
        self.option_or(OPTION_LIST_ID, self.fallback_list_id.as_deref())
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_list_members_from_api(
        &self,
        list_id: &str,
        offset: u32,
    ) -> Vec<SubscriberRecord> {
        let path = format!("{}/members", list_path(list_id));
        match self.api_get(&path, json!({ "offset": offset })).await {
            Ok(payload) => read_or_default::<MembersPage>(&payload)
                .members
                .iter()
                .map(SubscriberRecord::from_payload)
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list members");
                Vec::new()
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_list_subscriber_count(&self, list_id: &str) -> i64 {
        match self.api_get(&list_path(list_id), json!({})).await {
            Ok(list) => read_or_default::<ListResponse>(&list).stats.member_count,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read list stats");
                0
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_lists_from_api(&self) -> Vec<Value> {
        match self.api_get("lists", json!({})).await {
            Ok(payload) => read_or_default::<ListsPage>(&payload).lists,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read lists");
                Vec::new()
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_root_information_from_api(&self) -> Map<String, Value> {
        match self.api_get("", json!({})).await {
            Ok(Value::Object(root)) => root,
            Ok(_) => Map::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read API root");
                Map::new()
            }
        }
    }

    async fn get_signup_location_interest_id(&self) -> String {
        self.option_or(OPTION_SIGNUP_LOCATION_ID, Some(DEFAULT_SIGNUP_LOCATION_ID))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_signup_locations_from_api(&self, list_id: &str) -> Vec<Value> {
        let category_id = self.get_signup_location_interest_id().await;
        let path = format!(
            "{}/interest-categories/{}/interests",
            list_path(list_id),
            encode(&category_id)
        );

        match self.api_get(&path, json!({})).await {
            Ok(payload) => read_or_default::<InterestsPage>(&payload).interests,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    category_id = %category_id,
                    "Failed to read signup locations"
                );
                Vec::new()
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_segment_by_id(&self, list_id: &str, segment_id: &str) -> Option<SegmentRecord> {
        let path = format!("{}/segments/{}", list_path(list_id), encode(segment_id));
        self.api_get(&path, json!({}))
            .await
            .map(|segment| SegmentRecord::from_payload(&segment))
            .map_err(|e| tracing::debug!(error = %e, "Segment lookup failed"))
            .ok()
    }

    #[tracing::instrument(skip(self))]
    async fn get_segments(&self, list_id: &str) -> Vec<SegmentRecord> {
        let path = format!("{}/segments", list_path(list_id));
        match self.api_get(&path, json!({ "count": SEGMENT_PAGE_SIZE })).await {
            Ok(payload) => read_or_default::<SegmentsPage>(&payload)
                .segments
                .iter()
                .map(SegmentRecord::from_payload)
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read segments");
                Vec::new()
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_subscriber_by_email(
        &self,
        list_id: &str,
        email: &str,
    ) -> Option<SubscriberRecord> {
        match self.api_get(&member_path(list_id, email), json!({})).await {
            Ok(member) if has_id(&member) => {
                Some(SubscriberRecord::from_payload(&member))
            }
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "Member lookup failed");
                None
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_subscriber_by_unique_id(
        &self,
        list_id: &str,
        unique_id: &str,
    ) -> Option<SubscriberRecord> {
        let path = format!("{}/members", list_path(list_id));
        let query = json!({ "unique_email_id": unique_id, "fields": UNIQUE_ID_FIELDS });

        let payload = match self.api_get(&path, query).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(error = %e, "Member lookup by unique id failed");
                return None;
            }
        };

        if let Some(member) = read_or_default::<MembersPage>(&payload).members.first() {
            return Some(SubscriberRecord::from_payload(member));
        }
        has_id(&payload).then(|| SubscriberRecord::from_payload(&payload))
    }

    #[tracing::instrument(skip(self, merge_fields))]
    async fn subscribe_member(
        &self,
        list_id: &str,
        email: &str,
        tags: &[String],
        merge_fields: &Map<String, Value>,
    ) -> Option<SubscriberRecord> {
        let mut body = Map::new();
        body.insert("email_address".to_string(), json!(email));
        body.insert("status".to_string(), json!("subscribed"));
        if !merge_fields.is_empty() {
            body.insert("merge_fields".to_string(), Value::Object(merge_fields.clone()));
        }
        if !tags.is_empty() {
            body.insert("tags".to_string(), json!(tags));
        }

        let path = format!("{}/members", list_path(list_id));
        match self.api_post(&path, Value::Object(body)).await {
            Ok(member) => Some(SubscriberRecord::from_payload(&member)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to subscribe member");
                None
            }
        }
    }

    #[tracing::instrument(skip(self, merge_fields))]
    async fn update_subscriber(
        &self,
        email: &str,
        list_id: &str,
        merge_fields: &Map<String, Value>,
    ) -> bool {
        let arguments = json!({
            "email_address": email,
            "merge_fields": merge_fields,
        });

        match self
            .api_patch(&member_path(list_id, email), arguments.clone())
            .await
        {
            Ok(_) => true,
            Err(e) => {
                self.alerts.warning(
                    &format!("We're unable to update {} on {}.", email, list_id),
                    &json!({ "exception": e.to_string(), "arguments": arguments }),
                );
                false
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn update_subscriber_merge_tag(
        &self,
        email: &str,
        list_id: &str,
        merge_tag: &str,
        value: &Value,
    ) -> bool {
        let mut merge_fields = Map::new();
        merge_fields.insert(merge_tag.to_string(), value.clone());
        let arguments = json!({
            "email_address": email,
            "merge_fields": merge_fields,
        });

        match self
            .api_patch(&member_path(list_id, email), arguments.clone())
            .await
        {
            Ok(_) => true,
            Err(e) => {
                let shown = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                self.alerts.warning(
                    &format!(
                        "We were unable to update the tag {} for {} on {} to the value {}",
                        merge_tag, email, list_id, shown
                    ),
                    &json!({ "exception": e.to_string(), "arguments": arguments }),
                );
                false
            }
        }
    }

    #[tracing::instrument(skip_all, fields(list_id = %list_id, status = %subscriber.status))]
    async fn update_subscription_preference(
        &self,
        subscriber: &SubscriberRecord,
        list_id: &str,
    ) -> Option<SubscriberRecord> {
        let mut body = Map::new();
        body.insert("email_address".to_string(), json!(subscriber.email_address));
        body.insert("status".to_string(), json!(subscriber.status));
        if !subscriber.interests.is_empty() {
            body.insert("interests".to_string(), json!(subscriber.interests));
        }

        let path = member_path(list_id, &subscriber.email_address);
        match self.api_patch(&path, Value::Object(body)).await {
            Ok(member) => Some(SubscriberRecord::from_payload(&member)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to update subscription preference");
                None
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn tag_subscriber_by_email(&self, list_id: &str, email: &str, tag: &str) -> bool {
        self.change_tag(list_id, email, tag, "active").await
    }

    #[tracing::instrument(skip(self))]
    async fn remove_tag_from_subscriber_by_email(
        &self,
        list_id: &str,
        email: &str,
        tag: &str,
    ) -> bool {
        self.change_tag(list_id, email, tag, "inactive").await
    }

    #[tracing::instrument(skip(self, message))]
    async fn mail_from_wordpress(&self, email: &str, subject: &str, message: &str) -> bool {
        match self.host.send_mail(email, subject, message).await {
            Ok(sent) => sent,
            Err(e) => {
                tracing::warn!(error = %e, "Site mailer failed");
                false
            }
        }
    }

    #[tracing::instrument(skip_all)]
    async fn update_mailchimp_settings_in_wordpress(&self, key: &str) -> bool {
        match self.host.update_option(OPTION_API_KEY, key).await {
            Ok(updated) => updated,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to store API key");
                false
            }
        }
    }

    fn get_last_error(&self) -> String {
        self.transport.last_error()
    }
}
