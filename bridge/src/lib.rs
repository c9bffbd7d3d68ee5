//! WhereBy.Us Mailchimp bridge
//!
//! Translates site-side actions (subscribe, update a profile, send a campaign,
//! tag or unsubscribe a member) into Mailchimp REST calls and maps the loosely
//! typed responses into records and models.
//! Uses hexagonal (ports & adapters) architecture: the transport, the hosting
//! site and alerting are all injected.

use std::sync::Arc;

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod telemetry;

#[cfg(test)]
mod test_utils;

pub use adapters::{MailChimpApiRepository, MailChimpHttpClient, TracingAlertSink};
pub use app::MailChimpService;
pub use config::Config;
pub use domain::entities::{CampaignSettings, NewCampaign, Segment, Subscriber, SubscriptionStatus};
pub use domain::ports::{AlertSink, MailChimpRepository, MailChimpTransport, WordPressHost};
pub use domain::records::{SegmentRecord, SubscriberRecord};
pub use error::{ConfigError, HostError, MailChimpError, TransportError};

/// Wire the HTTP transport and repository for a site and return the service.
pub fn connect(
    config: &Config,
    host: Arc<dyn WordPressHost>,
    alerts: Arc<dyn AlertSink>,
) -> Result<MailChimpService<MailChimpApiRepository>, TransportError> {
    let transport = MailChimpHttpClient::from_config(config)?;
    tracing::debug!(api_url = %config.api_url, "Mailchimp transport ready");

    let repository = MailChimpApiRepository::new(Arc::new(transport), host, alerts)
        .with_fallback_list_id(config.fallback_list_id.clone());

    Ok(MailChimpService::new(Arc::new(repository)))
}
