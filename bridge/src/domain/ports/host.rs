//! WordPress host port
//!
//! Options storage and outgoing mail, as provided by the surrounding site.

use async_trait::async_trait;

use crate::error::HostError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WordPressHost: Send + Sync {
    /// Read a stored option. `Ok(None)` when it has never been set.
    async fn get_option(&self, key: &str) -> Result<Option<String>, HostError>;

    /// Persist an option, returning whether the value changed
    async fn update_option(&self, key: &str, value: &str) -> Result<bool, HostError>;

    /// Hand a message to the site's mailer
    async fn send_mail(&self, to: &str, subject: &str, body: &str) -> Result<bool, HostError>;
}
