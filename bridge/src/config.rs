use std::env;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    /// Base URL of the Mailchimp API, e.g. `https://us7.api.mailchimp.com/3.0`
    pub api_url: String,
    /// Per-request timeout handed to the HTTP transport
    pub timeout: Duration,
    /// List id used when the WordPress option is unset
    pub fallback_list_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("MAILCHIMP_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("MAILCHIMP_API_KEY"))?;

        let api_url = match env::var("MAILCHIMP_API_URL") {
            Ok(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => api_url_for_key(&api_key)?,
        };

        let timeout = match env::var("MAILCHIMP_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: "MAILCHIMP_TIMEOUT_SECS",
                    message: e.to_string(),
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_key,
            api_url,
            timeout,
            fallback_list_id: env::var("MC_LIST_ID").ok().filter(|id| !id.is_empty()),
        })
    }
}

/// Derive the API root from the data-center suffix of a key (`<key>-us7`)
pub fn api_url_for_key(api_key: &str) -> Result<String, ConfigError> {
    match api_key.rsplit_once('-') {
        Some((_, dc)) if !dc.is_empty() && dc.chars().all(|c| c.is_ascii_alphanumeric()) => {
            Ok(format!("https://{}.api.mailchimp.com/3.0", dc))
        }
        _ => Err(ConfigError::Invalid {
            name: "MAILCHIMP_API_KEY",
            message: "expected a data-center suffix such as '-us7'".to_string(),
        }),
    }
}
