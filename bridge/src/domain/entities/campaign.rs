//! Campaign inputs
//!
//! Campaign responses are passed through as raw JSON; only the request side
//! has a shape of its own.

/// Everything needed to create a regular campaign for a post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCampaign {
    pub from_name: String,
    pub image_url: String,
    pub list_id: String,
    /// WordPress post the campaign is built from (used for tracing only)
    pub post_id: i64,
    pub reply_to: String,
    pub seo_description: String,
    pub seo_title: String,
    pub subject: String,
}

/// Header settings of an existing campaign
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignSettings {
    pub subject_line: String,
    pub from_name: String,
    pub reply_to: String,
}
