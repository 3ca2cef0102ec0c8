//! Named shapes for the content maps embedded in path resolutions.
//!
//! The API sends these as open objects. Known fields are typed; anything else
//! stays reachable through `extra`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::JsonMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_protected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_preset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_preset_id: Option<String>,
    /// Raw A/B test variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBlogPostContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_protected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_preset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_preset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBlogListingContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Content attached to a resolution, shaped by the resolution type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedContent {
    Page(ResolvedPageContent),
    BlogPost(ResolvedBlogPostContent),
    BlogListing(ResolvedBlogListingContent),
}

impl ResolvedContent {
    /// Fields this client has no named slot for.
    pub fn extra(&self) -> &JsonMap {
        match self {
            ResolvedContent::Page(page) => &page.extra,
            ResolvedContent::BlogPost(post) => &post.extra,
            ResolvedContent::BlogListing(listing) => &listing.extra,
        }
    }
}
