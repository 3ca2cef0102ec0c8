use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::JsonMap;

/// Everything the engine needs to render a deployment, fetched in one call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<Deployment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<WebsiteConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<PresetConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<PresetConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<PresetConfig>,
    /// Theme, analytics, colors, fonts and anything else the API sends.
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl DeploymentConfig {
    /// True when the API returned an empty object.
    pub fn is_empty(&self) -> bool {
        self.deployment.is_none()
            && self.website.is_none()
            && self.header.is_none()
            && self.footer.is_none()
            && self.favicon.is_none()
            && self.extra.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_locales: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_locale: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebsiteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_handle: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Header, footer and favicon presets. Their inner layout belongs to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// A text field that is either a single string or translated per locale.
///
/// Translations may be `null` for locales that have not been filled in yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedString {
    Plain(String),
    Localized(BTreeMap<String, Option<String>>),
}

impl From<&str> for LocalizedString {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}
