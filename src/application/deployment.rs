//! Structural validation of deployment configs and derived site metadata.

use std::collections::BTreeMap;

use otl_api_types::{
    Deployment, DeploymentConfig, JsonMap, PresetConfig, ResolvedBlogListingContent,
    ResolvedBlogPostContent, ResolvedPageContent, WebsiteConfig,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use super::i18n::{build_hreflang_alternates, locale_to_og_format, resolve_localized};

pub const FALLBACK_SITE_NAME: &str = "Website";
pub const HOSTED_DOMAIN: &str = "otl.studio";

/// Deployment section with its locale fields guaranteed present.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedDeployment<'a> {
    pub deployment: &'a Deployment,
    pub supported_locales: &'a [String],
    pub default_locale: &'a str,
}

/// A [`DeploymentConfig`] with every section a render needs.
///
/// Optional sections (theme, analytics, ...) stay reachable through `config`.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedDeploymentConfig<'a> {
    pub config: &'a DeploymentConfig,
    pub deployment: ValidatedDeployment<'a>,
    pub website: &'a WebsiteConfig,
    pub header: &'a PresetConfig,
    pub footer: &'a PresetConfig,
    pub favicon: &'a PresetConfig,
}

/// Site-level data for page metadata. Built per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContext {
    pub site_url: String,
    pub site_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_description: Option<String>,
    pub locale: String,
    pub og_locale: String,
    pub hreflang: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_handle: Option<String>,
}

pub fn is_valid_deployment(
    configs: Option<&DeploymentConfig>,
) -> Option<ValidatedDeploymentConfig<'_>> {
    let config = configs.filter(|config| !config.is_empty())?;
    let deployment = config.deployment.as_ref()?;
    let supported_locales = deployment
        .supported_locales
        .as_deref()
        .filter(|locales| !locales.is_empty())?;
    let default_locale = deployment
        .default_locale
        .as_deref()
        .filter(|locale| !locale.is_empty())?;

    Some(ValidatedDeploymentConfig {
        config,
        deployment: ValidatedDeployment {
            deployment,
            supported_locales,
            default_locale,
        },
        website: config.website.as_ref()?,
        header: config.header.as_ref()?,
        footer: config.footer.as_ref()?,
        favicon: config.favicon.as_ref()?,
    })
}

pub fn build_site_context(
    configs: &ValidatedDeploymentConfig<'_>,
    locale: &str,
    path: &str,
    site_url_override: Option<&str>,
) -> SiteContext {
    let site_url = resolve_site_url(configs.deployment.deployment, site_url_override);
    let website = configs.website;

    SiteContext {
        site_name: resolve_localized(website.site_name.as_ref(), locale)
            .unwrap_or(FALLBACK_SITE_NAME)
            .to_string(),
        site_description: resolve_localized(website.description.as_ref(), locale)
            .map(str::to_string),
        locale: locale.to_string(),
        og_locale: locale_to_og_format(locale),
        hreflang: build_hreflang_alternates(
            &site_url,
            path,
            configs.deployment.supported_locales,
            configs.deployment.default_locale,
        ),
        twitter_handle: website
            .twitter_handle
            .clone()
            .filter(|handle| !handle.is_empty()),
        site_url,
    }
}

/// Public origin of the site, without trailing `/`.
fn resolve_site_url(deployment: &Deployment, site_url_override: Option<&str>) -> String {
    let url = match site_url_override.filter(|url| !url.is_empty()) {
        Some(url) => url.to_string(),
        None => match deployment
            .custom_domains
            .as_deref()
            .and_then(<[String]>::first)
            .filter(|d| !d.is_empty())
        {
            Some(domain) => format!("https://{domain}"),
            None => format!(
                "https://{}.{HOSTED_DOMAIN}",
                deployment.subdomain.as_deref().unwrap_or_default()
            ),
        },
    };
    url.trim_end_matches('/').to_string()
}

pub fn parse_page_content(raw: Option<&JsonMap>) -> Option<ResolvedPageContent> {
    parse_content(raw, "page")
}

pub fn parse_blog_post_content(raw: Option<&JsonMap>) -> Option<ResolvedBlogPostContent> {
    parse_content(raw, "blog_post")
}

pub fn parse_blog_listing_content(raw: Option<&JsonMap>) -> Option<ResolvedBlogListingContent> {
    parse_content(raw, "blog_listing")
}

fn parse_content<T: DeserializeOwned>(raw: Option<&JsonMap>, shape: &'static str) -> Option<T> {
    match serde_json::from_value(Value::Object(raw?.clone())) {
        Ok(content) => Some(content),
        Err(err) => {
            debug!(shape, error = %err, "resolved content has an unexpected shape");
            None
        }
    }
}
