//! Locale detection from the forwarded request path.

use otl_api_types::DeploymentConfig;
use tracing::debug;

use super::configs::{ConfigFetcher, ConfigQuery};
use super::deployment::ValidatedDeployment;
use super::paths::DEFAULT_LOCALE;
use super::request::{PATHNAME_HEADER, RequestContext};
use super::scope::RequestScope;

#[derive(Debug, Clone, PartialEq)]
pub struct DetectedLocale {
    pub locale: String,
    pub configs: Option<DeploymentConfig>,
}

/// Locale named by a path prefix and the path that remains after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleMatch {
    pub locale: String,
    pub path: String,
}

#[derive(Clone)]
pub struct LocaleDetector {
    configs: ConfigFetcher,
}

impl LocaleDetector {
    pub fn new(configs: ConfigFetcher) -> Self {
        Self { configs }
    }

    /// Locale of the current request, falling back to the deployment default.
    ///
    /// Never fails: a missing request context or header yields the default.
    pub async fn detect(&self, scope: &RequestScope, ctx: &dyn RequestContext) -> DetectedLocale {
        let configs = self
            .configs
            .fetch_configs(scope, &ConfigQuery::default())
            .await;
        let deployment = configs.as_ref().and_then(|c| c.deployment.as_ref());

        let default_locale = deployment
            .and_then(|d| d.default_locale.as_deref())
            .filter(|locale| !locale.is_empty())
            .unwrap_or(DEFAULT_LOCALE)
            .to_string();
        let supported = deployment
            .and_then(|d| d.supported_locales.clone())
            .unwrap_or_else(|| vec![default_locale.clone()]);

        let pathname = match ctx.header(PATHNAME_HEADER) {
            Ok(pathname) => pathname.unwrap_or_default(),
            Err(err) => {
                debug!(error = %err, "request path unavailable, using default locale");
                String::new()
            }
        };
        let first = pathname
            .strip_prefix('/')
            .unwrap_or(&pathname)
            .split('/')
            .next()
            .unwrap_or_default();

        let locale = match_locale(first, &supported)
            .map(str::to_string)
            .unwrap_or(default_locale);
        DetectedLocale { locale, configs }
    }
}

/// Split a locale prefix off `segments`, if the first one names a supported locale.
pub fn resolve_locale_from_segments(
    segments: &[String],
    full_path: &str,
    deployment: &ValidatedDeployment<'_>,
) -> LocaleMatch {
    let first = segments.first().map(String::as_str).unwrap_or_default();

    match match_locale(first, deployment.supported_locales) {
        Some(locale) => LocaleMatch {
            locale: locale.to_string(),
            path: format!("/{}", segments[1..].join("/")),
        },
        None => LocaleMatch {
            locale: deployment.default_locale.to_string(),
            path: full_path.to_string(),
        },
    }
}

/// Case-insensitive lookup returning the supported locale's own casing.
fn match_locale<'a>(segment: &str, supported: &'a [String]) -> Option<&'a str> {
    if segment.is_empty() {
        return None;
    }
    let segment = segment.to_lowercase();
    supported
        .iter()
        .find(|locale| locale.to_lowercase() == segment)
        .map(String::as_str)
}
