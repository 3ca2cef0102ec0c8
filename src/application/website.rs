//! Process-wide cache of the website section and accessors over it.

use std::sync::{Arc, RwLock};

use chrono_tz::Tz;
use metrics::counter;
use otl_api_types::WebsiteConfig;
use tracing::{debug, warn};

use super::configs::{ConfigFetcher, ConfigQuery};
use super::i18n::localized_string_or_first;
use super::lock::{rw_read, rw_write};
use super::scope::RequestScope;

const SOURCE: &str = "application::website";

pub const WEBSITE_CACHE_HIT_TOTAL: &str = "otl_engine_website_config_cache_hit_total";
pub const WEBSITE_CACHE_MISS_TOTAL: &str = "otl_engine_website_config_cache_miss_total";
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Last-writer-wins slot for one deployment's website config.
///
/// A clear racing a read can cost one extra fetch; nothing worse.
#[derive(Debug, Default)]
pub struct WebsiteConfigCache {
    slot: RwLock<Option<WebsiteConfig>>,
}

impl WebsiteConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<WebsiteConfig> {
        rw_read(&self.slot, SOURCE, "get").clone()
    }

    pub fn set(&self, config: WebsiteConfig) {
        *rw_write(&self.slot, SOURCE, "set") = Some(config);
    }

    pub fn clear(&self) {
        *rw_write(&self.slot, SOURCE, "clear") = None;
    }
}

#[derive(Clone)]
pub struct WebsiteConfigService {
    configs: ConfigFetcher,
    cache: Arc<WebsiteConfigCache>,
}

impl WebsiteConfigService {
    pub fn new(configs: ConfigFetcher, cache: Arc<WebsiteConfigCache>) -> Self {
        Self { configs, cache }
    }

    /// Cached website section; fetched on first use.
    ///
    /// Nothing is cached when the deployment has no website section.
    pub async fn get_website_config(&self) -> Option<WebsiteConfig> {
        if let Some(cached) = self.cache.get() {
            counter!(WEBSITE_CACHE_HIT_TOTAL).increment(1);
            return Some(cached);
        }
        counter!(WEBSITE_CACHE_MISS_TOTAL).increment(1);

        let configs = self
            .configs
            .fetch_configs(&RequestScope::detached(), &ConfigQuery::default())
            .await?;
        if configs.is_empty() {
            debug!("deployment returned an empty config");
            return None;
        }

        let website = configs.website?;
        self.cache.set(website.clone());
        Some(website)
    }

    pub fn clear_config_cache(&self) {
        self.cache.clear();
    }

    /// Site name in `locale`, any translation if missing, `""` without config.
    pub async fn get_site_name(&self, locale: &str) -> String {
        match self.get_website_config().await {
            Some(config) => localized_string_or_first(config.site_name.as_ref(), locale),
            None => String::new(),
        }
    }

    pub async fn get_site_description(&self, locale: &str) -> String {
        match self.get_website_config().await {
            Some(config) => localized_string_or_first(config.description.as_ref(), locale),
            None => String::new(),
        }
    }

    /// Configured timezone name as stored, `"UTC"` when unset.
    pub async fn get_timezone_name(&self) -> String {
        self.get_website_config()
            .await
            .and_then(|config| config.timezone)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string())
    }

    /// Configured timezone; UTC when unset or not an IANA name.
    pub async fn get_timezone(&self) -> Tz {
        let name = self.get_timezone_name().await;
        name.parse::<Tz>().unwrap_or_else(|err| {
            warn!(timezone = %name, error = %err, "unknown timezone, using UTC");
            Tz::UTC
        })
    }
}
