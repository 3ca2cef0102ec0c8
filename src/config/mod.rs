//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::paths::DEFAULT_SITEMAP_PAGE_SIZE;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "otl-engine";
const ENV_PREFIX: &str = "OTL_ENGINE";

/// Command-line arguments for the `otl-engine` inspection binary.
#[derive(Debug, Parser)]
#[command(
    name = "otl-engine",
    version,
    about = "Inspect what the engine sees for an OTL deployment"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "OTL_ENGINE_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Fetch the deployment configuration.
    Configs(ConfigsArgs),
    /// Resolve a URL path and show the render decision.
    Resolve(ResolveArgs),
    /// List every sitemap path of the deployment.
    Sitemap(SitemapArgs),
    /// Build the site context (canonical URL, hreflang, OG locale) for a path.
    #[command(name = "site-context")]
    SiteContext(SiteContextArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Configs(ConfigsArgs::default())
    }
}

#[derive(Debug, Args, Default, Clone)]
pub struct ConfigsArgs {
    /// Locale to fetch localized presets for.
    #[arg(long, value_name = "LOCALE")]
    pub locale: Option<String>,

    /// Header preset to include instead of the deployment default.
    #[arg(long = "header-preset", value_name = "ID")]
    pub header_preset_id: Option<String>,

    /// Footer preset to include instead of the deployment default.
    #[arg(long = "footer-preset", value_name = "ID")]
    pub footer_preset_id: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ResolveArgs {
    /// URL path to resolve, e.g. `/about`.
    #[arg(value_name = "PATH")]
    pub path: String,

    #[arg(long, default_value = "en", value_name = "LOCALE")]
    pub locale: String,

    /// Ask the API to embed the resolved content.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub fetch_content: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SitemapArgs {
    #[arg(long, default_value = "en", value_name = "LOCALE")]
    pub locale: String,

    /// Page size used while paginating through all paths.
    #[arg(long, default_value_t = DEFAULT_SITEMAP_PAGE_SIZE, value_name = "COUNT")]
    pub limit: u32,
}

#[derive(Debug, Args, Clone)]
pub struct SiteContextArgs {
    /// Request path, optionally prefixed by a locale (e.g. `/de/about`).
    #[arg(value_name = "PATH")]
    pub path: String,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the content API base URL.
    #[arg(long = "api-base-url", value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

    /// Override the deployment identifier.
    #[arg(long = "deployment-id", value_name = "ID", global = true)]
    pub deployment_id: Option<String>,

    /// Override the content API request timeout.
    #[arg(long = "api-timeout-seconds", value_name = "SECONDS", global = true)]
    pub api_timeout_seconds: Option<u64>,

    /// Override the public site URL used for canonical links.
    #[arg(long = "site-url", value_name = "URL", global = true)]
    pub site_url: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub site: SiteSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub deployment_id: String,
    pub token: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct SiteSettings {
    /// Canonical origin to use instead of the one derived from the deployment.
    pub url_override: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    site: RawSiteSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(url) = overrides.api_base_url.as_ref() {
            self.api.base_url = Some(url.clone());
        }
        if let Some(id) = overrides.deployment_id.as_ref() {
            self.api.deployment_id = Some(id.clone());
        }
        if let Some(seconds) = overrides.api_timeout_seconds {
            self.api.timeout_seconds = Some(seconds);
        }
        if let Some(url) = overrides.site_url.as_ref() {
            self.site.url_override = Some(url.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings { api, site, logging } = raw;

        Ok(Self {
            api: build_api_settings(api)?,
            site: build_site_settings(site),
            logging: build_logging_settings(logging)?,
        })
    }
}

fn build_api_settings(api: RawApiSettings) -> Result<ApiSettings, LoadError> {
    let raw_url = non_blank(api.base_url)
        .ok_or_else(|| LoadError::invalid("api.base_url", "a content API URL is required"))?;
    let base_url = Url::parse(&raw_url)
        .map_err(|err| LoadError::invalid("api.base_url", format!("failed to parse: {err}")))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "api.base_url",
            format!("unsupported scheme `{}`", base_url.scheme()),
        ));
    }

    let deployment_id = non_blank(api.deployment_id)
        .ok_or_else(|| LoadError::invalid("api.deployment_id", "must not be empty"))?;

    let timeout = match api.timeout_seconds {
        Some(0) => {
            return Err(LoadError::invalid(
                "api.timeout_seconds",
                "must be greater than zero",
            ));
        }
        Some(seconds) => Some(Duration::from_secs(seconds)),
        None => None,
    };

    Ok(ApiSettings {
        base_url,
        deployment_id,
        token: non_blank(api.token),
        timeout,
    })
}

fn build_site_settings(site: RawSiteSettings) -> SiteSettings {
    SiteSettings {
        url_override: non_blank(site.url_override),
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
    deployment_id: Option<String>,
    token: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    url_override: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}
