use std::{process, sync::Arc};

use otl_api_types::{PathResolution, ResolvePathOptions};
use otl_engine_utils::{
    application::{
        api::CmsApi,
        configs::{ConfigFetcher, ConfigQuery},
        deployment::{SiteContext, build_site_context, is_valid_deployment},
        dispatch::{PathDecision, handle_path_resolution},
        error::AppError,
        locale::resolve_locale_from_segments,
        paths::PathService,
        scope::RequestScope,
    },
    config::{self, Command, ConfigsArgs, ResolveArgs, Settings, SiteContextArgs, SitemapArgs},
    infra::{api::HttpCmsApi, telemetry},
};
use serde::Serialize;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let chain = error.messages();
    if dispatcher::has_been_set() {
        error!(error = %error, chain = ?chain, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, chain = ?chain, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;
    let command = cli_args.command.unwrap_or_default();

    telemetry::init(&settings.logging)?;
    let api: Arc<dyn CmsApi> = Arc::new(HttpCmsApi::new(&settings.api)?);
    info!(
        target = "otl_engine::cli",
        base_url = %settings.api.base_url,
        deployment_id = %settings.api.deployment_id,
        "content API client ready"
    );

    match command {
        Command::Configs(args) => run_configs(api, args).await,
        Command::Resolve(args) => run_resolve(api, args).await,
        Command::Sitemap(args) => run_sitemap(api, args).await,
        Command::SiteContext(args) => run_site_context(api, &settings, args).await,
    }
}

async fn run_configs(api: Arc<dyn CmsApi>, args: ConfigsArgs) -> Result<(), AppError> {
    let query = ConfigQuery {
        locale: args.locale,
        header_preset_id: args.header_preset_id,
        footer_preset_id: args.footer_preset_id,
    };
    let configs = ConfigFetcher::new(api)
        .fetch_configs(&RequestScope::detached(), &query)
        .await
        .ok_or_else(|| AppError::not_found("deployment configs"))?;
    print_json(&configs)
}

#[derive(Serialize)]
struct ResolveOutput {
    resolution: PathResolution,
    decision: PathDecision,
}

async fn run_resolve(api: Arc<dyn CmsApi>, args: ResolveArgs) -> Result<(), AppError> {
    let options = ResolvePathOptions {
        fetch_content: Some(args.fetch_content),
        ..Default::default()
    };
    let resolution = PathService::new(api)
        .resolve_path(
            &RequestScope::detached(),
            &args.path,
            &args.locale,
            Some(&options),
        )
        .await?;
    let decision = handle_path_resolution(&resolution);
    print_json(&ResolveOutput {
        resolution,
        decision,
    })
}

async fn run_sitemap(api: Arc<dyn CmsApi>, args: SitemapArgs) -> Result<(), AppError> {
    if args.limit == 0 {
        return Err(AppError::validation("--limit must be greater than zero"));
    }
    let entries = PathService::new(api)
        .generate_sitemap_data(&args.locale, args.limit)
        .await?;
    info!(
        target = "otl_engine::cli",
        locale = %args.locale,
        count = entries.len(),
        "sitemap collected"
    );
    print_json(&entries)
}

async fn run_site_context(
    api: Arc<dyn CmsApi>,
    settings: &Settings,
    args: SiteContextArgs,
) -> Result<(), AppError> {
    let configs = ConfigFetcher::new(api)
        .fetch_configs(&RequestScope::detached(), &ConfigQuery::default())
        .await;
    let validated = is_valid_deployment(configs.as_ref())
        .ok_or_else(|| AppError::validation("deployment config is missing required sections"))?;

    let segments: Vec<String> = args
        .path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();
    let full_path = format!("/{}", segments.join("/"));
    let matched = resolve_locale_from_segments(&segments, &full_path, &validated.deployment);

    let context: SiteContext = build_site_context(
        &validated,
        &matched.locale,
        &matched.path,
        settings.site.url_override.as_deref(),
    );
    print_json(&context)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::unexpected(format!("failed to render output: {err}")))?;
    println!("{out}");
    Ok(())
}
