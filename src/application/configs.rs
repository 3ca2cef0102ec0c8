//! Deployment configuration fetching.

use std::sync::Arc;

use otl_api_types::DeploymentConfig;
use tracing::{debug, error};

use super::api::CmsApi;
use super::scope::RequestScope;

/// Optional selectors of a configuration fetch; also the memoization key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ConfigQuery {
    pub locale: Option<String>,
    pub header_preset_id: Option<String>,
    pub footer_preset_id: Option<String>,
}

impl ConfigQuery {
    pub fn for_locale(locale: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct ConfigFetcher {
    api: Arc<dyn CmsApi>,
}

impl ConfigFetcher {
    pub fn new(api: Arc<dyn CmsApi>) -> Self {
        Self { api }
    }

    /// Fetch every configuration section of the deployment in one call.
    ///
    /// Failures never surface: a failed envelope or a 403/404 yields `None`
    /// silently, any other error is logged first.
    pub async fn fetch_configs(
        &self,
        scope: &RequestScope,
        query: &ConfigQuery,
    ) -> Option<DeploymentConfig> {
        if let Some(cached) = scope.cached_configs(query) {
            debug!(scope = scope.id(), "configs served from request scope");
            return cached;
        }

        let configs = self.fetch_uncached(query).await;
        scope.store_configs(query.clone(), configs.clone());
        configs
    }

    async fn fetch_uncached(&self, query: &ConfigQuery) -> Option<DeploymentConfig> {
        let deployment_id = self.api.deployment_id();
        let result = self
            .api
            .fetch_configs(
                deployment_id,
                query.locale.as_deref(),
                query.header_preset_id.as_deref(),
                query.footer_preset_id.as_deref(),
            )
            .await;

        match result {
            Ok(response) => response.into_data(),
            Err(err) if err.is_unavailable() => None,
            Err(err) => {
                error!(
                    target = "otl_engine::configs",
                    deployment_id,
                    error = %err,
                    "unexpected error while fetching configs"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use otl_api_types::{ApiResponse, Deployment};

    use super::*;
    use crate::application::api::ApiError;
    use crate::application::testing::{Call, FakeCmsApi, count_error_events};

    fn sample_config() -> DeploymentConfig {
        DeploymentConfig {
            deployment: Some(Deployment {
                default_locale: Some("en".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn returns_config_data_on_success() {
        let api = FakeCmsApi::new("test-deploy");
        api.configs.push(Ok(ApiResponse::ok(sample_config())));
        let fetcher = ConfigFetcher::new(api.clone());

        let result = fetcher
            .fetch_configs(&RequestScope::detached(), &ConfigQuery::default())
            .await;

        assert_eq!(result, Some(sample_config()));
        assert_eq!(
            api.calls(),
            vec![Call::FetchConfigs {
                deployment_id: "test-deploy".into(),
                locale: None,
                header_preset_id: None,
                footer_preset_id: None,
            }]
        );
    }

    #[tokio::test]
    async fn returns_none_on_failed_envelope() {
        let api = FakeCmsApi::new("test-deploy");
        api.configs.push(Ok(ApiResponse::failed("nope")));
        let fetcher = ConfigFetcher::new(api);

        let result = fetcher
            .fetch_configs(&RequestScope::detached(), &ConfigQuery::default())
            .await;

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn forbidden_and_missing_are_absorbed_without_logging() {
        for status in [403, 404] {
            let api = FakeCmsApi::new("test-deploy");
            api.configs.push(Err(ApiError::Status {
                status,
                body: String::new(),
            }));
            let fetcher = ConfigFetcher::new(api);

            let (result, errors) = count_error_events(
                fetcher.fetch_configs(&RequestScope::detached(), &ConfigQuery::default()),
            )
            .await;

            assert!(result.is_none());
            assert_eq!(errors, 0, "status {status} must not be logged");
        }
    }

    #[tokio::test]
    async fn unexpected_errors_are_logged() {
        let api = FakeCmsApi::new("test-deploy");
        api.configs
            .push(Err(ApiError::transport("Internal server error")));
        let fetcher = ConfigFetcher::new(api);

        let (result, errors) = count_error_events(
            fetcher.fetch_configs(&RequestScope::detached(), &ConfigQuery::default()),
        )
        .await;

        assert!(result.is_none());
        assert_eq!(errors, 1);
    }

    #[tokio::test]
    async fn passes_optional_parameters() {
        let api = FakeCmsApi::new("test-deploy");
        api.configs.push(Ok(ApiResponse::ok(DeploymentConfig::default())));
        let fetcher = ConfigFetcher::new(api.clone());
        let query = ConfigQuery {
            locale: Some("de".into()),
            header_preset_id: Some("header-1".into()),
            footer_preset_id: Some("footer-1".into()),
        };

        fetcher.fetch_configs(&RequestScope::detached(), &query).await;

        assert_eq!(
            api.calls(),
            vec![Call::FetchConfigs {
                deployment_id: "test-deploy".into(),
                locale: Some("de".into()),
                header_preset_id: Some("header-1".into()),
                footer_preset_id: Some("footer-1".into()),
            }]
        );
    }

    #[tokio::test]
    async fn request_scope_deduplicates_fetches() {
        let api = FakeCmsApi::new("test-deploy");
        api.configs.push(Ok(ApiResponse::ok(sample_config())));
        let fetcher = ConfigFetcher::new(api.clone());
        let scope = RequestScope::new("render-1");

        let first = fetcher.fetch_configs(&scope, &ConfigQuery::default()).await;
        let second = fetcher.fetch_configs(&scope, &ConfigQuery::default()).await;
        fetcher
            .fetch_configs(&scope, &ConfigQuery::for_locale("de"))
            .await;

        assert_eq!(first, second);
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn detached_scope_fetches_every_time() {
        let api = FakeCmsApi::new("test-deploy");
        api.configs.push(Ok(ApiResponse::ok(sample_config())));
        let fetcher = ConfigFetcher::new(api.clone());
        let scope = RequestScope::detached();

        fetcher.fetch_configs(&scope, &ConfigQuery::default()).await;
        fetcher.fetch_configs(&scope, &ConfigQuery::default()).await;

        assert_eq!(api.calls().len(), 2);
    }
}
