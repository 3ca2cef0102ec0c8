//! URL path resolution and sitemap aggregation.

use std::sync::Arc;

use otl_api_types::{
    AllPathsOptions, AllPathsResponse, PathResolution, ResolutionType, ResolvePathOptions,
};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::api::{ApiError, CmsApi};
use super::scope::{RequestScope, ResolutionKey};

pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_SITEMAP_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("failed to resolve path: {path}")]
    Resolve {
        path: String,
        #[source]
        source: Option<ApiError>,
    },
    #[error("failed to resolve paths")]
    ResolveBatch {
        #[source]
        source: Option<ApiError>,
    },
    #[error("failed to get all paths")]
    AllPaths {
        #[source]
        source: Option<ApiError>,
    },
}

/// One routable path of the deployment, as listed in the sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone)]
pub struct PathService {
    api: Arc<dyn CmsApi>,
}

impl PathService {
    pub fn new(api: Arc<dyn CmsApi>) -> Self {
        Self { api }
    }

    /// Resolve one path, memoized in `scope` on path, locale and options.
    ///
    /// Only successful resolutions are memoized.
    pub async fn resolve_path(
        &self,
        scope: &RequestScope,
        path: &str,
        locale: &str,
        options: Option<&ResolvePathOptions>,
    ) -> Result<PathResolution, PathError> {
        let key = ResolutionKey {
            path: path.to_string(),
            locale: locale.to_string(),
            options: options.cloned(),
        };
        if let Some(resolution) = scope.cached_resolution(&key) {
            return Ok(resolution);
        }

        let response = self
            .api
            .resolve_path(self.api.deployment_id(), path, locale, options)
            .await
            .map_err(|err| PathError::Resolve {
                path: path.to_string(),
                source: Some(err),
            })?;
        let resolution = response.into_data().ok_or_else(|| PathError::Resolve {
            path: path.to_string(),
            source: None,
        })?;

        scope.store_resolution(key, resolution.clone());
        Ok(resolution)
    }

    /// Resolve several paths in one round trip. Results keep the input order.
    pub async fn resolve_paths(
        &self,
        paths: &[String],
        locale: &str,
        fetch_content: bool,
    ) -> Result<Vec<PathResolution>, PathError> {
        let response = self
            .api
            .resolve_paths(self.api.deployment_id(), paths, locale, fetch_content)
            .await
            .map_err(|err| PathError::ResolveBatch { source: Some(err) })?;
        response
            .into_data()
            .map(|data| data.results)
            .ok_or(PathError::ResolveBatch { source: None })
    }

    pub async fn fetch_all_paths(
        &self,
        locale: &str,
        options: Option<AllPathsOptions>,
    ) -> Result<AllPathsResponse, PathError> {
        let response = self
            .api
            .fetch_all_paths(self.api.deployment_id(), locale, options)
            .await
            .map_err(|err| PathError::AllPaths { source: Some(err) })?;
        response
            .into_data()
            .ok_or(PathError::AllPaths { source: None })
    }

    /// Whether `path` resolves to anything. Resolution failures count as absent.
    pub async fn path_exists(&self, scope: &RequestScope, path: &str, locale: &str) -> bool {
        self.fetch_path_content_type(scope, path, locale)
            .await
            .is_some()
    }

    pub async fn fetch_path_content_type(
        &self,
        scope: &RequestScope,
        path: &str,
        locale: &str,
    ) -> Option<String> {
        match self.resolve_path(scope, path, locale, None).await {
            Ok(resolution) if resolution.kind != ResolutionType::NotFound => {
                Some(resolution.kind.to_string())
            }
            Ok(_) => None,
            Err(err) => {
                debug!(path, locale, error = %err, "path probe failed");
                None
            }
        }
    }

    /// Walk every page of routable paths, skipping redirects.
    ///
    /// Pages are requested `limit` at a time until the API reports no next
    /// page; any page failure aborts the walk.
    pub async fn generate_sitemap_data(
        &self,
        locale: &str,
        limit: u32,
    ) -> Result<Vec<SitemapEntry>, PathError> {
        let mut entries = Vec::new();
        let mut offset = 0u32;

        loop {
            let page = self
                .fetch_all_paths(
                    locale,
                    Some(AllPathsOptions {
                        limit: Some(limit),
                        offset: Some(offset),
                    }),
                )
                .await?;
            debug!(
                locale,
                offset,
                returned = page.paths.len(),
                has_next = page.pagination.has_next,
                "fetched sitemap page"
            );

            entries.extend(
                page.paths
                    .into_iter()
                    .filter(|entry| entry.content_type != "redirect")
                    .map(|entry| SitemapEntry {
                        path: entry.path,
                        kind: entry.content_type,
                    }),
            );

            if !page.pagination.has_next {
                break;
            }
            offset = offset.saturating_add(limit);
        }

        Ok(entries)
    }
}
