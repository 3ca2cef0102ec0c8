//! Per-request memoization of remote lookups.
//!
//! A [`RequestScope`] lives for one render pass and is passed explicitly to
//! every service call that should be deduplicated. Outside a request, use
//! [`RequestScope::detached`], which never memoizes.

use std::{convert::Infallible, sync::Arc};

use axum::{extract::FromRequestParts, http::request::Parts};
use dashmap::DashMap;
use otl_api_types::{DeploymentConfig, PathResolution, ResolvePathOptions};
use uuid::Uuid;

use super::configs::ConfigQuery;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ResolutionKey {
    pub path: String,
    pub locale: String,
    pub options: Option<ResolvePathOptions>,
}

#[derive(Debug, Default)]
struct ScopeCaches {
    configs: DashMap<ConfigQuery, Option<DeploymentConfig>>,
    resolutions: DashMap<ResolutionKey, PathResolution>,
}

#[derive(Debug, Clone)]
pub struct RequestScope {
    id: Arc<str>,
    caches: Option<Arc<ScopeCaches>>,
}

impl RequestScope {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Arc::from(id.into()),
            caches: Some(Arc::new(ScopeCaches::default())),
        }
    }

    /// A scope with a fresh random identifier.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// A scope that memoizes nothing: every lookup reaches the API.
    pub fn detached() -> Self {
        Self {
            id: Arc::from("detached"),
            caches: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_detached(&self) -> bool {
        self.caches.is_none()
    }

    pub(crate) fn cached_configs(&self, query: &ConfigQuery) -> Option<Option<DeploymentConfig>> {
        let caches = self.caches.as_ref()?;
        caches.configs.get(query).map(|entry| entry.value().clone())
    }

    pub(crate) fn store_configs(&self, query: ConfigQuery, configs: Option<DeploymentConfig>) {
        if let Some(caches) = &self.caches {
            caches.configs.insert(query, configs);
        }
    }

    pub(crate) fn cached_resolution(&self, key: &ResolutionKey) -> Option<PathResolution> {
        let caches = self.caches.as_ref()?;
        caches.resolutions.get(key).map(|entry| entry.value().clone())
    }

    pub(crate) fn store_resolution(&self, key: ResolutionKey, resolution: PathResolution) {
        if let Some(caches) = &self.caches {
            caches.resolutions.insert(key, resolution);
        }
    }
}

impl<S> FromRequestParts<S> for RequestScope
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestScope>()
            .cloned()
            .unwrap_or_else(RequestScope::detached))
    }
}
