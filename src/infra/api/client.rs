use async_trait::async_trait;
use otl_api_types::{
    AllPathsOptions, AllPathsResponse, ApiResponse, Blog, BlogCategory, BlogPost, BlogPostsQuery,
    DeploymentConfig, PathResolution, ResolvePathOptions, ResolvePathsRequest,
    ResolvePathsResponse,
};
use reqwest::{Client, RequestBuilder, Url, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::api::{ApiError, CmsApi};
use crate::config::ApiSettings;
use crate::infra::error::InfraError;

type Query = Vec<(&'static str, String)>;

/// [`CmsApi`] over HTTP, authenticated with an optional bearer token.
#[derive(Clone, Debug)]
pub struct HttpCmsApi {
    client: Client,
    base: Url,
    deployment_id: String,
    token: Option<String>,
}

impl HttpCmsApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, InfraError> {
        let mut builder = Client::builder().user_agent(Self::user_agent());
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| {
            InfraError::configuration(format!("failed to build HTTP client: {err}"))
        })?;

        Ok(Self {
            client,
            base: settings.base_url.clone(),
            deployment_id: settings.deployment_id.clone(),
            token: settings.token.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("otl-engine/", env!("CARGO_PKG_VERSION"))
    }

    /// `{base}/api/v1/{segments...}?{query}`; segments are percent-encoded.
    fn url(&self, segments: &[&str], query: &Query) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: Query,
    ) -> Result<ApiResponse<T>, ApiError> {
        let url = self.url(segments, &query)?;
        debug!(url = %url, "GET content API");
        self.send(self.client.get(url)).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(ApiError::transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::transport)?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

fn push_opt<T: ToString>(query: &mut Query, key: &'static str, value: Option<T>) {
    if let Some(value) = value {
        query.push((key, value.to_string()));
    }
}

#[async_trait]
impl CmsApi for HttpCmsApi {
    fn deployment_id(&self) -> &str {
        &self.deployment_id
    }

    async fn fetch_configs(
        &self,
        deployment_id: &str,
        locale: Option<&str>,
        header_preset_id: Option<&str>,
        footer_preset_id: Option<&str>,
    ) -> Result<ApiResponse<DeploymentConfig>, ApiError> {
        let mut query = Query::new();
        push_opt(&mut query, "locale", locale);
        push_opt(&mut query, "header_preset_id", header_preset_id);
        push_opt(&mut query, "footer_preset_id", footer_preset_id);
        self.get(&["deployments", deployment_id, "configs"], query)
            .await
    }

    async fn resolve_path(
        &self,
        deployment_id: &str,
        path: &str,
        locale: &str,
        options: Option<&ResolvePathOptions>,
    ) -> Result<ApiResponse<PathResolution>, ApiError> {
        let mut query = vec![("path", path.to_string()), ("locale", locale.to_string())];
        if let Some(options) = options {
            push_opt(&mut query, "fetch_content", options.fetch_content);
            push_opt(&mut query, "mode", options.mode.map(|mode| mode.as_str()));
            push_opt(&mut query, "page", options.page);
            push_opt(&mut query, "per_page", options.per_page);
            push_opt(&mut query, "search_query", options.search_query.as_deref());
        }
        self.get(&["deployments", deployment_id, "paths", "resolve"], query)
            .await
    }

    async fn resolve_paths(
        &self,
        deployment_id: &str,
        paths: &[String],
        locale: &str,
        fetch_content: bool,
    ) -> Result<ApiResponse<ResolvePathsResponse>, ApiError> {
        let url = self.url(
            &["deployments", deployment_id, "paths", "resolve"],
            &Query::new(),
        )?;
        let body = ResolvePathsRequest {
            paths: paths.to_vec(),
            locale: locale.to_string(),
            fetch_content,
        };
        debug!(url = %url, count = paths.len(), "POST content API");
        self.send(self.client.post(url).json(&body)).await
    }

    async fn fetch_all_paths(
        &self,
        deployment_id: &str,
        locale: &str,
        options: Option<AllPathsOptions>,
    ) -> Result<ApiResponse<AllPathsResponse>, ApiError> {
        let mut query = vec![("locale", locale.to_string())];
        if let Some(options) = options {
            push_opt(&mut query, "limit", options.limit);
            push_opt(&mut query, "offset", options.offset);
        }
        self.get(&["deployments", deployment_id, "paths"], query)
            .await
    }

    async fn fetch_blogs(&self, deployment_id: &str) -> Result<ApiResponse<Vec<Blog>>, ApiError> {
        self.get(&["deployments", deployment_id, "blogs"], Query::new())
            .await
    }

    async fn fetch_blog_posts(
        &self,
        blog_id: &str,
        query: Option<&BlogPostsQuery>,
    ) -> Result<ApiResponse<Vec<BlogPost>>, ApiError> {
        let mut params = Query::new();
        if let Some(query) = query {
            push_opt(&mut params, "page", query.page);
            push_opt(&mut params, "limit", query.limit);
            push_opt(&mut params, "category", query.category.as_deref());
        }
        self.get(&["blogs", blog_id, "posts"], params).await
    }

    async fn fetch_blog_post(
        &self,
        blog_id: &str,
        post_slug: &str,
    ) -> Result<ApiResponse<BlogPost>, ApiError> {
        self.get(&["blogs", blog_id, "posts", post_slug], Query::new())
            .await
    }

    async fn fetch_blog_categories(
        &self,
        blog_id: &str,
    ) -> Result<ApiResponse<Vec<BlogCategory>>, ApiError> {
        self.get(&["blogs", blog_id, "categories"], Query::new())
            .await
    }
}
