//! Seam to the remote content/configuration API.

use async_trait::async_trait;
use otl_api_types::{
    AllPathsOptions, AllPathsResponse, ApiResponse, Blog, BlogCategory, BlogPost, BlogPostsQuery,
    DeploymentConfig, PathResolution, ResolvePathOptions, ResolvePathsResponse,
};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response body: {0}")]
    Decode(String),
    #[error("invalid request URL: {0}")]
    Url(String),
}

impl ApiError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Access denied or resource missing: the deployment simply has nothing to serve.
    pub fn is_unavailable(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => matches!(status, 403 | 404),
            other => {
                let message = other.to_string();
                message.contains("403") || message.contains("404")
            }
        }
    }
}

/// Operations the engine consumes from the content API.
///
/// Every call returns the raw envelope; deciding whether a failed envelope is
/// absorbed or surfaced belongs to the calling service.
#[async_trait]
pub trait CmsApi: Send + Sync {
    fn deployment_id(&self) -> &str;

    async fn fetch_configs(
        &self,
        deployment_id: &str,
        locale: Option<&str>,
        header_preset_id: Option<&str>,
        footer_preset_id: Option<&str>,
    ) -> Result<ApiResponse<DeploymentConfig>, ApiError>;

    async fn resolve_path(
        &self,
        deployment_id: &str,
        path: &str,
        locale: &str,
        options: Option<&ResolvePathOptions>,
    ) -> Result<ApiResponse<PathResolution>, ApiError>;

    async fn resolve_paths(
        &self,
        deployment_id: &str,
        paths: &[String],
        locale: &str,
        fetch_content: bool,
    ) -> Result<ApiResponse<ResolvePathsResponse>, ApiError>;

    async fn fetch_all_paths(
        &self,
        deployment_id: &str,
        locale: &str,
        options: Option<AllPathsOptions>,
    ) -> Result<ApiResponse<AllPathsResponse>, ApiError>;

    async fn fetch_blogs(&self, deployment_id: &str) -> Result<ApiResponse<Vec<Blog>>, ApiError>;

    async fn fetch_blog_posts(
        &self,
        blog_id: &str,
        query: Option<&BlogPostsQuery>,
    ) -> Result<ApiResponse<Vec<BlogPost>>, ApiError>;

    async fn fetch_blog_post(
        &self,
        blog_id: &str,
        post_slug: &str,
    ) -> Result<ApiResponse<BlogPost>, ApiError>;

    async fn fetch_blog_categories(
        &self,
        blog_id: &str,
    ) -> Result<ApiResponse<Vec<BlogCategory>>, ApiError>;
}
