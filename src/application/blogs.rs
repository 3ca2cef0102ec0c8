//! Blog listings, posts and categories.

use std::sync::Arc;

use otl_api_types::{ApiResponse, Blog, BlogCategory, BlogPost, BlogPostsQuery};
use tracing::warn;

use super::api::{ApiError, CmsApi};

#[derive(Clone)]
pub struct BlogService {
    api: Arc<dyn CmsApi>,
}

impl BlogService {
    pub fn new(api: Arc<dyn CmsApi>) -> Self {
        Self { api }
    }

    /// Every blog of the configured deployment.
    pub async fn fetch_blogs(&self) -> Option<Vec<Blog>> {
        let deployment_id = self.api.deployment_id();
        let result = self.api.fetch_blogs(deployment_id).await;
        absorb(result, "failed to fetch blogs", deployment_id)
    }

    pub async fn fetch_blog_posts(
        &self,
        blog_id: &str,
        query: Option<&BlogPostsQuery>,
    ) -> Option<Vec<BlogPost>> {
        let result = self.api.fetch_blog_posts(blog_id, query).await;
        absorb(result, "failed to fetch blog posts", blog_id)
    }

    pub async fn fetch_blog_post(&self, blog_id: &str, post_slug: &str) -> Option<BlogPost> {
        match self.api.fetch_blog_post(blog_id, post_slug).await {
            Ok(response) => response.into_data(),
            Err(err) => {
                warn!(
                    target = "otl_engine::blogs",
                    subject = blog_id,
                    post_slug,
                    error = %err,
                    "failed to fetch blog post"
                );
                None
            }
        }
    }

    pub async fn fetch_blog_categories(&self, blog_id: &str) -> Option<Vec<BlogCategory>> {
        let result = self.api.fetch_blog_categories(blog_id).await;
        absorb(result, "failed to fetch blog categories", blog_id)
    }
}

fn absorb<T>(
    result: Result<ApiResponse<T>, ApiError>,
    what: &'static str,
    subject: &str,
) -> Option<T> {
    match result {
        Ok(response) => response.into_data(),
        Err(err) => {
            warn!(target = "otl_engine::blogs", subject, error = %err, "{what}");
            None
        }
    }
}
