//! Wire types shared between the OTL CMS content API and its consumers.
//!
//! Every shape here is forward compatible: fields the API adds later land in
//! an `extra` map instead of failing deserialization.

mod blog;
mod content;
mod deployment;
mod envelope;
mod paths;

pub use blog::{Blog, BlogCategory, BlogPost, BlogPostsQuery};
pub use content::{
    ResolvedBlogListingContent, ResolvedBlogPostContent, ResolvedContent, ResolvedPageContent,
};
pub use deployment::{Deployment, DeploymentConfig, LocalizedString, PresetConfig, WebsiteConfig};
pub use envelope::ApiResponse;
pub use paths::{
    AllMatches, AllPathsOptions, AllPathsResponse, Pagination, PathEntry, PathResolution,
    RedirectTarget, ResolutionType, ResolveMode, ResolvePathOptions, ResolvePathsRequest,
    ResolvePathsResponse,
};

/// Untyped JSON object used for open-ended API payloads.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
