use std::fmt;

use serde::{Deserialize, Serialize};

use crate::JsonMap;

/// Kind of content a URL path resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResolutionType {
    Page,
    BlogPost,
    BlogCategory,
    Redirect,
    /// The path matched more than one content type.
    Multiple,
    NotFound,
    /// A type this client does not know yet.
    Unknown(String),
}

impl ResolutionType {
    pub fn as_str(&self) -> &str {
        match self {
            ResolutionType::Page => "page",
            ResolutionType::BlogPost => "blog_post",
            ResolutionType::BlogCategory => "blog_category",
            ResolutionType::Redirect => "redirect",
            ResolutionType::Multiple => "multiple",
            ResolutionType::NotFound => "not_found",
            ResolutionType::Unknown(other) => other,
        }
    }
}

impl From<String> for ResolutionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "page" => ResolutionType::Page,
            "blog_post" => ResolutionType::BlogPost,
            "blog_category" => ResolutionType::BlogCategory,
            "redirect" => ResolutionType::Redirect,
            "multiple" => ResolutionType::Multiple,
            "not_found" => ResolutionType::NotFound,
            _ => ResolutionType::Unknown(value),
        }
    }
}

impl From<ResolutionType> for String {
    fn from(value: ResolutionType) -> Self {
        match value {
            ResolutionType::Unknown(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ResolutionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving a single URL path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResolution {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ResolutionType,
    pub locale: String,
    #[serde(default)]
    pub cache_ttl: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_matches: Option<AllMatches>,
}

impl PathResolution {
    /// A bare resolution with no content, redirect or match bundle attached.
    pub fn new(path: impl Into<String>, kind: ResolutionType, locale: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            locale: locale.into(),
            cache_ttl: 0,
            content_id: None,
            content: None,
            redirect: None,
            status_code: None,
            all_matches: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedirectTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string_behavior: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Bundle of every content item an ambiguous path matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllMatches {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_match: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectTarget>,
    /// Per-type matches (`page`, `blog_post`, ...).
    #[serde(flatten)]
    pub extra: JsonMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMode {
    Default,
    All,
}

impl ResolveMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolveMode::Default => "default",
            ResolveMode::All => "all",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvePathOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_content: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ResolveMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

/// Body of the batch resolution call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvePathsRequest {
    pub paths: Vec<String>,
    pub locale: String,
    pub fetch_content: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvePathsResponse {
    pub results: Vec<PathResolution>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllPathsOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    pub path: String,
    pub content_type: String,
    #[serde(default)]
    pub locale: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

/// One page of every routable path of a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllPathsResponse {
    pub paths: Vec<PathEntry>,
    pub pagination: Pagination,
}
