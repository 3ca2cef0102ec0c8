//! In-memory doubles shared by the service tests.

use std::{
    collections::{BTreeMap, VecDeque},
    fmt,
    future::Future,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use otl_api_types::{
    AllPathsOptions, AllPathsResponse, ApiResponse, Blog, BlogCategory, BlogPost, BlogPostsQuery,
    DeploymentConfig, PathResolution, ResolvePathOptions, ResolvePathsResponse,
};
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    instrument::WithSubscriber,
};
use tracing_subscriber::{
    layer::{Context, Layer, SubscriberExt},
    registry,
};

use super::api::{ApiError, CmsApi};
use super::request::{ContextError, RequestContext};

type Reply<T> = Result<ApiResponse<T>, ApiError>;

/// Programmed replies for one endpoint. The last reply repeats forever.
pub(crate) struct Replies<T> {
    queue: Mutex<VecDeque<Reply<T>>>,
}

impl<T: Clone> Replies<T> {
    pub(crate) fn push(&self, reply: Reply<T>) {
        self.queue.lock().unwrap().push_back(reply);
    }

    fn next(&self) -> Reply<T> {
        let mut queue = self.queue.lock().unwrap();
        if queue.len() > 1 {
            return queue.pop_front().unwrap();
        }
        queue
            .front()
            .cloned()
            .unwrap_or_else(|| Ok(ApiResponse::failed("no reply programmed")))
    }
}

impl<T> Default for Replies<T> {
    fn default() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    FetchConfigs {
        deployment_id: String,
        locale: Option<String>,
        header_preset_id: Option<String>,
        footer_preset_id: Option<String>,
    },
    ResolvePath {
        deployment_id: String,
        path: String,
        locale: String,
        options: Option<ResolvePathOptions>,
    },
    ResolvePaths {
        deployment_id: String,
        paths: Vec<String>,
        locale: String,
        fetch_content: bool,
    },
    FetchAllPaths {
        deployment_id: String,
        locale: String,
        options: Option<AllPathsOptions>,
    },
    FetchBlogs {
        deployment_id: String,
    },
    FetchBlogPosts {
        blog_id: String,
        query: Option<BlogPostsQuery>,
    },
    FetchBlogPost {
        blog_id: String,
        post_slug: String,
    },
    FetchBlogCategories {
        blog_id: String,
    },
}

#[derive(Default)]
pub(crate) struct FakeCmsApi {
    deployment_id: String,
    pub configs: Replies<DeploymentConfig>,
    pub resolve_path: Replies<PathResolution>,
    pub resolve_paths: Replies<ResolvePathsResponse>,
    pub all_paths: Replies<AllPathsResponse>,
    pub blogs: Replies<Vec<Blog>>,
    pub blog_posts: Replies<Vec<BlogPost>>,
    pub blog_post: Replies<BlogPost>,
    pub blog_categories: Replies<Vec<BlogCategory>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeCmsApi {
    pub(crate) fn new(deployment_id: &str) -> Arc<Self> {
        Arc::new(Self {
            deployment_id: deployment_id.to_string(),
            ..Self::default()
        })
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CmsApi for FakeCmsApi {
    fn deployment_id(&self) -> &str {
        &self.deployment_id
    }

    async fn fetch_configs(
        &self,
        deployment_id: &str,
        locale: Option<&str>,
        header_preset_id: Option<&str>,
        footer_preset_id: Option<&str>,
    ) -> Reply<DeploymentConfig> {
        self.record(Call::FetchConfigs {
            deployment_id: deployment_id.to_string(),
            locale: locale.map(str::to_string),
            header_preset_id: header_preset_id.map(str::to_string),
            footer_preset_id: footer_preset_id.map(str::to_string),
        });
        self.configs.next()
    }

    async fn resolve_path(
        &self,
        deployment_id: &str,
        path: &str,
        locale: &str,
        options: Option<&ResolvePathOptions>,
    ) -> Reply<PathResolution> {
        self.record(Call::ResolvePath {
            deployment_id: deployment_id.to_string(),
            path: path.to_string(),
            locale: locale.to_string(),
            options: options.cloned(),
        });
        self.resolve_path.next()
    }

    async fn resolve_paths(
        &self,
        deployment_id: &str,
        paths: &[String],
        locale: &str,
        fetch_content: bool,
    ) -> Reply<ResolvePathsResponse> {
        self.record(Call::ResolvePaths {
            deployment_id: deployment_id.to_string(),
            paths: paths.to_vec(),
            locale: locale.to_string(),
            fetch_content,
        });
        self.resolve_paths.next()
    }

    async fn fetch_all_paths(
        &self,
        deployment_id: &str,
        locale: &str,
        options: Option<AllPathsOptions>,
    ) -> Reply<AllPathsResponse> {
        self.record(Call::FetchAllPaths {
            deployment_id: deployment_id.to_string(),
            locale: locale.to_string(),
            options,
        });
        self.all_paths.next()
    }

    async fn fetch_blogs(&self, deployment_id: &str) -> Reply<Vec<Blog>> {
        self.record(Call::FetchBlogs {
            deployment_id: deployment_id.to_string(),
        });
        self.blogs.next()
    }

    async fn fetch_blog_posts(
        &self,
        blog_id: &str,
        query: Option<&BlogPostsQuery>,
    ) -> Reply<Vec<BlogPost>> {
        self.record(Call::FetchBlogPosts {
            blog_id: blog_id.to_string(),
            query: query.cloned(),
        });
        self.blog_posts.next()
    }

    async fn fetch_blog_post(&self, blog_id: &str, post_slug: &str) -> Reply<BlogPost> {
        self.record(Call::FetchBlogPost {
            blog_id: blog_id.to_string(),
            post_slug: post_slug.to_string(),
        });
        self.blog_post.next()
    }

    async fn fetch_blog_categories(&self, blog_id: &str) -> Reply<Vec<BlogCategory>> {
        self.record(Call::FetchBlogCategories {
            blog_id: blog_id.to_string(),
        });
        self.blog_categories.next()
    }
}

/// Request context with fixed headers and cookies.
#[derive(Default)]
pub(crate) struct StubContext {
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    requested: Mutex<Vec<String>>,
}

impl StubContext {
    pub(crate) fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub(crate) fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.push((name.to_string(), value.to_string()));
        self
    }

    /// Names of every header and cookie looked up so far.
    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    fn lookup(&self, entries: &[(String, String)], name: &str) -> Option<String> {
        self.requested.lock().unwrap().push(name.to_string());
        entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }
}

impl RequestContext for StubContext {
    fn header(&self, name: &str) -> Result<Option<String>, ContextError> {
        Ok(self.lookup(&self.headers, name))
    }

    fn cookie(&self, name: &str) -> Result<Option<String>, ContextError> {
        Ok(self.lookup(&self.cookies, name))
    }
}

struct ErrorCounter {
    count: Arc<AtomicUsize>,
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Drive `future` under a subscriber that counts ERROR events.
pub(crate) async fn count_error_events<F: Future>(future: F) -> (F::Output, usize) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = registry().with(ErrorCounter {
        count: Arc::clone(&count),
    });
    let output = future.with_subscriber(subscriber).await;
    (output, count.load(Ordering::SeqCst))
}

/// Fields of one captured event, rendered with `Debug`.
pub(crate) type EventFields = BTreeMap<String, String>;

struct WarnRecorder {
    events: Arc<Mutex<Vec<EventFields>>>,
}

struct FieldVisitor<'a>(&'a mut EventFields);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for WarnRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            let mut fields = EventFields::new();
            event.record(&mut FieldVisitor(&mut fields));
            self.events.lock().unwrap().push(fields);
        }
    }
}

/// Drive `future` and return the fields of every WARN event it emitted.
pub(crate) async fn capture_warn_events<F: Future>(future: F) -> (F::Output, Vec<EventFields>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = registry().with(WarnRecorder {
        events: Arc::clone(&events),
    });
    let output = future.with_subscriber(subscriber).await;
    let captured = events.lock().unwrap().clone();
    (output, captured)
}
