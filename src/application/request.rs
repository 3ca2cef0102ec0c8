//! Read access to the inbound request: headers and cookies.
//!
//! Rendering code never touches the framework directly; it asks a
//! [`RequestContext`], which may be unavailable (background renders, static
//! generation). Callers absorb [`ContextError`] with a safe default.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use thiserror::Error;

pub const PATHNAME_HEADER: &str = "x-pathname";
pub const ABN_BUCKET_HEADER: &str = "x-abn-bucket";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("request context is not available outside a request")]
    Unavailable,
    #[error("header `{name}` is not valid visible ASCII")]
    InvalidHeader { name: String },
}

pub trait RequestContext: Send + Sync {
    fn header(&self, name: &str) -> Result<Option<String>, ContextError>;

    /// Value of the named cookie, if the request carries it.
    fn cookie(&self, name: &str) -> Result<Option<String>, ContextError>;
}

/// Context backed by the headers of an HTTP request.
#[derive(Debug, Clone, Default)]
pub struct HttpRequestContext {
    headers: HeaderMap,
    cookies: CookieJar,
}

impl HttpRequestContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            headers: headers.clone(),
            cookies: CookieJar::from_headers(headers),
        }
    }
}

impl RequestContext for HttpRequestContext {
    fn header(&self, name: &str) -> Result<Option<String>, ContextError> {
        match self.headers.get(name) {
            Some(value) => value
                .to_str()
                .map(|value| Some(value.to_string()))
                .map_err(|_| ContextError::InvalidHeader {
                    name: name.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn cookie(&self, name: &str) -> Result<Option<String>, ContextError> {
        Ok(self
            .cookies
            .get(name)
            .map(|cookie| cookie.value().to_string()))
    }
}

impl<S> FromRequestParts<S> for HttpRequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<HttpRequestContext>()
            .cloned()
            .unwrap_or_else(|| Self::from_headers(&parts.headers)))
    }
}

/// Context used when no request is in flight.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl RequestContext for Unavailable {
    fn header(&self, _name: &str) -> Result<Option<String>, ContextError> {
        Err(ContextError::Unavailable)
    }

    fn cookie(&self, _name: &str) -> Result<Option<String>, ContextError> {
        Err(ContextError::Unavailable)
    }
}
