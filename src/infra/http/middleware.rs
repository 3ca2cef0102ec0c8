use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, info_span};
use uuid::Uuid;

use crate::application::{
    request::{HttpRequestContext, REQUEST_ID_HEADER},
    scope::RequestScope,
};

/// Attach a fresh [`RequestScope`] and the request's [`HttpRequestContext`].
///
/// The scope id is the inbound `x-request-id` when present, else a new UUID,
/// and is echoed back on the response.
pub async fn set_request_scope(mut request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let scope = RequestScope::new(request_id);
    let ctx = HttpRequestContext::from_headers(request.headers());
    let span = info_span!("request", request_id = scope.id(), path = %request.uri().path());
    request.extensions_mut().insert(scope.clone());
    request.extensions_mut().insert(ctx);

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(scope.id()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
