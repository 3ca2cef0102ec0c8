//! Axum glue for handlers that render deployment pages.

mod middleware;

pub use middleware::set_request_scope;
