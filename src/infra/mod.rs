//! Infrastructure adapters and runtime bootstrap.

pub mod api;
pub mod error;
pub mod http;
pub mod telemetry;
