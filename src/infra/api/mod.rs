//! HTTP adapter for the content API.

mod client;

pub use client::HttpCmsApi;
