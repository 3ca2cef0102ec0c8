//! Server-side helpers for rendering pages of an OTL CMS deployment.
//!
//! Services in [`application`] wrap the content API behind [`application::api::CmsApi`];
//! [`infra::api::HttpCmsApi`] is the production implementation.

pub mod application;
pub mod config;
pub mod infra;
