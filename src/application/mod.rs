//! Services a page handler calls while rendering a deployment.

pub mod abn;
pub mod api;
pub mod blogs;
pub mod configs;
pub mod deployment;
pub mod dispatch;
pub mod error;
pub mod i18n;
pub mod locale;
pub mod password;
pub mod paths;
pub mod request;
pub mod scope;
pub mod website;

mod lock;
#[cfg(test)]
pub(crate) mod testing;
