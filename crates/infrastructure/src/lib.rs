//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod auth_token_provider;
mod http_admin_api;
mod system_clock;

pub use auth_token_provider::{AuthTokenProvider, StaticAuthTokenProvider};
pub use http_admin_api::HttpAdminApi;
pub use system_clock::SystemClock;
