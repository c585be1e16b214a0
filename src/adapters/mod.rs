//! Concrete implementations of the traits in `crate::traits`.
//!
//! - [`ReqwestHttpClient`] - HTTP transport using reqwest
//! - [`PortalApiClient`] - validation and commit against the portal API
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - configurable HTTP responses
//! - [`mock::MockRedemptionClient`] - scripted validate/commit results

pub mod mock;
pub mod portal_api;
pub mod reqwest_http;

pub use mock::{MockHttpClient, MockRedemptionClient};
pub use portal_api::{classify_status, PortalApiClient, PortalFlow};
pub use reqwest_http::ReqwestHttpClient;
