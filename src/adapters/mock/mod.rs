//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP transport with configurable responses
//! - [`MockRedemptionClient`] - scripted validation and commit

pub mod http;
pub mod redemption;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use redemption::{MockRedemptionClient, RecordedCall};
