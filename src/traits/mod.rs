//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - HTTP transport used by the portal adapters
//! - [`ValidationClient`] - token eligibility check
//! - [`CommitClient`] - token consumption

pub mod http;
pub mod redemption;

pub use http::{Headers, HttpClient, HttpError, Response};
pub use redemption::{CommitClient, ValidationClient};
