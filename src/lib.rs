//! portal-redeem - single-use token redemption for the campus portal
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod redemption;
pub mod traits;
