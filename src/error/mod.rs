//! Error handling for redemption.
//!
//! - **Error Categories**: high-level classification for display and logging
//! - **Client Errors**: failures reported by the validation/commit collaborators
//! - **Redemption Errors**: the controller's own taxonomy
//!
//! | Error | Category | Shown as |
//! |-------|----------|----------|
//! | `MissingContext` | Configuration | Failed, auto-reset |
//! | `ValidationRejected` | User / Network / Server | Failed, auto-reset |
//! | `CommitRejected` | User / Network / Server | Failed, auto-reset |
//! | `Cancelled` | User | silent reset |
//! | `EmptyToken`, `NotIdle` | User / Client | returned to the caller only |
//!
//! Nothing here is retried automatically: a fresh token starts a fresh attempt.

mod category;
mod client;
mod redemption;

pub use category::ErrorCategory;
pub use client::ClientError;
pub use redemption::{RedemptionError, RedemptionResult};
