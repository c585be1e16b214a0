//! Collaborator traits for the redemption controller.
//!
//! The controller only sees these two operations; how they reach the portal
//! is up to the implementation (see `crate::adapters`).

use async_trait::async_trait;

use crate::error::ClientError;
use crate::models::{RedemptionContext, RedemptionInfo, RedemptionReceipt, Token};

/// Read-only eligibility check for a token.
///
/// Implementations must be idempotent and must not change the credential.
#[async_trait]
pub trait ValidationClient: Send + Sync {
    async fn validate(
        &self,
        token: &Token,
        context: &RedemptionContext,
    ) -> Result<RedemptionInfo, ClientError>;

    /// Whether `RedemptionContext::secondary_id` is required for this variant.
    fn requires_secondary_id(&self) -> bool {
        false
    }
}

/// Consumes a validated token. Called at most once per attempt.
#[async_trait]
pub trait CommitClient: Send + Sync {
    async fn commit(
        &self,
        context: &RedemptionContext,
        token: &Token,
    ) -> Result<RedemptionReceipt, ClientError>;
}
