//! The controller's error taxonomy.

use thiserror::Error;

use super::category::ErrorCategory;
use super::client::ClientError;
use crate::redemption::Phase;

/// Result alias for controller operations.
pub type RedemptionResult<T> = Result<T, RedemptionError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedemptionError {
    /// `configure` was not called, or the context lacks a required identifier.
    #[error("No event or session selected for redemption")]
    MissingContext,

    /// The token is not eligible (not found, already used, expired,
    /// forbidden) or validation could not be completed.
    #[error("{0}")]
    ValidationRejected(ClientError),

    /// The token was eligible but the commit failed.
    #[error("Redemption could not be completed: {0}")]
    CommitRejected(ClientError),

    /// The operator abandoned the attempt.
    #[error("Redemption cancelled")]
    Cancelled,

    /// Manual entry was empty or whitespace-only.
    #[error("Enter a code before submitting")]
    EmptyToken,

    /// The operation is only allowed while idle.
    #[error("Operation not allowed while {0}")]
    NotIdle(Phase),
}

impl RedemptionError {
    /// Whether this error puts the attempt into the `Failed` phase.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RedemptionError::MissingContext
                | RedemptionError::ValidationRejected(_)
                | RedemptionError::CommitRejected(_)
        )
    }

    /// The collaborator failure behind this error, if any.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            RedemptionError::ValidationRejected(err) | RedemptionError::CommitRejected(err) => {
                Some(err)
            }
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            RedemptionError::MissingContext => ErrorCategory::Configuration,
            RedemptionError::ValidationRejected(err) | RedemptionError::CommitRejected(err) => {
                err.category()
            }
            RedemptionError::Cancelled | RedemptionError::EmptyToken => ErrorCategory::User,
            RedemptionError::NotIdle(_) => ErrorCategory::Client,
        }
    }

    /// Text for the presenter. Collaborator messages pass through unchanged.
    pub fn user_message(&self) -> String {
        match self {
            RedemptionError::ValidationRejected(err) => err.message().to_string(),
            RedemptionError::CommitRejected(err) => {
                format!("Redemption could not be completed: {}", err.message())
            }
            other => other.to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            RedemptionError::MissingContext => "E_MISSING_CONTEXT",
            RedemptionError::ValidationRejected(err) => err.error_code(),
            RedemptionError::CommitRejected(_) => "E_COMMIT_REJECTED",
            RedemptionError::Cancelled => "E_CANCELLED",
            RedemptionError::EmptyToken => "E_EMPTY_TOKEN",
            RedemptionError::NotIdle(_) => "E_NOT_IDLE",
        }
    }
}
