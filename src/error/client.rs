//! Failures reported by the validation and commit collaborators.

use thiserror::Error;

use super::category::ErrorCategory;

/// Error returned by a `ValidationClient` or `CommitClient`.
///
/// Every variant carries the message text supplied by the collaborator; the
/// controller shows it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// No credential matches the token for this resource.
    #[error("{message}")]
    NotFound { message: String },

    /// The credential has already been redeemed.
    #[error("{message}")]
    AlreadyUsed { message: String },

    /// The credential is past its validity window.
    #[error("{message}")]
    Expired { message: String },

    /// The operator may not redeem this credential here.
    #[error("{message}")]
    Forbidden { message: String },

    /// The request did not complete in time.
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// Any other transport or server failure.
    #[error("Request failed: {message}")]
    Transport { message: String },
}

impl ClientError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ClientError::NotFound {
            message: message.into(),
        }
    }

    pub fn already_used(message: impl Into<String>) -> Self {
        ClientError::AlreadyUsed {
            message: message.into(),
        }
    }

    pub fn expired(message: impl Into<String>) -> Self {
        ClientError::Expired {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ClientError::Forbidden {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ClientError::Transport {
            message: message.into(),
        }
    }

    /// True for business-rule rejections, false for transport failures.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ClientError::NotFound { .. }
                | ClientError::AlreadyUsed { .. }
                | ClientError::Expired { .. }
                | ClientError::Forbidden { .. }
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::NotFound { .. }
            | ClientError::AlreadyUsed { .. }
            | ClientError::Expired { .. } => ErrorCategory::User,
            ClientError::Forbidden { .. } => ErrorCategory::Auth,
            ClientError::Timeout { .. } => ErrorCategory::Network,
            ClientError::Transport { .. } => ErrorCategory::Server,
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::NotFound { .. } => "E_TOKEN_NOT_FOUND",
            ClientError::AlreadyUsed { .. } => "E_TOKEN_USED",
            ClientError::Expired { .. } => "E_TOKEN_EXPIRED",
            ClientError::Forbidden { .. } => "E_TOKEN_FORBIDDEN",
            ClientError::Timeout { .. } => "E_NET_TIMEOUT",
            ClientError::Transport { .. } => "E_NET_OTHER",
        }
    }

    /// The collaborator-supplied message without any prefix.
    pub fn message(&self) -> &str {
        match self {
            ClientError::NotFound { message }
            | ClientError::AlreadyUsed { message }
            | ClientError::Expired { message }
            | ClientError::Forbidden { message }
            | ClientError::Timeout { message }
            | ClientError::Transport { message } => message,
        }
    }
}
