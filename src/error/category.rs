//! Error category classification.
//!
//! Categories give the presenter and the logs a coarse view of a failure
//! without matching on every variant.

use std::fmt;

/// High-level categorization of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connectivity problems (connection refused, timeout).
    Network,

    /// The portal rejected the caller's credentials.
    Auth,

    /// Backend failures (HTTP 5xx, malformed responses).
    Server,

    /// Misuse of the controller (invalid state for the operation).
    Client,

    /// Something the operator or token holder can act on
    /// (ineligible token, blank input).
    User,

    /// Redemption point not set up (missing resource/session).
    Configuration,
}

impl ErrorCategory {
    /// Short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// User-facing description of the category.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Network connectivity issue",
            ErrorCategory::Auth => "Authentication problem",
            ErrorCategory::Server => "Server-side issue",
            ErrorCategory::Client => "Application error",
            ErrorCategory::User => "Token not accepted",
            ErrorCategory::Configuration => "Redemption point not configured",
        }
    }

    /// Suggested next step for the operator.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check the connection and scan the token again",
            ErrorCategory::Auth => "Sign in to the portal again",
            ErrorCategory::Server => "The portal may be having issues. Try again shortly",
            ErrorCategory::Client => "This may be a bug. Please report it if it persists",
            ErrorCategory::User => "Ask the holder for a valid token",
            ErrorCategory::Configuration => "Select an event or meal session first",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
