use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of leading characters kept when a token is written to logs.
const REDACTED_PREFIX_LEN: usize = 4;

/// An opaque single-use credential captured from a scan or manual entry.
///
/// No structure is assumed; two tokens are equal only if their strings are
/// identical. `Debug` is redacted so tokens never leak into logs in full.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wrap a raw string without any normalization.
    ///
    /// Returns `None` when the string is empty or whitespace-only.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Build a token from user-typed text, trimming surrounding whitespace.
    pub fn from_manual(text: &str) -> Option<Self> {
        Self::new(text.trim())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix suitable for log lines.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(REDACTED_PREFIX_LEN).collect();
        if self.0.chars().count() > REDACTED_PREFIX_LEN {
            format!("{}…", prefix)
        } else {
            prefix
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&self.redacted()).finish()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
