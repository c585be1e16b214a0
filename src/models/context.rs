use serde::{Deserialize, Serialize};

/// How a validated token proceeds to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtocolMode {
    /// A successful validation commits immediately (event check-in).
    #[default]
    OnePhase,
    /// Validation shows details and waits for an explicit confirm (meal use).
    TwoPhase,
}

impl ProtocolMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolMode::OnePhase => "one-phase",
            ProtocolMode::TwoPhase => "two-phase",
        }
    }
}

/// Identifiers that scope validation and commit for one redemption point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionContext {
    /// Event or meal the token must belong to
    pub resource_id: String,
    /// Secondary scope, such as a meal session, for variants that need it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_id: Option<String>,
}

impl RedemptionContext {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            secondary_id: None,
        }
    }

    pub fn with_secondary_id(mut self, secondary_id: impl Into<String>) -> Self {
        self.secondary_id = Some(secondary_id.into());
        self
    }

    /// Whether every identifier the protocol variant needs is present.
    pub fn is_complete(&self, requires_secondary: bool) -> bool {
        if self.resource_id.trim().is_empty() {
            return false;
        }
        if requires_secondary {
            return self
                .secondary_id
                .as_deref()
                .is_some_and(|id| !id.trim().is_empty());
        }
        true
    }
}
