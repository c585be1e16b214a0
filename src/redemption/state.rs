//! Phase, attempt identity, and the snapshot exposed to presenters.

use std::fmt;

use crate::error::RedemptionError;
use crate::models::{ProtocolMode, RedemptionInfo, RedemptionReceipt, Token};

/// Where the controller is in the redemption cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Ready for a token
    #[default]
    Idle,
    /// Waiting on `validate`
    Validating,
    /// Showing details, waiting for confirm or cancel (two-phase only)
    AwaitingConfirmation,
    /// Waiting on `commit`
    Committing,
    /// Token consumed, showing the receipt until the reset timer fires
    Succeeded,
    /// Attempt failed, showing the error until the reset timer fires
    Failed,
}

impl Phase {
    /// Terminal phases return to `Idle` on a timer.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed)
    }

    /// True while a `validate` or `commit` call is outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Phase::Validating | Phase::Committing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Validating => "validating",
            Phase::AwaitingConfirmation => "awaiting confirmation",
            Phase::Committing => "committing",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one attempt. Strictly increasing per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(pub(crate) u64);

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which input channel feeds the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Continuous decode events from the camera
    #[default]
    Camera,
    /// One-shot typed entry
    Manual,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Camera => "camera",
            InputMode::Manual => "manual",
        }
    }
}

/// Read-only view of the controller for presenters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RedemptionSnapshot {
    pub phase: Phase,
    pub attempt: Option<AttemptId>,
    pub input_mode: InputMode,
    pub protocol: ProtocolMode,
    pub token: Option<Token>,
    pub info: Option<RedemptionInfo>,
    pub receipt: Option<RedemptionReceipt>,
    pub error: Option<RedemptionError>,
}

impl RedemptionSnapshot {
    /// Message for the presenter's status line.
    pub fn status_line(&self) -> String {
        match self.phase {
            Phase::Idle => match self.input_mode {
                InputMode::Camera => "Ready: scan a code".to_string(),
                InputMode::Manual => "Ready: enter a code".to_string(),
            },
            Phase::Validating => "Checking code…".to_string(),
            Phase::AwaitingConfirmation => match &self.info {
                Some(info) => match info.price {
                    Some(price) => format!(
                        "{} for {} ({:.2}): confirm?",
                        info.holder_name, info.resource_label, price
                    ),
                    None => format!("{} for {}: confirm?", info.holder_name, info.resource_label),
                },
                None => "Confirm redemption?".to_string(),
            },
            Phase::Committing => "Redeeming…".to_string(),
            Phase::Succeeded => "Redeemed".to_string(),
            Phase::Failed => self
                .error
                .as_ref()
                .map(|e| e.user_message())
                .unwrap_or_else(|| "Redemption failed".to_string()),
        }
    }
}

/// Data owned for the life of one attempt.
#[derive(Debug, Clone)]
pub(crate) struct Attempt {
    pub id: AttemptId,
    pub token: Token,
    pub info: Option<RedemptionInfo>,
    pub receipt: Option<RedemptionReceipt>,
    pub error: Option<RedemptionError>,
}

impl Attempt {
    pub fn new(id: AttemptId, token: Token) -> Self {
        Self {
            id,
            token,
            info: None,
            receipt: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    #[test]
    fn test_phase_classification() {
        assert!(Phase::Succeeded.is_terminal());
        assert!(Phase::Failed.is_terminal());
        assert!(!Phase::AwaitingConfirmation.is_terminal());
        assert!(Phase::Validating.is_in_flight());
        assert!(Phase::Committing.is_in_flight());
        assert!(!Phase::Idle.is_in_flight());
        assert_eq!(Phase::default(), Phase::Idle);
    }

    #[test]
    fn test_attempt_id_ordering() {
        assert!(AttemptId(2) > AttemptId(1));
        assert_eq!(AttemptId(7).to_string(), "#7");
    }

    #[test]
    fn test_status_line_awaiting_with_price() {
        let snapshot = RedemptionSnapshot {
            phase: Phase::AwaitingConfirmation,
            info: Some(RedemptionInfo::new("Ada", "Lunch").with_price(25.0)),
            ..Default::default()
        };
        assert_eq!(snapshot.status_line(), "Ada for Lunch (25.00): confirm?");
    }

    #[test]
    fn test_status_line_failed_uses_error_text() {
        let snapshot = RedemptionSnapshot {
            phase: Phase::Failed,
            error: Some(RedemptionError::ValidationRejected(ClientError::already_used(
                "Ticket already used",
            ))),
            ..Default::default()
        };
        assert_eq!(snapshot.status_line(), "Ticket already used");
    }

    #[test]
    fn test_status_line_idle_depends_on_mode() {
        let mut snapshot = RedemptionSnapshot::default();
        assert!(snapshot.status_line().contains("scan"));
        snapshot.input_mode = InputMode::Manual;
        assert!(snapshot.status_line().contains("enter"));
    }
}
