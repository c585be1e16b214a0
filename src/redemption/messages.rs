//! Messages posted back to the controller by spawned work.

use super::state::AttemptId;
use crate::error::ClientError;
use crate::models::{RedemptionInfo, RedemptionReceipt};

/// Results of async operations, tagged with the attempt that started them.
///
/// The controller applies a message only if its attempt is still current.
#[derive(Debug, Clone)]
pub enum RedemptionMessage {
    /// `validate` finished
    ValidationResolved {
        attempt: AttemptId,
        result: Result<RedemptionInfo, ClientError>,
    },
    /// `commit` finished
    CommitResolved {
        attempt: AttemptId,
        result: Result<RedemptionReceipt, ClientError>,
    },
    /// A post-terminal display window elapsed
    ResetElapsed { attempt: AttemptId },
}

impl RedemptionMessage {
    pub fn attempt(&self) -> AttemptId {
        match self {
            RedemptionMessage::ValidationResolved { attempt, .. }
            | RedemptionMessage::CommitResolved { attempt, .. }
            | RedemptionMessage::ResetElapsed { attempt } => *attempt,
        }
    }
}
