//! Auto-reset timer owned by the controller.
//!
//! At most one reset is pending. Arming a new reset or cancelling aborts the
//! previous task, and every firing carries the attempt it was armed for.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::messages::RedemptionMessage;
use super::state::AttemptId;

#[derive(Debug)]
struct PendingReset {
    attempt: AttemptId,
    handle: JoinHandle<()>,
}

#[derive(Debug, Default)]
pub struct ResetTimer {
    pending: Option<PendingReset>,
}

impl ResetTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `ResetElapsed { attempt }` after `delay`, replacing any
    /// pending reset.
    pub fn arm(
        &mut self,
        attempt: AttemptId,
        delay: Duration,
        message_tx: mpsc::UnboundedSender<RedemptionMessage>,
    ) {
        self.cancel();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = message_tx.send(RedemptionMessage::ResetElapsed { attempt });
        });
        self.pending = Some(PendingReset { attempt, handle });
    }

    /// Abort the pending reset, returning the attempt it belonged to.
    pub fn cancel(&mut self) -> Option<AttemptId> {
        self.pending.take().map(|pending| {
            pending.handle.abort();
            pending.attempt
        })
    }

    /// Consume a firing. Returns true only for the reset currently armed, so
    /// each arming is honoured at most once.
    pub fn fired(&mut self, attempt: AttemptId) -> bool {
        match &self.pending {
            Some(pending) if pending.attempt == attempt => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Drop for ResetTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
