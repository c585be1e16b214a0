//! The redemption state machine.
//!
//! ```text
//! Idle ──token──▶ Validating ──ok, two-phase──▶ AwaitingConfirmation ──confirm──▶ Committing
//!                     │        ──ok, one-phase────────────────────────────────────▶ │
//!                     └──err──▶ Failed (3u) ──▶ Idle                                 │
//!                               Succeeded (5u) ◀──ok── Committing ──err──▶ Failed (2u)
//! ```
//!
//! All transitions run on the task that owns the controller. Validate and
//! commit calls are spawned and report back through a message channel,
//! tagged with their `AttemptId`; anything that arrives for an attempt that
//! is no longer current is dropped.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use super::messages::RedemptionMessage;
use super::state::{Attempt, AttemptId, InputMode, Phase, RedemptionSnapshot};
use super::timer::ResetTimer;
use super::token_source::TokenSource;
use crate::config::RedemptionConfig;
use crate::error::{ClientError, RedemptionError, RedemptionResult};
use crate::models::{ProtocolMode, RedemptionContext, RedemptionInfo, RedemptionReceipt, Token};
use crate::traits::{CommitClient, ValidationClient};

pub struct RedemptionController {
    validator: Arc<dyn ValidationClient>,
    committer: Arc<dyn CommitClient>,
    config: RedemptionConfig,
    context: Option<RedemptionContext>,
    protocol: ProtocolMode,
    source: TokenSource,
    phase: Phase,
    attempt: Option<Attempt>,
    /// Context captured when the current attempt started
    attempt_context: Option<RedemptionContext>,
    next_attempt: u64,
    reset_timer: ResetTimer,
    message_tx: mpsc::UnboundedSender<RedemptionMessage>,
    message_rx: Option<mpsc::UnboundedReceiver<RedemptionMessage>>,
    snapshot_tx: watch::Sender<RedemptionSnapshot>,
}

impl RedemptionController {
    pub fn new(
        validator: Arc<dyn ValidationClient>,
        committer: Arc<dyn CommitClient>,
        config: RedemptionConfig,
    ) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(RedemptionSnapshot::default());
        let source =
            TokenSource::new(InputMode::default()).with_repeat_suppression(config.repeat_suppression);
        Self {
            validator,
            committer,
            config,
            context: None,
            protocol: ProtocolMode::default(),
            source,
            phase: Phase::Idle,
            attempt: None,
            attempt_context: None,
            next_attempt: 1,
            reset_timer: ResetTimer::new(),
            message_tx,
            message_rx: Some(message_rx),
            snapshot_tx,
        }
    }

    /// Build a controller whose validator and committer are the same object.
    pub fn with_client<C>(client: Arc<C>, config: RedemptionConfig) -> Self
    where
        C: ValidationClient + CommitClient + 'static,
    {
        Self::new(client.clone(), client, config)
    }

    // ------------------------------------------------------------------
    // Public surface
    // ------------------------------------------------------------------

    /// Set the redemption point and protocol. Only allowed while idle.
    pub fn configure(
        &mut self,
        context: RedemptionContext,
        protocol: ProtocolMode,
    ) -> RedemptionResult<()> {
        if self.phase != Phase::Idle {
            return Err(RedemptionError::NotIdle(self.phase));
        }
        tracing::info!(
            resource = %context.resource_id,
            protocol = protocol.as_str(),
            "redemption point configured"
        );
        self.context = Some(context);
        self.protocol = protocol;
        self.publish();
        Ok(())
    }

    /// Offer a token from any source.
    ///
    /// Returns the new attempt id, `None` if the token was ignored because an
    /// attempt is active, or `EmptyToken` for blank input.
    pub fn submit_token(&mut self, raw: &str) -> RedemptionResult<Option<AttemptId>> {
        let token = self.source.submit(raw)?;
        Ok(token.and_then(|t| self.begin_attempt(t)))
    }

    /// Offer a decoded camera frame. Repeats and blanks are dropped.
    pub fn on_decoded(&mut self, raw: &str) -> Option<AttemptId> {
        let token = self.source.observe_decoded(raw)?;
        self.begin_attempt(token)
    }

    /// Offer typed input while manual entry is active. Surrounding whitespace
    /// is trimmed.
    pub fn submit_manual(&mut self, text: &str) -> RedemptionResult<Option<AttemptId>> {
        let token = self.source.submit_manual(text)?;
        Ok(token.and_then(|t| self.begin_attempt(t)))
    }

    /// Confirm a validated token. Returns true if a commit was started.
    ///
    /// Only the first confirm in `AwaitingConfirmation` has any effect; the
    /// phase moves to `Committing` before this returns.
    pub fn confirm(&mut self) -> bool {
        if self.phase != Phase::AwaitingConfirmation {
            tracing::debug!(phase = %self.phase, "confirm ignored");
            return false;
        }
        self.begin_commit();
        true
    }

    /// Abandon or dismiss the current attempt. Returns true if state changed.
    ///
    /// - `AwaitingConfirmation`, `Validating`: back to idle; a late response
    ///   is ignored.
    /// - `Succeeded`, `Failed`: dismiss the result early.
    /// - `Committing`, `Idle`: no effect.
    pub fn cancel(&mut self) -> bool {
        match self.phase {
            Phase::Idle => false,
            Phase::Committing => {
                tracing::debug!("cancel ignored: commit in flight");
                false
            }
            Phase::Validating | Phase::AwaitingConfirmation => {
                self.log_cancelled("operator cancelled");
                self.reset_to_idle();
                true
            }
            Phase::Succeeded | Phase::Failed => {
                tracing::debug!(attempt = ?self.current_attempt(), "result dismissed");
                self.reset_to_idle();
                true
            }
        }
    }

    /// Change input channel. Any attempt, terminal or not, is abandoned.
    pub fn switch_input_mode(&mut self, mode: InputMode) -> bool {
        if self.source.mode() == mode {
            return false;
        }
        match self.phase {
            Phase::Committing => tracing::warn!(
                attempt = ?self.current_attempt(),
                "input mode switched while commit in flight; outcome will be discarded"
            ),
            Phase::Validating | Phase::AwaitingConfirmation => {
                self.log_cancelled("input mode switched")
            }
            _ => {}
        }
        self.source.switch_mode(mode);
        if self.phase == Phase::Idle {
            self.publish();
        } else {
            self.reset_to_idle();
        }
        tracing::info!(mode = mode.as_str(), "input mode switched");
        true
    }

    /// Current state for presenters.
    pub fn state(&self) -> RedemptionSnapshot {
        RedemptionSnapshot {
            phase: self.phase,
            attempt: self.current_attempt(),
            input_mode: self.source.mode(),
            protocol: self.protocol,
            token: self.attempt.as_ref().map(|a| a.token.clone()),
            info: self.attempt.as_ref().and_then(|a| a.info.clone()),
            receipt: self.attempt.as_ref().and_then(|a| a.receipt.clone()),
            error: self.attempt.as_ref().and_then(|a| a.error.clone()),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn protocol(&self) -> ProtocolMode {
        self.protocol
    }

    pub fn context(&self) -> Option<&RedemptionContext> {
        self.context.as_ref()
    }

    pub fn current_attempt(&self) -> Option<AttemptId> {
        self.attempt.as_ref().map(|a| a.id)
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<RedemptionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Take the message receiver to drive the controller from an outer
    /// `select!` loop. `next_message` returns `None` afterwards.
    pub fn take_message_rx(&mut self) -> Option<mpsc::UnboundedReceiver<RedemptionMessage>> {
        self.message_rx.take()
    }

    /// Wait for the next message from spawned work.
    pub async fn next_message(&mut self) -> Option<RedemptionMessage> {
        match self.message_rx.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }

    /// Wait for one message and apply it. Returns false if no receiver.
    pub async fn process_next(&mut self) -> bool {
        match self.next_message().await {
            Some(msg) => {
                self.handle_message(msg);
                true
            }
            None => false,
        }
    }

    /// Apply a message from spawned work.
    pub fn handle_message(&mut self, msg: RedemptionMessage) {
        match msg {
            RedemptionMessage::ValidationResolved { attempt, result } => {
                if !self.is_current(attempt, Phase::Validating) {
                    tracing::debug!(attempt = %attempt, "stale validation response dropped");
                    return;
                }
                self.on_validation(result);
            }
            RedemptionMessage::CommitResolved { attempt, result } => {
                if !self.is_current(attempt, Phase::Committing) {
                    log_discarded_commit(attempt, &result);
                    return;
                }
                self.on_commit(result);
            }
            RedemptionMessage::ResetElapsed { attempt } => {
                if !self.reset_timer.fired(attempt) || !self.is_current_terminal(attempt) {
                    tracing::debug!(attempt = %attempt, "stale reset dropped");
                    return;
                }
                tracing::debug!(attempt = %attempt, "display window elapsed");
                self.reset_to_idle();
            }
        }
    }

    /// Cancel pending timers. In-flight calls finish but are ignored.
    pub fn shutdown(&mut self) {
        if let Some(attempt) = self.current_attempt() {
            tracing::info!(attempt = %attempt, phase = %self.phase, "shutting down with attempt active");
        }
        self.reset_to_idle();
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn begin_attempt(&mut self, token: Token) -> Option<AttemptId> {
        if self.phase != Phase::Idle {
            tracing::debug!(phase = %self.phase, "token ignored: attempt in progress");
            return None;
        }
        self.reset_timer.cancel();

        let id = AttemptId(self.next_attempt);
        self.next_attempt += 1;
        tracing::info!(
            attempt = %id,
            token = %token,
            protocol = self.protocol.as_str(),
            "attempt started"
        );
        self.attempt = Some(Attempt::new(id, token.clone()));

        let requires_secondary = self.validator.requires_secondary_id();
        let context = match &self.context {
            Some(ctx) if ctx.is_complete(requires_secondary) => ctx.clone(),
            _ => {
                self.fail(RedemptionError::MissingContext);
                return Some(id);
            }
        };
        self.attempt_context = Some(context.clone());
        self.phase = Phase::Validating;
        self.publish();

        let validator = self.validator.clone();
        let message_tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = validator.validate(&token, &context).await;
            let _ = message_tx.send(RedemptionMessage::ValidationResolved {
                attempt: id,
                result,
            });
        });
        Some(id)
    }

    fn on_validation(&mut self, result: Result<RedemptionInfo, ClientError>) {
        match result {
            Ok(info) => {
                if let Some(attempt) = self.attempt.as_mut() {
                    attempt.info = Some(info);
                }
                match self.protocol {
                    ProtocolMode::TwoPhase => {
                        tracing::info!(attempt = ?self.current_attempt(), "token valid, awaiting confirmation");
                        self.phase = Phase::AwaitingConfirmation;
                        self.publish();
                    }
                    ProtocolMode::OnePhase => self.begin_commit(),
                }
            }
            Err(err) => self.fail(RedemptionError::ValidationRejected(err)),
        }
    }

    fn begin_commit(&mut self) {
        let (Some(attempt), Some(context)) = (self.attempt.as_ref(), self.attempt_context.clone())
        else {
            return;
        };
        let id = attempt.id;
        let token = attempt.token.clone();
        self.phase = Phase::Committing;
        tracing::info!(attempt = %id, "committing");
        self.publish();

        let committer = self.committer.clone();
        let message_tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = committer.commit(&context, &token).await;
            let _ = message_tx.send(RedemptionMessage::CommitResolved {
                attempt: id,
                result,
            });
        });
    }

    fn on_commit(&mut self, result: Result<RedemptionReceipt, ClientError>) {
        match result {
            Ok(receipt) => {
                let Some(attempt) = self.attempt.as_mut() else {
                    return;
                };
                attempt.receipt = Some(receipt);
                let id = attempt.id;
                self.phase = Phase::Succeeded;
                tracing::info!(attempt = %id, "redeemed");
                self.reset_timer
                    .arm(id, self.config.success_delay(), self.message_tx.clone());
                self.publish();
            }
            Err(err) => {
                // Validated info is not kept for a retry after a failed commit.
                if let Some(attempt) = self.attempt.as_mut() {
                    attempt.info = None;
                }
                self.fail(RedemptionError::CommitRejected(err));
            }
        }
    }

    fn fail(&mut self, error: RedemptionError) {
        let delay = match error {
            RedemptionError::CommitRejected(_) => self.config.commit_failure_delay(),
            _ => self.config.validation_failure_delay(),
        };
        let Some(attempt) = self.attempt.as_mut() else {
            return;
        };
        let id = attempt.id;
        if error.client_error().is_some_and(|e| e.is_rejection()) {
            tracing::info!(
                attempt = %id,
                code = error.error_code(),
                category = %error.category(),
                "attempt rejected: {}",
                error
            );
        } else {
            tracing::warn!(
                attempt = %id,
                code = error.error_code(),
                category = %error.category(),
                "attempt failed: {}",
                error
            );
        }
        attempt.error = Some(error);
        self.phase = Phase::Failed;
        self.reset_timer.arm(id, delay, self.message_tx.clone());
        self.publish();
    }

    fn reset_to_idle(&mut self) {
        self.reset_timer.cancel();
        self.attempt = None;
        self.attempt_context = None;
        self.phase = Phase::Idle;
        self.source.rearm();
        self.publish();
    }

    fn log_cancelled(&self, reason: &str) {
        let cancelled = RedemptionError::Cancelled;
        tracing::info!(
            attempt = ?self.current_attempt(),
            phase = %self.phase,
            code = cancelled.error_code(),
            category = %cancelled.category(),
            "{}: {}",
            cancelled,
            reason
        );
    }

    fn is_current(&self, attempt: AttemptId, phase: Phase) -> bool {
        self.current_attempt() == Some(attempt) && self.phase == phase
    }

    fn is_current_terminal(&self, attempt: AttemptId) -> bool {
        self.current_attempt() == Some(attempt) && self.phase.is_terminal()
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.state());
    }
}

/// Outcome of a commit whose attempt was abandoned. The token may already be
/// consumed on the portal.
fn log_discarded_commit(attempt: AttemptId, result: &Result<RedemptionReceipt, ClientError>) {
    match result {
        Ok(receipt) => tracing::warn!(
            attempt = %attempt,
            receipt_id = receipt.receipt_id.as_deref().unwrap_or("-"),
            redeemed_at = %receipt.redeemed_at.to_rfc3339(),
            "discarded commit succeeded on the portal"
        ),
        Err(err) => tracing::warn!(
            attempt = %attempt,
            code = err.error_code(),
            "discarded commit failed: {}",
            err
        ),
    }
}

impl Drop for RedemptionController {
    fn drop(&mut self) {
        self.reset_timer.cancel();
    }
}
