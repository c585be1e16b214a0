//! Normalizes camera decodes and manual entry into one token stream.
//!
//! The source is armed while the controller is idle. The first token it
//! accepts disarms it, so repeated decodes of a code held in front of the
//! camera produce a single event. The controller re-arms it on return to
//! idle.

use std::time::Duration;

use tokio::time::Instant;

use super::state::InputMode;
use crate::error::{RedemptionError, RedemptionResult};
use crate::models::Token;

#[derive(Debug)]
pub struct TokenSource {
    mode: InputMode,
    armed: bool,
    /// Token of the most recent attempt, for repeat suppression
    last_token: Option<Token>,
    rearmed_at: Option<Instant>,
    repeat_suppression: Option<Duration>,
}

impl TokenSource {
    pub fn new(mode: InputMode) -> Self {
        Self {
            mode,
            armed: true,
            last_token: None,
            rearmed_at: None,
            repeat_suppression: None,
        }
    }

    pub fn with_repeat_suppression(mut self, window: Option<Duration>) -> Self {
        self.repeat_suppression = window;
        self
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// A decode event from the camera.
    ///
    /// Ignored unless the camera is the active input and the source is armed.
    /// Blank decodes are dropped silently.
    pub fn observe_decoded(&mut self, raw: &str) -> Option<Token> {
        if self.mode != InputMode::Camera {
            tracing::trace!("decode ignored: camera input inactive");
            return None;
        }
        let token = Token::new(raw)?;
        if self.is_suppressed_repeat(&token) {
            tracing::debug!(token = %token, "decode ignored: repeat of previous token");
            return None;
        }
        self.take(token)
    }

    /// A manual submit from the text field.
    ///
    /// Ignored (`Ok(None)`) unless manual entry is the active input or while
    /// an attempt is active. Blank input is rejected with `EmptyToken`.
    pub fn submit_manual(&mut self, text: &str) -> RedemptionResult<Option<Token>> {
        if self.mode != InputMode::Manual {
            tracing::trace!("manual submit ignored: manual input inactive");
            return Ok(None);
        }
        let token = Token::from_manual(text).ok_or(RedemptionError::EmptyToken)?;
        Ok(self.take(token))
    }

    /// A token handed over programmatically, independent of input mode.
    pub fn submit(&mut self, raw: &str) -> RedemptionResult<Option<Token>> {
        let token = Token::new(raw).ok_or(RedemptionError::EmptyToken)?;
        Ok(self.take(token))
    }

    /// Switch input channel. Returns false if the mode is unchanged.
    pub fn switch_mode(&mut self, mode: InputMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.rearm();
        true
    }

    /// Accept tokens again.
    pub fn rearm(&mut self) {
        self.armed = true;
        self.rearmed_at = Some(Instant::now());
    }

    fn take(&mut self, token: Token) -> Option<Token> {
        if !self.armed {
            tracing::trace!(token = %token, "token ignored: attempt in progress");
            return None;
        }
        self.armed = false;
        self.last_token = Some(token.clone());
        Some(token)
    }

    fn is_suppressed_repeat(&self, token: &Token) -> bool {
        let (Some(window), Some(last), Some(rearmed_at)) =
            (self.repeat_suppression, &self.last_token, self.rearmed_at)
        else {
            return false;
        };
        last == token && rearmed_at.elapsed() < window
    }
}

impl Default for TokenSource {
    fn default() -> Self {
        Self::new(InputMode::default())
    }
}
