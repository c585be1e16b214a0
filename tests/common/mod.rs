//! Common test utilities for integration tests.
//!
//! This module provides controller fixtures, scripted collaborators,
//! and helpers for driving a controller under a paused tokio clock.
//!
//! # Example
//!
//! ```ignore
//! use common::{TestControllerBuilder, drive_until};
//!
//! let (mut controller, client) = TestControllerBuilder::new().two_phase().build();
//! controller.submit_token("tok-1").unwrap();
//! drive_until(&mut controller, Phase::AwaitingConfirmation).await;
//! ```

#![allow(dead_code)]

pub mod logs;
pub mod mocks;

pub use logs::*;
pub use mocks::*;

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use portal_redeem::config::RedemptionConfig;
use portal_redeem::models::{ProtocolMode, RedemptionContext, RedemptionInfo, RedemptionReceipt};
use portal_redeem::redemption::{InputMode, Phase, RedemptionController};

/// Time unit used by controller fixtures.
pub const UNIT: Duration = Duration::from_millis(100);

/// Redemption config with a short time unit.
pub fn test_config() -> RedemptionConfig {
    RedemptionConfig::default().with_time_unit(UNIT)
}

/// Context for an event check-in point.
pub fn event_context() -> RedemptionContext {
    RedemptionContext::new("E1")
}

/// Context for a meal reservation point.
pub fn meal_context() -> RedemptionContext {
    RedemptionContext::new("M1").with_secondary_id("lunch")
}

/// Meal details with a price.
pub fn priced_info(price: f64) -> RedemptionInfo {
    RedemptionInfo::new("Ada Lovelace", "Lunch, Hall A").with_price(price)
}

/// A receipt with a fixed timestamp.
pub fn test_receipt(id: &str) -> RedemptionReceipt {
    let mut receipt = RedemptionReceipt::new(Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap());
    receipt.receipt_id = Some(id.to_string());
    receipt
}

/// Builder for controllers wired to a [`MockRedemptionClient`].
pub struct TestControllerBuilder {
    client: MockRedemptionClient,
    config: RedemptionConfig,
    context: Option<RedemptionContext>,
    protocol: ProtocolMode,
    input_mode: InputMode,
}

impl TestControllerBuilder {
    pub fn new() -> Self {
        Self {
            client: MockRedemptionClient::new(),
            config: test_config(),
            context: Some(event_context()),
            protocol: ProtocolMode::OnePhase,
            input_mode: InputMode::Camera,
        }
    }

    pub fn two_phase(mut self) -> Self {
        self.protocol = ProtocolMode::TwoPhase;
        self.context = Some(meal_context());
        self
    }

    pub fn unconfigured(mut self) -> Self {
        self.context = None;
        self
    }

    pub fn with_context(mut self, context: RedemptionContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_client(mut self, client: MockRedemptionClient) -> Self {
        self.client = client;
        self
    }

    pub fn with_config(mut self, config: RedemptionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn manual(mut self) -> Self {
        self.input_mode = InputMode::Manual;
        self
    }

    pub fn build(self) -> (RedemptionController, MockRedemptionClient) {
        let mut controller =
            RedemptionController::with_client(Arc::new(self.client.clone()), self.config);
        if let Some(context) = self.context {
            controller
                .configure(context, self.protocol)
                .expect("fresh controller is idle");
        }
        controller.switch_input_mode(self.input_mode);
        (controller, self.client)
    }
}

impl Default for TestControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Process messages until the controller reaches `phase`.
///
/// Panics if the message channel closes first. Only useful with a paused
/// clock or when every scripted call resolves.
pub async fn drive_until(controller: &mut RedemptionController, phase: Phase) {
    while controller.phase() != phase {
        assert!(
            controller.process_next().await,
            "message channel closed before reaching {}",
            phase
        );
    }
}

/// Let spawned tasks run without advancing the clock.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_uses_short_unit() {
        assert_eq!(test_config().success_delay(), UNIT * 5);
    }

    #[tokio::test]
    async fn test_builder_configures_controller() {
        let (controller, _client) = TestControllerBuilder::new().two_phase().build();
        assert_eq!(controller.protocol(), ProtocolMode::TwoPhase);
        assert_eq!(controller.context(), Some(&meal_context()));
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_builder_unconfigured() {
        let (controller, _client) = TestControllerBuilder::new().unconfigured().build();
        assert!(controller.context().is_none());
    }
}
