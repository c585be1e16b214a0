//! Single-use token redemption.
//!
//! [`RedemptionController`] owns the state machine for one redemption point
//! (an event check-in desk, a meal counter). [`TokenSource`] feeds it tokens
//! from the camera or the keyboard, and the two collaborator traits in
//! `crate::traits` do the network work.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut controller = RedemptionController::with_client(client, RedemptionConfig::default());
//! controller.configure(RedemptionContext::new("E1"), ProtocolMode::OnePhase)?;
//! controller.on_decoded("tok-1");
//! while controller.process_next().await {
//!     println!("{}", controller.state().status_line());
//! }
//! ```

mod controller;
mod messages;
mod state;
mod timer;
mod token_source;

pub use controller::RedemptionController;
pub use messages::RedemptionMessage;
pub use state::{AttemptId, InputMode, Phase, RedemptionSnapshot};
pub use timer::ResetTimer;
pub use token_source::TokenSource;
