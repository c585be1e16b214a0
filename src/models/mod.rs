mod context;
mod redemption;
mod token;

pub use context::{ProtocolMode, RedemptionContext};
pub use redemption::{RedemptionInfo, RedemptionReceipt};
pub use token::Token;
