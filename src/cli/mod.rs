//! CLI module for portal-redeem.
//!
//! - Argument parsing
//! - Version display
//! - The interactive line-driven redemption session
//!
//! ```ignore
//! use portal_redeem::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args())? {
//!     CliCommand::Version => handle_version_command(),
//!     CliCommand::Help => println!("{}", USAGE),
//!     CliCommand::Run(options) => { /* build controller, run_session */ }
//! }
//! ```

pub mod args;
pub mod session;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, RunOptions, USAGE};
pub use session::{describe, parse_line, run_session, SessionInput};
pub use version::{handle_version_command, VERSION};
