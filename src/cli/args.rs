//! Command-line argument parsing for portal-redeem.

use thiserror::Error;

use crate::adapters::PortalFlow;
use crate::logging::LogLevel;
use crate::redemption::InputMode;

/// Options for an interactive redemption session.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub flow: PortalFlow,
    pub resource_id: Option<String>,
    pub session_id: Option<String>,
    pub input_mode: InputMode,
    pub log_level: LogLevel,
    pub log_json: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            flow: PortalFlow::EventCheckIn,
            resource_id: None,
            session_id: None,
            input_mode: InputMode::Manual,
            log_level: LogLevel::default(),
            log_json: false,
        }
    }
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Run the redemption loop (default)
    Run(RunOptions),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("Missing value for {0}")]
    MissingValue(String),
    #[error("Unknown flow '{0}' (expected 'event' or 'meal')")]
    UnknownFlow(String),
    #[error("Unknown argument '{0}'")]
    UnknownArgument(String),
}

pub const USAGE: &str = "\
Usage: portal-redeem [OPTIONS]

Options:
  --flow <event|meal>   Redemption flow (default: event)
  --resource <ID>       Event or meal id
  --session <ID>        Meal session id (meal flow)
  --camera              Treat input lines as camera decodes
  --log-level <LEVEL>   trace, debug, info, warn or error (default: info)
  --log-json            Emit JSON logs on stderr
  -V, --version         Print version
  -h, --help            Print this help

Commands while running:
  :confirm  :cancel  :camera  :manual  :state  :quit";

/// Parse command-line arguments (including the program name).
///
/// # Examples
///
/// ```
/// use portal_redeem::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["portal-redeem".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut options = RunOptions::default();
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--flow" => {
                let value = args.next().ok_or_else(|| ArgsError::MissingValue(arg.clone()))?;
                options.flow =
                    PortalFlow::from_name(&value).ok_or(ArgsError::UnknownFlow(value))?;
            }
            "--resource" => {
                options.resource_id =
                    Some(args.next().ok_or_else(|| ArgsError::MissingValue(arg.clone()))?);
            }
            "--session" => {
                options.session_id =
                    Some(args.next().ok_or_else(|| ArgsError::MissingValue(arg.clone()))?);
            }
            "--camera" => options.input_mode = InputMode::Camera,
            "--log-level" => {
                let value = args.next().ok_or_else(|| ArgsError::MissingValue(arg.clone()))?;
                options.log_level = LogLevel::from(value.as_str());
            }
            "--log-json" => options.log_json = true,
            _ => return Err(ArgsError::UnknownArgument(arg)),
        }
    }
    Ok(CliCommand::Run(options))
}
