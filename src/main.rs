use std::sync::Arc;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use tokio::io::BufReader;

use portal_redeem::adapters::{PortalApiClient, ReqwestHttpClient};
use portal_redeem::cli::{handle_version_command, parse_args, run_session, CliCommand, RunOptions, USAGE};
use portal_redeem::config::{ApiConfig, RedemptionConfig};
use portal_redeem::logging::init_logging;
use portal_redeem::models::RedemptionContext;
use portal_redeem::redemption::RedemptionController;

fn main() -> Result<()> {
    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    let options = match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        CliCommand::Run(options) => options,
    };

    color_eyre::install()?;

    if let Err(e) = init_logging(options.log_level, options.log_json) {
        eprintln!("Warning: {}", e);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(options))
}

async fn run(options: RunOptions) -> Result<()> {
    let redemption_config = RedemptionConfig::from_env()?;
    let api_config = ApiConfig::from_env()?;

    let http = ReqwestHttpClient::with_timeout(api_config.request_timeout)
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;
    let client = Arc::new(PortalApiClient::new(
        Arc::new(http),
        api_config.clone(),
        options.flow,
    ));

    tracing::info!(
        api = %api_config.base_url,
        flow = ?options.flow,
        "starting redemption session"
    );

    let mut controller = RedemptionController::with_client(client, redemption_config);

    match &options.resource_id {
        Some(resource_id) => {
            let mut context = RedemptionContext::new(resource_id.clone());
            if let Some(session_id) = &options.session_id {
                context = context.with_secondary_id(session_id.clone());
            }
            controller.configure(context, options.flow.protocol_mode())?;
        }
        None => tracing::warn!("no --resource given; every token will fail with missing context"),
    }
    controller.switch_input_mode(options.input_mode);

    let stdin = BufReader::new(tokio::io::stdin());
    run_session(&mut controller, stdin, tokio::io::stdout()).await?;
    Ok(())
}
