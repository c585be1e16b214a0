//! Line-oriented redemption session.
//!
//! Each input line is either a command (`:confirm`, `:cancel`, ...) or a
//! token. In camera mode token lines are treated as decode events, so a
//! scanner that types codes followed by newline behaves like the camera.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::RedemptionError;
use crate::redemption::{InputMode, Phase, RedemptionController, RedemptionSnapshot};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    Confirm,
    Cancel,
    SwitchMode(InputMode),
    ShowState,
    Quit,
    Token(String),
    Unknown(String),
}

pub fn parse_line(line: &str) -> SessionInput {
    let trimmed = line.trim();
    match trimmed {
        ":confirm" | ":y" => SessionInput::Confirm,
        ":cancel" | ":n" => SessionInput::Cancel,
        ":camera" => SessionInput::SwitchMode(InputMode::Camera),
        ":manual" => SessionInput::SwitchMode(InputMode::Manual),
        ":state" => SessionInput::ShowState,
        ":quit" | ":q" => SessionInput::Quit,
        cmd if cmd.starts_with(':') => SessionInput::Unknown(cmd.to_string()),
        _ => SessionInput::Token(line.to_string()),
    }
}

/// Multi-line description of a snapshot for `:state`.
pub fn describe(snapshot: &RedemptionSnapshot) -> String {
    let mut out = format!(
        "phase: {}\ninput: {}\nprotocol: {}",
        snapshot.phase,
        snapshot.input_mode.as_str(),
        snapshot.protocol.as_str()
    );
    if let Some(attempt) = snapshot.attempt {
        out.push_str(&format!("\nattempt: {}", attempt));
    }
    if let Some(info) = &snapshot.info {
        out.push_str(&format!("\nholder: {}\nfor: {}", info.holder_name, info.resource_label));
        if let Some(price) = info.price {
            out.push_str(&format!("\nprice: {:.2}", price));
        }
    }
    if let Some(receipt) = &snapshot.receipt {
        out.push_str(&format!("\nredeemed at: {}", receipt.redeemed_at.to_rfc3339()));
    }
    if let Some(error) = &snapshot.error {
        out.push_str(&format!("\nerror: {} ({})", error.user_message(), error.error_code()));
        if error.is_failure() {
            let category = error.category();
            out.push_str(&format!(
                "\nkind: {}\nhint: {}",
                category.description(),
                category.recovery_hint()
            ));
        }
    }
    out
}

/// Drive `controller` from `input` until EOF or `:quit`, writing status
/// lines to `output`.
///
/// At EOF, outstanding validate/commit calls are awaited so their result is
/// reported; display timers are not.
pub async fn run_session<R, W>(
    controller: &mut RedemptionController,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(mut message_rx) = controller.take_message_rx() else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "controller message receiver already taken",
        ));
    };
    let mut lines = input.lines();
    let mut last_status = String::new();
    emit_status(controller, &mut output, &mut last_status).await?;

    loop {
        tokio::select! {
            biased;

            Some(msg) = message_rx.recv() => controller.handle_message(msg),

            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !handle_line(controller, &line, &mut output).await? {
                    break;
                }
            }
        }
        emit_status(controller, &mut output, &mut last_status).await?;
    }

    while controller.phase().is_in_flight() {
        match message_rx.recv().await {
            Some(msg) => controller.handle_message(msg),
            None => break,
        }
        emit_status(controller, &mut output, &mut last_status).await?;
    }

    controller.shutdown();
    output.flush().await
}

/// Returns false when the session should end.
async fn handle_line<W>(
    controller: &mut RedemptionController,
    line: &str,
    output: &mut W,
) -> std::io::Result<bool>
where
    W: AsyncWrite + Unpin,
{
    match parse_line(line) {
        SessionInput::Quit => return Ok(false),
        SessionInput::Confirm => {
            if !controller.confirm() {
                write_line(output, "Nothing to confirm").await?;
            }
        }
        SessionInput::Cancel => {
            let abandons = matches!(
                controller.phase(),
                Phase::Validating | Phase::AwaitingConfirmation
            );
            if controller.cancel() {
                if abandons {
                    write_line(output, &RedemptionError::Cancelled.user_message()).await?;
                }
            } else if controller.phase() == Phase::Committing {
                write_line(output, "Cannot cancel while redeeming").await?;
            }
        }
        SessionInput::SwitchMode(mode) => {
            controller.switch_input_mode(mode);
        }
        SessionInput::ShowState => {
            write_line(output, &describe(&controller.state())).await?;
        }
        SessionInput::Unknown(cmd) => {
            write_line(output, &format!("Unknown command {}", cmd)).await?;
        }
        SessionInput::Token(text) => match controller.state().input_mode {
            InputMode::Camera => {
                controller.on_decoded(&text);
            }
            InputMode::Manual => match controller.submit_manual(&text) {
                Ok(Some(_)) => {}
                Ok(None) => write_line(output, "Busy: finish the current redemption first").await?,
                Err(err) => write_line(output, &err.user_message()).await?,
            },
        },
    }
    Ok(true)
}

async fn emit_status<W>(
    controller: &RedemptionController,
    output: &mut W,
    last_status: &mut String,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let status = controller.state().status_line();
    if status != *last_status {
        write_line(output, &status).await?;
        *last_status = status;
    }
    Ok(())
}

async fn write_line<W>(output: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await
}
