use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use engine::runtime::Inventory;
use engine::{load_world_file, InputEvent, PlayError, Session, TickReport, WorldLoadError};
use thiserror::Error;
use tracing::{error, info, warn};

use super::bootstrap::AppWiring;
use super::console::{CommandRegistry, LocalAction, ParsedCommand, PlayCommand};
use super::dialog::ConsoleDialog;
use super::render::TraceRenderTarget;

type ConsoleSession = Session<TraceRenderTarget, ConsoleDialog>;

#[derive(Debug, Error)]
pub(crate) enum DriverError {
    #[error("no world file given: pass a path or set TILEPLAY_WORLD")]
    MissingWorld,
    #[error(transparent)]
    Load(#[from] WorldLoadError),
    #[error("failed to begin session: {0}")]
    Begin(#[source] PlayError),
    #[error("failed to read command: {0}")]
    Stdin(#[source] io::Error),
    #[error("failed to write output: {0}")]
    Stdout(#[source] io::Error),
    #[error("failed to encode summary: {0}")]
    Summary(#[source] serde_json::Error),
}

/// Failure of a single command. The session stays usable.
#[derive(Debug, Error)]
enum CommandError {
    #[error(transparent)]
    Play(#[from] PlayError),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    if let Err(err) = run_session(app) {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run_session(app: AppWiring) -> Result<(), DriverError> {
    let path = app.world_path.ok_or(DriverError::MissingWorld)?;
    let loaded = load_world_file(&path)?;
    info!(path = %path.display(), digest = %loaded.digest_sha256_hex, "world_ready");

    let mut session = Session::begin(
        loaded.world,
        app.config,
        TraceRenderTarget::default(),
        ConsoleDialog::new(app.page_chars),
    )
    .map_err(DriverError::Begin)?;
    let registry = CommandRegistry::with_builtins();
    let mut stdout = io::stdout().lock();
    let mut output = Vec::new();

    for line in io::stdin().lock().lines() {
        let line = line.map_err(DriverError::Stdin)?;
        let command = match registry.parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(stdout, "{message}").map_err(DriverError::Stdout)?;
                continue;
            }
        };

        let mut replies = Vec::new();
        match command {
            ParsedCommand::Local(LocalAction::Help) => replies.extend(registry.help_lines()),
            ParsedCommand::Local(LocalAction::Quit) => break,
            ParsedCommand::Play(command) => {
                if let Err(err) = apply(&mut session, command, &mut replies) {
                    warn!(error = %err, "command_failed");
                    replies.push(format!("error: {err}"));
                }
            }
        }
        session.dialog_mut().drain_output_into(&mut output);
        output.append(&mut replies);
        for reply in output.drain(..) {
            writeln!(stdout, "{reply}").map_err(DriverError::Stdout)?;
        }
    }

    let summary = session.end();
    let encoded = serde_json::to_string(&summary).map_err(DriverError::Summary)?;
    writeln!(stdout, "{encoded}").map_err(DriverError::Stdout)?;
    Ok(())
}

fn apply(
    session: &mut ConsoleSession,
    command: PlayCommand,
    replies: &mut Vec<String>,
) -> Result<(), CommandError> {
    match command {
        PlayCommand::KeyDown { key } => {
            session.handle_input(InputEvent::KeyDown { key, repeat: false })?
        }
        PlayCommand::KeyUp { key } => session.handle_input(InputEvent::KeyUp { key })?,
        PlayCommand::Press { key } => {
            session.handle_input(InputEvent::KeyDown {
                key: key.clone(),
                repeat: false,
            })?;
            let ticked = session.tick(0.0);
            session.handle_input(InputEvent::KeyUp { key })?;
            replies.push(describe_tick(&ticked?));
        }
        PlayCommand::PointerDown { x, y } => {
            session.handle_input(InputEvent::PointerDown { x, y })?
        }
        PlayCommand::PointerMove { x, y } => {
            session.handle_input(InputEvent::PointerMove { x, y })?
        }
        PlayCommand::PointerUp => session.handle_input(InputEvent::PointerUp)?,
        PlayCommand::Tick { ms } => {
            let report = session.tick(ms)?;
            replies.push(describe_tick(&report));
        }
        PlayCommand::Confirm => session.confirm_dialog()?,
        PlayCommand::State => replies.push(serde_json::to_string(&session.summary())?),
        PlayCommand::Inventory => replies.push(describe_inventory(&session.state().inventory)),
    }
    Ok(())
}

fn describe_tick(report: &TickReport) -> String {
    match report.movement {
        Some(outcome) => format!("frame {} {:?}", report.frame_index, outcome),
        None => format!("frame {}", report.frame_index),
    }
}

fn describe_inventory(inventory: &Inventory) -> String {
    let lines: Vec<String> = inventory
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(item, count)| format!("{item} {count}"))
        .collect();
    if lines.is_empty() {
        "(empty)".to_string()
    } else {
        lines.join("\n")
    }
}
