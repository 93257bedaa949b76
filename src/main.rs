use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event::{poll as event_poll, read as event_read, Event as CrosstermEvent};
use ratatui::Terminal;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;
use treepick::app::{Outcome, Session, SessionEvent};
use treepick::artifact::Artifact;
use treepick::config::Config;
use treepick::config_io::{resolve_config, DirectoryContext};
use treepick::services::fs::LocalFsBackend;
use treepick::services::terminal_modes::{self, TerminalModes};
use treepick::services::watcher::{FsWatcher, WatchMessage};
use treepick::services::{clipboard, tracing_setup};

/// Pick files from a live directory tree and pack them, with a request,
/// into one prompt document
#[derive(Parser, Debug)]
#[command(name = "treepick")]
#[command(version)]
struct Args {
    /// Directory to browse
    #[arg(value_name = "PATH", default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics (default: system temp dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Write the document to stdout instead of the configured target
    #[arg(long)]
    stdout: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

type AppTerminal = Terminal<ratatui::backend::CrosstermBackend<io::Stderr>>;

fn load_config(args: &Args) -> AnyhowResult<Config> {
    let dir_context = match DirectoryContext::from_system() {
        Ok(context) => Some(context),
        Err(e) => {
            tracing::debug!("No user config directory: {}", e);
            None
        }
    };

    resolve_config(dir_context.as_ref(), args.config.as_deref())
        .context("Failed to load configuration")
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(tracing_setup::default_log_path);
    if !tracing_setup::init_global(&log_file) {
        eprintln!("warning: could not open log file {}", log_file.display());
    }
    tracing::info!("treepick starting");

    let mut config = load_config(&args)?;
    if args.stdout {
        config.output.target = treepick::config::OutputTarget::Stdout;
    }

    if args.dump_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    // An unreadable root still starts a session; the status line reports it
    if !args.path.is_dir() {
        tracing::warn!("{:?} is not a readable directory", args.path);
    }

    let (watcher, watch_rx) = FsWatcher::new().context("Failed to start file watcher")?;
    let mut session = Session::new(
        &args.path,
        Arc::new(LocalFsBackend::new()),
        watcher,
        config.clone(),
    );

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    let mut modes = TerminalModes::enable().context("Failed to set up terminal")?;
    let mut terminal = Terminal::new(ratatui::backend::CrosstermBackend::new(io::stderr()))?;
    terminal.clear()?;

    let poll_interval = Duration::from_millis(config.ui.poll_interval_ms);
    let result = run_event_loop(&mut session, &mut terminal, &watch_rx, poll_interval);

    modes.undo();
    tracing::info!(
        "Watched {} directories this session",
        session.watcher().watched_count()
    );
    drop(session);

    match result? {
        Some(artifact) => deliver(&artifact, &config),
        None => {
            tracing::info!("Quit without output");
            Ok(())
        }
    }
}

/// Run until the user quits or submits
///
/// File change messages are applied one per iteration, ahead of terminal
/// input, so a burst of notifications never starves the keyboard for long.
fn run_event_loop(
    session: &mut Session<FsWatcher>,
    terminal: &mut AppTerminal,
    watch_rx: &Receiver<WatchMessage>,
    poll_interval: Duration,
) -> AnyhowResult<Option<Artifact>> {
    let mut needs_render = true;
    let mut watch_open = true;

    loop {
        let mut pending = Vec::with_capacity(2);

        if watch_open {
            match watch_rx.try_recv() {
                Ok(msg) => pending.push(SessionEvent::from(msg)),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("File watcher channel closed");
                    session.set_status_message("File watching stopped".to_string());
                    watch_open = false;
                    needs_render = true;
                }
            }
        }

        if needs_render {
            terminal.draw(|frame| treepick::view::ui::render(frame, session))?;
            needs_render = false;
        }

        // Don't block on the terminal while change messages are queued
        let timeout = if pending.is_empty() {
            poll_interval
        } else {
            Duration::ZERO
        };
        if event_poll(timeout)? {
            match event_read()? {
                CrosstermEvent::Key(key) => pending.push(SessionEvent::Key(key)),
                CrosstermEvent::Paste(text) => pending.push(SessionEvent::Paste(text)),
                CrosstermEvent::Resize(w, h) => pending.push(SessionEvent::Resize(w, h)),
                _ => {}
            }
        }

        for event in pending {
            needs_render = true;
            match session.handle(event) {
                Outcome::Continue => {}
                Outcome::Quit => return Ok(None),
                Outcome::Submit(artifact) => return Ok(Some(artifact)),
            }
        }
    }
}

/// Send the finished document where the configuration says
fn deliver(artifact: &Artifact, config: &Config) -> AnyhowResult<()> {
    for skipped in &artifact.skipped {
        eprintln!("note: {} included as a placeholder", skipped.path.display());
    }

    let target = config.output.target;
    let mut to_stdout = target.to_stdout();
    if target.to_clipboard() {
        let report = clipboard::copy(&artifact.document);
        if report.confirmed() {
            eprintln!("Copied {} bytes to the clipboard", artifact.document.len());
        } else {
            if report.osc52 {
                eprintln!(
                    "warning: system clipboard unavailable; sent OSC 52, which the terminal may ignore"
                );
            } else {
                eprintln!("warning: clipboard unavailable");
            }
            eprintln!("writing the document to stdout");
            to_stdout = true;
        }
    }

    if to_stdout {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", artifact.document)
            .and_then(|_| stdout.flush())
            .context("Failed to write document to stdout")?;
    }

    Ok(())
}
