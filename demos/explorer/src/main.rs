//! Explorer - actionkit demo
//!
//! Select a resource and open its context menu; which actions appear, and
//! which handler runs, depends on the kind of resource selected.
//!
//! # Usage
//!
//! ```sh
//! cargo run -p explorer-demo
//!
//! # Override default shortcuts, log to a file
//! cargo run -p explorer-demo -- --config shortcuts.json --log explorer.log
//! ```

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use actionkit::{RegistryConfig, RegistryOverrides};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use explorer_demo::contributors::build_registry;
use explorer_demo::events::{spawn_event_poller, InputEvent};
use explorer_demo::{logging, sample_resources, ui, App, Command, Commands, Operation};

/// Resource explorer demonstrating contributed actions
#[derive(Parser, Debug)]
#[command(name = "explorer")]
#[command(about = "A resource explorer demonstrating actionkit")]
struct Args {
    /// JSON registry config (shortcut overrides, linked bypass policy)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Simulated duration of long-running operations, in milliseconds
    #[arg(long, default_value = "1500")]
    work_ms: u64,
}

fn load_config(path: Option<&PathBuf>) -> io::Result<RegistryConfig> {
    let Some(path) = path else {
        return Ok(RegistryConfig::default());
    };
    let json = std::fs::read_to_string(path)?;
    let user = RegistryOverrides::from_json(&json)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(RegistryConfig::default().merge(user))
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    // The terminal is ours; logs only go to a file. The guard flushes on drop.
    let _log_guard = args.log.as_deref().map(logging::init).transpose()?;

    let config = load_config(args.config.as_ref())?;
    let (command_tx, command_rx) = mpsc::unbounded_channel::<Command>();
    let commands = Commands::new(command_tx);
    let registry = build_registry(config, commands.clone())
        .map_err(io::Error::other)?;
    let mut app = App::new(registry, commands, sample_resources());

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &mut app,
        command_rx,
        Duration::from_millis(args.work_ms),
    )
    .await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut command_rx: mpsc::UnboundedReceiver<Command>,
    work: Duration,
) -> io::Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<InputEvent>();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(Operation, String)>();
    let cancel_token = CancellationToken::new();
    let _handle = spawn_event_poller(
        event_tx,
        Duration::from_millis(10),
        Duration::from_millis(16),
        cancel_token.clone(),
    );

    let mut should_render = true;

    loop {
        if should_render {
            terminal.draw(|frame| ui::render(frame, app))?;
            should_render = false;
        }

        tokio::select! {
            Some(input) = event_rx.recv() => {
                should_render = match input {
                    InputEvent::Key(key) => app.handle_key(key),
                    InputEvent::Resize(_, _) => true,
                };
                if app.should_quit() {
                    break;
                }
            }
            Some(command) = command_rx.recv() => {
                if let Some((op, name)) = app.apply(command) {
                    let done_tx = done_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(work).await;
                        let _ = done_tx.send((op, name));
                    });
                }
                should_render = true;
            }
            Some((op, name)) = done_rx.recv() => {
                app.finish(op, &name);
                should_render = true;
            }
        }
    }

    cancel_token.cancel();
    Ok(())
}
