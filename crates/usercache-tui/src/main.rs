//! usercache - a terminal viewer for a remote user list that keeps working
//! offline.
//!
//! Press `f` to fetch the list from the API (it is cached on success) or `c`
//! to show the last cached list. `--fetch` and `--cached` run the same two
//! paths without the TUI and print one name per line.

mod app;
mod ui;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use usercache_core::config::Config;
use usercache_core::models::render_user_list;
use usercache_core::UserDirectory;

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written in TUI mode, inside the cache directory
const LOG_FILE_NAME: &str = "usercache.log";

const USAGE: &str = "\
Usage: usercache [--fetch | --cached | --write-config]

  (no flag)       Start the terminal UI
  --fetch         Fetch users from the API, cache them, print one per line
  --cached        Print the cached users without touching the network
  --write-config  Save the configuration file (environment overrides excluded)";

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr (headless commands)
fn init_tracing_stderr() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

/// Log to a file so log lines never land on the alternate screen.
/// The returned guard flushes the writer when dropped.
fn init_tracing_file(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();
    Ok(guard)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Tui,
    Fetch,
    Cached,
    WriteConfig,
}

fn parse_command(arg: Option<&str>) -> Option<Command> {
    match arg {
        None => Some(Command::Tui),
        Some("--fetch") => Some(Command::Fetch),
        Some("--cached") => Some(Command::Cached),
        Some("--write-config") => Some(Command::WriteConfig),
        Some(_) => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    let command = match parse_command(args.get(1).map(String::as_str)) {
        Some(command) => command,
        None => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let loaded = Config::load();
    // Saved as-is by --write-config; env overrides only apply at runtime
    let file_config = loaded.as_ref().cloned().unwrap_or_default();
    let config = file_config.with_env();

    let _guard = match command {
        Command::Tui => Some(init_tracing_file(&config.cache_dir()?)?),
        _ => {
            init_tracing_stderr();
            None
        }
    };

    if let Err(e) = loaded {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    match command {
        Command::Fetch | Command::Cached => run_headless(&config, command).await,
        Command::WriteConfig => {
            file_config.save()?;
            eprintln!("Configuration saved");
            Ok(())
        }
        Command::Tui => run_tui(config).await,
    }
}

/// Run one of the two paths without the TUI.
/// Names go to stdout; a failure prints its status text and exits non-zero.
async fn run_headless(config: &Config, command: Command) -> Result<()> {
    let directory = UserDirectory::from_config(config)?;

    let result = match command {
        Command::Fetch => directory.fetch_users().await.map_err(|e| e.fetch_status()),
        _ => directory.load_cached_users().map_err(|e| e.cache_status()),
    };

    match result {
        Ok(users) => {
            for line in render_user_list(&users) {
                println!("{}", line);
            }
            Ok(())
        }
        Err(status) => {
            eprintln!("{}", status);
            std::process::exit(1);
        }
    }
}

async fn run_tui(config: Config) -> Result<()> {
    info!("usercache starting");

    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("usercache shutting down");
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout so background results still get drawn
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command(None), Some(Command::Tui));
        assert_eq!(parse_command(Some("--fetch")), Some(Command::Fetch));
        assert_eq!(parse_command(Some("--cached")), Some(Command::Cached));
        assert_eq!(parse_command(Some("--write-config")), Some(Command::WriteConfig));
        assert_eq!(parse_command(Some("--bogus")), None);
    }
}
