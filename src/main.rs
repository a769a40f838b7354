use std::env;
use std::fs::File;
use std::io;
use std::process;
use std::sync::mpsc;

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

use term_snake::{Controller, GameConfig, GameState, InputPump};

const LOG_FILE: &str = "term-snake.log";

/// Raw mode and the alternate screen for as long as this lives. Dropping it
/// restores the terminal, including while unwinding from a panic.
struct TerminalGuard;

impl TerminalGuard {
    fn acquire() -> io::Result<Self> {
        enable_raw_mode()?;
        // Construct first so a failure below still restores raw mode.
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = execute!(io::stdout(), Show, LeaveAlternateScreen) {
            error!("failed to leave alternate screen: {err}");
        }
        if let Err(err) = disable_raw_mode() {
            error!("failed to disable raw mode: {err}");
        }
    }
}

fn main() {
    init_logging();

    if let Err(err) = run() {
        error!("{err:#}");
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn init_logging() {
    let path = env::temp_dir().join(LOG_FILE);
    let logger = File::create(&path)
        .map_err(anyhow::Error::from)
        .and_then(|file| {
            WriteLogger::init(LevelFilter::Info, Config::default(), file).map_err(Into::into)
        });
    if let Err(err) = logger {
        eprintln!("logging disabled, cannot write {}: {err}", path.display());
    }
}

fn run() -> Result<()> {
    let (cols, rows) = terminal::size().context("failed to read terminal size")?;
    let cfg = GameConfig::for_terminal(cols, rows)?;
    info!("starting on a {cols}x{rows} terminal");

    let _guard = TerminalGuard::acquire().context("failed to initialise the terminal")?;
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to build terminal backend")?;

    let (tx, rx) = mpsc::channel();
    // Declared after the guard so the input thread is joined before the
    // terminal leaves raw mode.
    let _input = InputPump::spawn(tx).context("failed to start the input thread")?;

    let mut controller = Controller::new(GameState::new(cfg), terminal);
    controller.run(&rx)
}
