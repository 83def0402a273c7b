use std::fs::File;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use grid_snake::config::{GameConfig, Settings};
use grid_snake::controller::Controller;
use grid_snake::error::AppError;
use grid_snake::game::GameStatus;
use grid_snake::input::{GameInput, InputHandler};
use grid_snake::renderer;
use grid_snake::terminal_runtime::{AppTerminal, TerminalSession, restore_terminal};
use grid_snake::ui::buttons::ButtonLayout;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "grid_snake=info";

/// Longest wait for input while no timer is armed.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Settings file (JSON). Defaults to the per-user config file when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// Write tracing output to this file. `RUST_LOG` overrides the filter.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mut config = Settings::load(cli.config.as_deref())?.validate()?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    tracing::info!(
        width = config.area.width,
        height = config.area.height,
        cell = config.area.alpha,
        speed_ms = config.tick_delay.as_millis() as u64,
        seed = ?config.seed,
        "configuration loaded"
    );

    install_panic_hook();

    let mut session = TerminalSession::enter()?;
    run(session.terminal_mut(), &config)?;
    Ok(())
}

fn run(terminal: &mut AppTerminal, config: &GameConfig) -> io::Result<()> {
    let mut input = InputHandler::new();
    let mut controller = Controller::new(config);
    let mut buttons = ButtonLayout::default();
    let mut dirty = true;

    loop {
        if controller.frame_due(Instant::now()) || dirty {
            terminal.draw(|frame| {
                buttons = renderer::render(frame, &controller, &config.palette);
            })?;
            dirty = false;
        }

        let timeout = controller
            .next_deadline()
            .map_or(IDLE_POLL_INTERVAL, |deadline| {
                deadline.saturating_duration_since(Instant::now())
            });

        if let Some(game_input) = input.poll_input(timeout)? {
            let direction = match game_input {
                GameInput::Quit => break,
                GameInput::Direction(direction) => Some(direction),
                GameInput::Click { column, row } => buttons.hit(column, row),
                GameInput::Confirm => {
                    match controller.status() {
                        GameStatus::Idle => {
                            let _ = controller.start(Instant::now());
                        }
                        GameStatus::Stopped => controller = Controller::new(config),
                        GameStatus::Running => {}
                    }
                    dirty = true;
                    None
                }
                GameInput::Resize => {
                    dirty = true;
                    None
                }
            };

            if let Some(direction) = direction {
                let _ = controller.steer(direction, Instant::now());
            }
        }

        let status_before = controller.status();
        controller.advance(Instant::now());
        if controller.status() != status_before {
            dirty = true;
        }
    }

    tracing::info!(score = controller.state().score, "session ended");
    Ok(())
}

fn init_logging(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));
}
