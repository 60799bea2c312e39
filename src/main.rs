mod food;
mod game;
mod input;
mod render;
mod snake;
mod term;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};

use game::{SnakeGame, DEFAULT_TICKS_PER_SECOND, MAX_TICKS_PER_SECOND, MIN_TICKS_PER_SECOND};
use render::{Renderer, Theme};
use term::TermManager;

pub type TermInt = u16;
pub type Coords = (u16, u16);

/// Snake on a wrapping board, in the terminal.
///
/// Move with WASD, hjkl or the arrow keys; `]`/`x` speeds up, `[`/`z` slows
/// down, `q` quits.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Ticks per second at start.
    #[arg(
        long,
        value_name = "TICKS",
        default_value_t = DEFAULT_TICKS_PER_SECOND,
        value_parser = clap::value_parser!(u16)
            .range(MIN_TICKS_PER_SECOND as i64..=MAX_TICKS_PER_SECOND as i64)
    )]
    tps: u16,

    /// Show head, food, direction, queue and speed in the top-left corner.
    #[arg(long)]
    debug: bool,

    /// Write a log to this file. Nothing is logged without it.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log verbosity.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

fn init_logging(args: &Args) -> Result<()> {
    let path = match &args.log_file {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    WriteLogger::init(args.log_level, Config::default(), file).context("initializing logger")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    log::info!("starting tsnake");

    let term = TermManager::new()?;
    let renderer = Renderer::new(Theme::default(), args.debug);
    let mut game = SnakeGame::new(term, renderer, args.tps);

    // The terminal is handed back when `game` drops, on success or error
    game.play()
}
