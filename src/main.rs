use std::io::stdout;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod deluxe48;
mod engine;
mod error;
mod record;
mod tui;

use deluxe48::Deluxe48;
use engine::board::Board;
use record::RecordStore;
use tui::colors::Theme;
use tui::crossterm::{Crossterm, CrosstermEvents};

/// Terminal 2048 with a persistent best-score record.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// File the best score is persisted to.
    #[arg(long, default_value = "record.txt")]
    record_file: PathBuf,

    /// Seed for the tile RNG; rounds are reproducible for a given seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Log destination. The terminal itself belongs to the board, so log
    /// output goes to a file.
    #[arg(long, default_value = "deluxe48.log")]
    log_file: PathBuf,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message,
            ))
        })
        .level(cli.verbosity.log_level_filter())
        .chain(fern::log_file(&cli.log_file)?)
        .apply()?;

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let board = Board::new(rng);
    let store = RecordStore::new(cli.record_file);

    let w = stdout().lock();
    let renderer = Crossterm::new(Box::new(w), Theme::default())?;
    let event_source = CrosstermEvents::default();

    let game = Deluxe48::new(board, store, renderer, event_source);
    game.run()?;

    Ok(())
}
