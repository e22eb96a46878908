use anyhow::Context;
use clap::Parser;
use pathplay_core::*;
use std::path::PathBuf;

mod config;
mod game;
mod input;
mod menu;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Difficulty (easy, medium, hard), skips the menu
    #[arg(short, long)]
    difficulty: Option<String>,

    /// Cell content (numbers, shapes, animals), skips the menu
    #[arg(short, long)]
    theme: Option<String>,

    /// Side length of the square grid
    #[arg(long)]
    grid_size: Option<GridSize>,

    /// Longest sequence to memorize
    #[arg(long)]
    max_tiles: Option<CellCount>,

    /// Stop levels from growing past max tiles
    #[arg(long)]
    cap_level: bool,

    /// Settings file with grid size and reveal timings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    let settings = match &args.config {
        Some(path) => config::Settings::load(path)?,
        None => config::Settings::default(),
    };
    let base = SessionConfig::new(
        args.grid_size
            .or(settings.grid_size)
            .unwrap_or(DEFAULT_GRID_SIZE),
        args.max_tiles
            .or(settings.max_tiles)
            .unwrap_or(DEFAULT_MAX_TILES),
    )
    .context("Invalid grid settings")?
    .with_timings(settings.timings)
    .with_level_cap(args.cap_level || settings.cap_level_at_max_tiles.unwrap_or(false));

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let difficulty = args.difficulty.or(settings.difficulty);
    let theme = args.theme.or(settings.theme);
    let mut skip_menu = difficulty.is_some() || theme.is_some();
    let mut selection = menu::Selection::from_names(difficulty.as_deref(), theme.as_deref());

    let lines = input::spawn_stdin_reader();
    for round in 0u64.. {
        if !skip_menu {
            match menu::choose(&lines, selection)? {
                Some(chosen) => selection = chosen,
                None => break,
            }
        }
        skip_menu = false;

        let config = base
            .clone()
            .with_difficulty(selection.difficulty)
            .with_theme(selection.theme);
        let mut session = LevelSession::new(config, SystemClock, seed.wrapping_add(round));
        session.subscribe(|snapshot| println!("{}", render::frame(snapshot)));
        println!("{}", render::frame(&session.snapshot()));

        if game::play(&mut session, &lines) == game::Exit::Quit {
            break;
        }
    }

    log::debug!("bye");
    Ok(())
}
