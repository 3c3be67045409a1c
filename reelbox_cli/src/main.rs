use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reelbox_core::{
    xp_needed_for_level, EngineParams, EntropyRandom, GameMode, JsonFileStore, MemoryStore,
    Profile, ProfileStore, RandomSource, SeededRandom, StoreError,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod display;
mod game;
mod terminal;

use config::GameConfig;
use game::{today_string, Game, Pacing};

#[derive(Parser)]
#[command(name = "reelbox", about = "Three-reel terminal slot machine", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Profile save file (defaults to the user data directory)
    #[arg(long, global = true, env = "REELBOX_SAVE")]
    save: Option<PathBuf>,

    /// Config file (defaults to reelbox.toml in the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for a reproducible session
    #[arg(long, global = true)]
    seed: Option<String>,

    /// Play without XP, levels or daily challenges
    #[arg(long, global = true)]
    classic: bool,

    /// Milliseconds between animation frames
    #[arg(long, global = true)]
    tick_ms: Option<u64>,

    /// Keep the profile in memory only
    #[arg(long, global = true)]
    no_save: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the slot machine (default)
    Play,
    /// Show the saved profile
    Stats,
    /// Wipe the saved profile
    Reset,
}

fn init_logging(cli: &Cli) -> Result<()> {
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = GameConfig::load(cli.config.as_deref())?;
    if let Some(save) = &cli.save {
        config.save_path = Some(save.clone());
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_ms = tick_ms;
    }
    if cli.classic {
        config.mode = GameMode::Classic;
    }
    Ok(config)
}

fn build_rng(seed: Option<&str>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => {
            let rng = SeededRandom::new(seed);
            info!(seed_hash = %rng.seed_hash_hex(), "seeded session");
            Box::new(rng)
        }
        None => Box::new(EntropyRandom::new()),
    }
}

fn print_stats(store: &dyn ProfileStore, profile: &Profile, mode: GameMode) {
    println!("Profile: {}", store.describe());
    println!(
        "  best ${} | spent ${} | earned ${} | net {:+}",
        profile.high_score.max(profile.earned),
        profile.spent,
        profile.earned,
        profile.balance()
    );
    println!("  streak {}", profile.streak);
    if mode.has_progression() {
        println!(
            "  level {} ({}/{} XP)",
            profile.level,
            profile.xp,
            xp_needed_for_level(profile.level)
        );
        println!("  {}", display::challenge_line(profile));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    let config = build_config(&cli)?;

    let store: Box<dyn ProfileStore> = if cli.no_save {
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonFileStore::new(config.save_path()))
    };
    let mut rng = build_rng(cli.seed.as_deref());
    let today = today_string();
    let params = EngineParams {
        mode: config.mode,
        stop_ticks: config.stop_ticks,
        ..EngineParams::default()
    };

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => {
            let mut game = Game::new(
                params,
                store.as_ref(),
                rng.as_mut(),
                Pacing::from_tick_ms(config.tick_ms),
                config.default_bet,
                today,
            );
            game.run(&mut terminal::Terminal::stdio())?;
        }
        Commands::Stats => match store.try_load(&today, rng.as_mut()) {
            Ok(profile) => print_stats(store.as_ref(), &profile, config.mode),
            Err(StoreError::Missing) => println!("No saved profile at {}", store.describe()),
            Err(e) => return Err(e).context("Failed to read profile"),
        },
        Commands::Reset => {
            let mut profile = Profile::new(today);
            store
                .try_save(&mut profile)
                .context("Failed to reset profile")?;
            println!("Profile reset at {}", store.describe());
        }
    }

    Ok(())
}
