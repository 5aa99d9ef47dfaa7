//! # Lockroom Main Entry Point
//!
//! Parses the command line, loads the session configuration and NPC
//! dataset, then runs the scene loop.

use clap::Parser;
use lockroom::scenes::SceneManager;
use lockroom::{
    BuiltinNpcs, InputHandler, LockroomResult, NpcDataSource, NpcFile, NpcRecord, SessionConfig,
};
use log::{error, info, warn};
use macroquad::prelude::*;
use std::path::PathBuf;

/// Command line arguments for Lockroom.
#[derive(Parser, Debug)]
#[command(name = "lockroom")]
#[command(about = "A turn-based grid escape room with quiz-gated key fragments")]
#[command(version)]
struct Args {
    /// Random seed for level generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON file with session tuning
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// NPC record file (name;question;answer;A;B;C;keys;points)
    #[arg(long)]
    npc_file: Option<PathBuf>,

    /// Player name shown on the HUD
    #[arg(long)]
    name: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[macroquad::main("Lockroom")]
async fn main() -> LockroomResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);
    info!("Starting Lockroom v{}", lockroom::VERSION);

    let config = load_config(&args)?;
    let npcs = load_npcs(args.npc_file.as_ref());
    info!(
        "Seed {}, {} NPC records available",
        config.seed,
        npcs.len()
    );

    request_new_screen_size(1280.0, 720.0);

    let mut scenes = SceneManager::new(config, npcs, Box::new(InputHandler::new()))?;
    let result = scenes.run().await;
    if let Err(e) = &result {
        error!("Game loop ended with an error: {}", e);
    }
    info!("Game loop ended");
    result
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing::Level;

        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .parse_default_env()
            .init();
    }
}

/// Reads the JSON config when given, then applies command line overrides.
fn load_config(args: &Args) -> LockroomResult<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load_from_file(path).map_err(|e| {
            error!("Cannot load config {}: {}", path.display(), e);
            e
        })?,
        None => SessionConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(name) = &args.name {
        config.player_name = name.clone();
    }
    Ok(config)
}

/// Loads the NPC file, falling back to the built-in dataset when it is
/// missing or holds no usable record.
fn load_npcs(path: Option<&PathBuf>) -> Vec<NpcRecord> {
    if let Some(path) = path {
        match NpcFile::new(path).load_all() {
            Ok(records) if !records.is_empty() => return records,
            Ok(_) => warn!("{} holds no usable NPC records", path.display()),
            Err(e) => warn!("Falling back to built-in NPCs: {}", e),
        }
    }
    BuiltinNpcs.load_all().unwrap_or_default()
}
