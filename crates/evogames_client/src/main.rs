//! evogames - terminal front-end for the social-dilemma simulation backend
//!
//! Sends configurations to the backend, then replays the returned rounds in
//! the terminal with pause/step/stop controls.
//!
//! Storage locations:
//! - Linux: ~/.local/share/evogames/
//! - Windows: %APPDATA%\evogames\
//! - MacOS: ~/Library/Application Support/evogames/

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use evogames::form::FormState;
use evogames::model::{DilemmaKind, Results, SimulationConfig};
use evogames::session::Session;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod backend;
mod error;
mod paths;
mod player;
mod render;
mod scheduler;
mod settings;

use backend::BackendClient;
use error::{ClientError, Result};
use paths::AppPaths;
use render::TerminalRenderer;
use scheduler::TokioScheduler;
use settings::{ClientSettings, BACKEND_URL_ENV};

#[derive(Parser, Debug)]
#[command(name = "evogames", version, about = "Social-dilemma simulation client", long_about = None)]
struct Cli {
    /// Backend base URL (overrides settings.json and the environment)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Data directory (defaults to the OS data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct PlaybackArgs {
    /// Milliseconds per round during playback
    #[arg(long)]
    speed: Option<u32>,

    /// Print the final results without animating
    #[arg(long)]
    no_animate: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a configuration file the way the form does
    Validate { config: PathBuf },
    /// Store a configuration on the backend
    Save { config: PathBuf },
    /// Run a simulation and replay it
    Run {
        config: PathBuf,
        #[command(flatten)]
        playback: PlaybackArgs,
    },
    /// Replay saved results (defaults to the last run)
    Replay {
        #[arg(long)]
        results: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        playback: PlaybackArgs,
    },
    /// Write a default configuration draft for a dilemma kind
    Init {
        kind: DilemmaKind,
        name: String,
        /// Output file (defaults to the drafts dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|e| ClientError::io(path, e))?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ClientError::io(parent, e))?;
    }
    let raw = serde_json::to_string_pretty(value)?;
    fs::write(path, raw).map_err(|e| ClientError::io(path, e))
}

/// Load a config and apply the same rules the form enforces before submit.
fn load_config(path: &Path) -> Result<SimulationConfig> {
    let config: SimulationConfig = read_json(path)?;
    config.check()?;
    FormState::from_config(&config).validate()?;
    Ok(config)
}

async fn show(
    results: Results,
    config: SimulationConfig,
    settings: &ClientSettings,
    playback: &PlaybackArgs,
) {
    let (scheduler, mut ticks) = TokioScheduler::new();
    let mut session = Session::new(scheduler, TerminalRenderer::new(std::io::stdout()));
    session.set_interval(playback.speed.unwrap_or(settings.tick_ms));
    session.load(Arc::new(results), config);
    if !playback.no_animate {
        let mut commands = player::spawn_stdin_reader();
        player::animate(&mut session, &mut ticks, &mut commands).await;
    }
    debug!(frames = session.renderer().frames(), "playback finished");
    session.dispose();
}

async fn dispatch(cli: Cli, paths: AppPaths, settings: ClientSettings) -> Result<()> {
    match cli.command {
        Command::Validate { config } => {
            let cfg = load_config(&config)?;
            println!(
                "ok: {:?} ({}, {} agents, {} rounds)",
                cfg.name,
                cfg.kind().display_name(),
                cfg.total_agents(),
                cfg.rounds
            );
        }
        Command::Save { config } => {
            let cfg = load_config(&config)?;
            let client = BackendClient::new(&settings)?;
            match client.save_config(&cfg).await? {
                Some(filename) => println!("Configuration saved successfully! ({filename})"),
                None => println!("Configuration saved successfully!"),
            }
        }
        Command::Run { config, playback } => {
            let cfg = load_config(&config)?;
            let client = BackendClient::new(&settings)?;
            info!(backend = %settings.backend_url, name = %cfg.name, "running simulation");
            let run = client.simulate(&cfg).await?;
            if let Err(e) = write_json(&paths.last_results_file(), &run.results)
                .and_then(|_| write_json(&paths.last_config_file(), &cfg))
            {
                warn!("could not keep a copy of this run: {}", e);
            }
            if let Some(filename) = &run.filename {
                println!("Simulation saved as {filename}");
            }
            show(run.results, cfg, &settings, &playback).await;
        }
        Command::Replay {
            results,
            config,
            playback,
        } => {
            let results_path = results.unwrap_or_else(|| paths.last_results_file());
            let config_path = config.unwrap_or_else(|| paths.last_config_file());
            let results: Results = read_json(&results_path)?;
            let cfg: SimulationConfig = read_json(&config_path)?;
            show(results, cfg, &settings, &playback).await;
        }
        Command::Init { kind, name, out } => {
            let cfg = SimulationConfig::with_defaults(kind, name);
            let path = out.unwrap_or_else(|| paths.draft_file(&cfg.name));
            write_json(&path, &cfg)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (stderr, so rendered frames stay clean on stdout)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = match &cli.data_dir {
        Some(dir) => AppPaths::at(dir)?,
        None => AppPaths::new()?,
    };
    debug!(data_dir = %paths.data_dir().display(), "using data directory");
    let settings = ClientSettings::load(&paths.settings_file())?
        .with_backend_override(std::env::var(BACKEND_URL_ENV).ok())
        .with_backend_override(cli.backend_url.clone());

    if let Err(e) = dispatch(cli, paths, settings).await {
        error!("{}", e);
        return Err(e.into());
    }
    Ok(())
}
