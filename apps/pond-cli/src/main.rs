use anyhow::Context;
use clap::{Parser, Subcommand};
use pond_arcade::{ArcadeBackend, run_tick};
use pond_common::EntityRef;
use pond_input::{DirectionalInput, PlayerController};
use pond_kernel::{MovementBackend, SimConfig, Simulation};
use pond_render::{DebugTextRenderer, RenderView, Renderer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pond-cli", about = "Headless host for the turtle pond simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the default configuration as JSON
    Config,
    /// Run the pond for a number of ticks
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// Tick length in milliseconds
        #[arg(long, default_value = "16")]
        dt_ms: u64,
        /// JSON config file; missing fields take their defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// RNG seed, overrides the config file
        #[arg(short, long)]
        seed: Option<u64>,
        /// Initial turtle count, overrides the config file
        #[arg(long)]
        turtles: Option<usize>,
        /// Initial food count, overrides the config file
        #[arg(long)]
        foods: Option<usize>,
        /// Direction keys held by the player for the whole run, e.g. "up,left"
        #[arg(short, long)]
        player: Option<DirectionalInput>,
        /// Print a frame every N ticks (0 prints only the last one)
        #[arg(short, long, default_value = "60")]
        every: u64,
        /// Print JSON snapshots instead of text frames
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = SimConfig::default();
            println!("pond-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("arena: {}x{}", config.arena.width(), config.arena.height());
            println!(
                "turtles={} foods={} steering={:?}",
                config.initial_turtle_count, config.initial_food_count, config.steering
            );
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&SimConfig::default())?);
        }
        Commands::Run {
            ticks,
            dt_ms,
            config,
            seed,
            turtles,
            foods,
            player,
            every,
            json,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(turtles) = turtles {
                config.initial_turtle_count = turtles;
            }
            if let Some(foods) = foods {
                config.initial_food_count = foods;
            }

            let mut sim = Simulation::new(config.clone()).context("invalid configuration")?;
            let mut backend = ArcadeBackend::new(config.arena);
            backend.insert(EntityRef::Player, config.arena.center());
            sim.populate(&mut backend);

            let controller = PlayerController::default();
            let input = player.unwrap_or_default();
            let dt = Duration::from_millis(dt_ms);
            let renderer = DebugTextRenderer::new();
            let view = RenderView::default();

            tracing::info!(
                ticks,
                dt_ms,
                seed = config.seed,
                steering = sim.steering_name(),
                "run"
            );

            let mut eaten = 0;
            for n in 1..=ticks {
                controller.drive(&input, &mut backend);
                let report = run_tick(&mut sim, &mut backend, dt);
                eaten += report.consumed.len();

                let due = n == ticks || (every > 0 && n % every == 0);
                if !due {
                    continue;
                }
                let frame = sim.snapshot();
                if json {
                    println!("{}", serde_json::to_string(&frame)?);
                } else {
                    print!("{}", renderer.render(&frame, &view));
                }
            }

            tracing::info!(
                tick = sim.tick(),
                eaten,
                events = sim.events().len(),
                "run complete"
            );
        }
    }

    Ok(())
}
