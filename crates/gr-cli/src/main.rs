//! GemReel: slot machine in the terminal
//!
//! Usage:
//!   gemreel play                 - Play an interactive session
//!   gemreel simulate --spins N   - Run a batch simulation and print RTP
//!   gemreel config               - Print the selected config as JSON

mod commands;
mod play;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gr_slot::{GameConfig, SimOptions, SlotMachine, TimingConfig, TimingProfile};

#[derive(Parser)]
#[command(name = "gemreel", version, about = "GemReel slot machine")]
struct Cli {
    /// Game config file (.json, .yaml or .yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Built-in variant, used when no config file is given
    #[arg(long, value_enum, default_value_t = Variant::Rich, global = true)]
    variant: Variant,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Variant {
    Rich,
    Classic,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive session
    Play {
        /// Animation timing: normal, turbo or studio
        #[arg(short, long)]
        timing: Option<String>,

        /// Seed for reproducible sessions
        #[arg(short, long)]
        seed: Option<u64>,

        /// Show three-letter symbol codes instead of emoji
        #[arg(long)]
        ascii: bool,
    },
    /// Run a batch simulation
    Simulate {
        /// Number of spins
        #[arg(short = 'n', long, default_value_t = 100_000)]
        spins: u64,

        /// Base seed
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Parallel workers (defaults to CPU count)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the selected config as JSON
    Config,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    log::info!("Starting GemReel with '{}'", config.name);

    match cli.command {
        Commands::Play { timing, seed, ascii } => run_play(config, timing, seed, ascii),
        Commands::Simulate {
            spins,
            seed,
            workers,
            json,
        } => run_simulate(&config, spins, seed, workers, json),
        Commands::Config => {
            println!("{}", config.to_json_pretty()?);
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(match cli.variant {
            Variant::Rich => GameConfig::rich(),
            Variant::Classic => GameConfig::classic(),
        }),
    }
}

fn run_play(
    config: GameConfig,
    timing: Option<String>,
    seed: Option<u64>,
    ascii: bool,
) -> Result<()> {
    let mut machine = match seed {
        Some(seed) => SlotMachine::seeded(config, seed),
        None => SlotMachine::new(config),
    }
    .context("Invalid game config")?;

    if let Some(name) = timing {
        let profile = TimingProfile::from_name(&name)
            .with_context(|| format!("Unknown timing profile '{}'", name))?;
        machine.set_timing(TimingConfig::from_profile(profile));
    }

    play::run(&mut machine, render::Renderer::new(ascii))
}

fn run_simulate(
    config: &GameConfig,
    spins: u64,
    seed: u64,
    workers: Option<usize>,
    json: bool,
) -> Result<()> {
    let options = SimOptions {
        spins,
        seed,
        workers: workers.unwrap_or_else(num_cpus::get),
    };
    let report = gr_slot::simulate(config, &options).context("Simulation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let stats = &report.stats;
    println!("🎰 {}: {} spins\n", config.name, render::format_credits(stats.total_spins));
    println!("  RTP              {:>10.2}%", report.rtp);
    println!("  Hit rate         {:>10.2}%", report.hit_rate);
    println!("  Staked           {:>11}", render::format_credits(stats.total_staked));
    println!("  Won              {:>11}", render::format_credits(stats.total_won));
    println!("  Max win          {:>11}", render::format_credits(stats.max_win));
    println!("  Free spin awards {:>11}", stats.free_spin_triggers);
    println!("  Free spins       {:>11}", stats.free_spins_played);
    println!("  Bonus rounds     {:>11}", stats.bonus_triggers);
    println!(
        "  Tiers            win {} / big {} / mega {} / epic {}",
        report.tiers.win, report.tiers.big, report.tiers.mega, report.tiers.epic
    );
    Ok(())
}
