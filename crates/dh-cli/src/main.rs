//! Doghouse console front-end
//!
//! Usage:
//!   doghouse play              - Interactive session (Enter spins, +/- bet, q quits)
//!   doghouse simulate          - Batch simulation with RTP summary
//!   doghouse config            - Print the effective game configuration

mod play;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use dh_slot::{DoghouseEngine, EngineSnapshot, GameConfig, SimConfig, simulate};

#[derive(Parser)]
#[command(name = "doghouse", about = "Doghouse 5×3 slot machine")]
struct Cli {
    /// Game config file (JSON, or YAML by .yaml/.yml extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively in the terminal
    Play {
        /// Starting balance (defaults to the config value)
        #[arg(long)]
        balance: Option<u64>,
        /// Bet per line
        #[arg(long)]
        bet: Option<u32>,
        /// Fixed seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run many seeded sessions and report RTP and hit rate
    Simulate {
        /// Independent sessions
        #[arg(long, default_value_t = 100)]
        sessions: u32,
        /// Spin limit per session
        #[arg(long, default_value_t = 1_000)]
        spins: u64,
        /// Base seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Starting balance per session
        #[arg(long)]
        balance: Option<u64>,
        /// Bet per line
        #[arg(long)]
        bet: Option<u32>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config {
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Play { balance, bet, seed } => run_play(config, balance, bet, seed),
        Commands::Simulate {
            sessions,
            spins,
            seed,
            balance,
            bet,
            json,
        } => {
            let sim = SimConfig {
                sessions,
                spins_per_session: spins,
                seed,
                starting_balance: balance,
                bet_per_line: bet,
            };
            run_simulate(&config, &sim, json)
        }
        Commands::Config { format } => {
            let text = match format {
                Format::Json => config.to_json()?,
                Format::Yaml => config.to_yaml()?,
            };
            println!("{text}");
            Ok(())
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

fn run_play(
    config: GameConfig,
    balance: Option<u64>,
    bet: Option<u32>,
    seed: Option<u64>,
) -> Result<()> {
    let mut engine = match seed {
        Some(seed) => DoghouseEngine::seeded(config, seed),
        None => DoghouseEngine::from_os_rng(config),
    }
    .context("Failed to start engine")?;

    let snapshot = EngineSnapshot {
        balance: balance.unwrap_or(engine.balance()),
        bet_per_line: bet.unwrap_or(engine.bet_per_line()),
        bonus: engine.bonus_state().clone(),
    };
    engine.restore(&snapshot).context("Invalid starting state")?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    play::cli_loop(&mut engine, stdin.lock(), stdout.lock()).context("Console session failed")
}

fn run_simulate(config: &GameConfig, sim: &SimConfig, json: bool) -> Result<()> {
    let report = simulate(config, sim).context("Simulation failed")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let stats = &report.stats;
    println!("Sessions:           {}", report.sessions);
    println!("Busted sessions:    {}", report.busted_sessions);
    println!("Spins:              {} ({} free)", stats.total_spins, stats.free_spins);
    println!("Coins bet:          {}", stats.total_bet);
    println!("Coins won:          {}", stats.total_win);
    println!("RTP:                {:.2}%", report.rtp);
    println!("Hit rate:           {:.2}%", report.hit_rate);
    println!("Bonus triggers:     {} (+{} retriggers)", stats.features_triggered, stats.retriggers);
    println!("Biggest spin win:   {}", stats.max_win);
    println!("Avg final balance:  {:.1}", report.average_final_balance);
    Ok(())
}
