//! Moola CLI
//!
//! Play a session in the terminal, run the capped-Kelly baseline in bulk, or
//! analyze a saved wager history.

use clap::{Parser, Subcommand};
use moola::{
    config::{generate_sample_config, ConfigLoader, GameConfig},
    errors::{EngineError, EngineResult},
    format::{format_currency, format_time_remaining, outcome_message},
    games::{
        analyze, capped_stake, quick_chips, EntropySource, FlipResult, Money, OsEntropy,
        SeededEntropy, Side, WagerRecord,
    },
    session::GameSession,
    simulation::{simulate_batch, BatchConfig},
};
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Biased coin-flip bankroll game
#[derive(Parser)]
#[command(name = "moola")]
#[command(about = "Biased coin-flip bankroll game and strategy coach")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive session on stdin
    Play {
        /// Seed the coin for a reproducible session
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Run the capped-Kelly reference player many times
    Simulate {
        /// Number of independent runs
        #[arg(short, long, default_value = "1000")]
        runs: usize,

        /// Flip budget per run
        #[arg(short, long, default_value = "100")]
        max_steps: u32,

        /// Worker threads
        #[arg(short, long, default_value = "4")]
        threads: usize,

        /// Seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Print betting statistics for a JSON wager history
    Analyze {
        /// Path to a JSON array of wager records
        history: PathBuf,
    },

    /// Write a sample configuration file
    InitConfig {
        #[arg(default_value = "moola.toml")]
        path: PathBuf,
    },
}

fn main() -> EngineResult<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "moola=debug" } else { "moola=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .init();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_path(path);
    }

    match cli.command {
        Commands::Play { seed } => {
            let config = loader.load()?;
            match seed {
                Some(seed) => run_play(config, SeededEntropy::new(seed)),
                None => run_play(config, OsEntropy),
            }
        }
        Commands::Simulate { runs, max_steps, threads, seed } => {
            let config = loader.load()?;
            run_simulation(&config, BatchConfig { runs, max_steps, threads, seed })
        }
        Commands::Analyze { history } => run_analysis(&history),
        Commands::InitConfig { path } => {
            generate_sample_config(&path.to_string_lossy())?;
            println!("Wrote sample configuration to {}", path.display());
            Ok(())
        }
    }
}

fn run_play<E: EntropySource>(config: GameConfig, source: E) -> EngineResult<()> {
    let bias = config.side_a_bias;
    let mut session = GameSession::new(config, source)?;

    println!(
        "Start with {}, reach {} before the clock runs out ({}).",
        format_currency(session.balance()),
        format_currency(session.config().target_balance),
        format_time_remaining(session.time_remaining().num_milliseconds())
    );
    println!(
        "The coin lands heads {:.0}% of the time. Enter `<amount> <heads|tails>`, or `quit`.",
        bias * 100.0
    );

    let stdin = io::stdin();
    prompt(&session)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            prompt(&session)?;
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("q") {
            break;
        }

        if let Some((amount, side)) = parse_wager(line) {
            match session.place_wager(amount, side) {
                Ok(FlipResult::Resolved(outcome)) => {
                    let flip_number = session.history().len() as u64;
                    println!(
                        "#{} landed {}: {} Balance {}",
                        flip_number,
                        outcome.side,
                        outcome_message(outcome.won, flip_number),
                        format_currency(outcome.balance_after)
                    );
                }
                Ok(FlipResult::Invalid { balance }) => {
                    println!(
                        "Wager must be between {} and {}.",
                        format_currency(session.config().min_wager),
                        format_currency(balance)
                    );
                }
                Err(EngineError::SessionClosed { .. }) => break,
                Err(EngineError::RandomnessUnavailable(reason)) => {
                    tracing::warn!("Flip failed: {}", reason);
                    println!("The coin could not be flipped, try again.");
                }
                Err(e) => return Err(e),
            }
        } else {
            println!("Usage: <amount> <heads|tails>, amount in dollars and cents");
        }

        if !session.status().is_active() {
            break;
        }
        prompt(&session)?;
    }

    session.check_timeout_at(chrono::Utc::now());
    println!("{}", serde_json::to_string_pretty(&session.summary())?);
    Ok(())
}

fn prompt<E: EntropySource>(session: &GameSession<E>) -> EngineResult<()> {
    let balance = session.balance();
    let chips: Vec<String> = quick_chips(session.config(), balance)
        .iter()
        .map(|chip| format_currency(chip.amount))
        .collect();

    println!(
        "[{}] {} | kelly {} | chips {}",
        format_time_remaining(session.time_remaining().num_milliseconds()),
        format_currency(balance),
        format_currency(capped_stake(balance, session.config().side_a_bias)),
        chips.join(" ")
    );
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}

/// Parse `<amount> <side>`; amounts are whole cents
fn parse_wager(line: &str) -> Option<(Money, Side)> {
    let mut parts = line.split_whitespace();
    let amount: Decimal = parts.next()?.trim_start_matches('$').parse().ok()?;
    if amount.round_dp(2) != amount {
        return None;
    }
    let side: Side = parts.next()?.parse().ok()?;
    Some((amount, side))
}

fn run_simulation(config: &GameConfig, batch: BatchConfig) -> EngineResult<()> {
    let report = simulate_batch(config, &batch)?;

    println!("Capped-Kelly baseline over {} runs", report.runs);
    println!("   Reached target: {} ({:.1}%)", report.targets_reached, report.success_rate);
    println!("   Mean final balance: {}", format_currency(report.mean_final_balance));
    println!("   Mean flips: {:.1}", report.mean_steps);
    println!(
        "   Range: {} .. {}",
        format_currency(report.worst_final_balance),
        format_currency(report.best_final_balance)
    );
    println!("   Took {:?}", report.elapsed);
    Ok(())
}

fn run_analysis(path: &Path) -> EngineResult<()> {
    let content = std::fs::read_to_string(path)?;
    let history: Vec<WagerRecord> = serde_json::from_str(&content)?;
    tracing::debug!("Loaded {} wager records from {}", history.len(), path.display());

    let stats = analyze(&history);
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
