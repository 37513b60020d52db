use std::path::PathBuf;

use clap::Parser;

use fish_bench::config::{BenchConfig, ResolvedOutputs};
use fish_bench::logging::init_logging;
use fish_bench::runner::SoakRunner;

/// Soak harness for the belief engine.
#[derive(Debug, Parser)]
#[command(
    name = "fish-bench",
    author,
    version,
    about = "Deterministic belief-engine soak harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/soak.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for deal generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the per-game ask limit.
    #[arg(long, value_name = "TURNS")]
    max_turns: Option<usize>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.deals.games = games;
    }

    if let Some(seed) = cli.seed {
        config.deals.seed = Some(seed);
    }

    if let Some(max_turns) = cli.max_turns {
        config.deals.max_turns = max_turns;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.deals.games;
    let max_turns = config.deals.max_turns;

    println!("Loaded configuration '{run_id}' ({games} games, at most {max_turns} asks each)");

    let logging_guard = init_logging(&run_id, &config.logging, &outputs)?;
    let runner = SoakRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: no games played.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Soak complete for '{run_id}': {} games ({} truncated) → {} rows at {}",
        summary.games_played,
        summary.truncated_games,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
