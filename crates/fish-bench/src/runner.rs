use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fish_core::Rules;
use fish_core::model::TeamId;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchConfig, ResolvedOutputs, ValidationError};
use crate::referee::{GameRecord, Referee, RefereeError};
use crate::summary::{SummaryCollector, SummaryError};

/// Plays the configured number of games and writes their rows and summary.
pub struct SoakRunner {
    config: BenchConfig,
    outputs: ResolvedOutputs,
    rules: Arc<Rules>,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub truncated_games: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

/// One JSONL row per game.
#[derive(Debug, Serialize)]
pub struct GameLogRow {
    pub run_id: String,
    pub game_id: String,
    pub game_index: usize,
    pub deal_seed: u64,
    pub starting_seat: u8,
    pub asks: usize,
    pub successful_asks: usize,
    pub guaranteed_asks: usize,
    pub calls: usize,
    pub failed_calls: usize,
    pub forced_calls: usize,
    pub team_scores: BTreeMap<TeamId, u32>,
    pub cells_tightened: usize,
    pub truncated: bool,
    pub us_per_event: f64,
}

impl GameLogRow {
    fn new(run_id: &str, game_index: usize, deal_seed: u64, record: &GameRecord) -> Self {
        let events = record.events().max(1) as f64;
        Self {
            run_id: run_id.to_string(),
            game_id: format!("G{game_index:05}"),
            game_index,
            deal_seed,
            starting_seat: record.starting_seat,
            asks: record.asks,
            successful_asks: record.successful_asks,
            guaranteed_asks: record.guaranteed_asks,
            calls: record.calls,
            failed_calls: record.failed_calls,
            forced_calls: record.forced_calls,
            team_scores: record.team_scores.clone(),
            cells_tightened: record.cells_tightened,
            truncated: record.truncated,
            us_per_event: record.engine_time.as_secs_f64() * 1_000_000.0 / events,
        }
    }
}

impl SoakRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let rules = Arc::new(config.build_rules()?);
        Ok(Self {
            config,
            outputs,
            rules,
        })
    }

    /// Execute every game, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.deals.seed.unwrap_or(0));
        let mut rows_written = 0usize;
        let mut summary = SummaryCollector::new(&self.config.run_id);

        for game_index in 0..self.config.deals.games {
            let deal_seed = rng.next_u64();
            let referee = Referee::new(
                self.rules.clone(),
                deal_seed,
                self.config.play.forced_call_guess,
            )
            .map_err(|source| RunnerError::Game { game_index, source })?;
            let record = referee
                .play(self.config.deals.max_turns)
                .map_err(|source| RunnerError::Game { game_index, source })?;

            if tracing::enabled!(target: "fish_bench::game", Level::INFO) {
                event!(
                    target: "fish_bench::game",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    game_index = game_index as u32,
                    deal_seed,
                    asks = record.asks,
                    calls = record.calls,
                    forced_calls = record.forced_calls,
                    cells_tightened = record.cells_tightened,
                    truncated = record.truncated,
                );
            }

            let row = GameLogRow::new(&self.config.run_id, game_index, deal_seed, &record);
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;
            summary.record(&record);
        }

        writer.flush()?;

        let report = summary.finalize();
        report.write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            games_played: report.games,
            truncated_games: report.truncated,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),
    #[error("game {game_index} failed: {source}")]
    Game {
        game_index: usize,
        #[source]
        source: RefereeError,
    },
    #[error("summary error: {0}")]
    Summary(#[from] SummaryError),
}
