use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::referee::GameRecord;

const CONFIDENCE_LEVEL: f64 = 0.95;

/// Accumulates per-game records into run-level statistics.
pub struct SummaryCollector {
    run_id: String,
    asks: Vec<f64>,
    tightened_per_event: Vec<f64>,
    us_per_event: Vec<f64>,
    guaranteed_asks: usize,
    total_asks: usize,
    successful_asks: usize,
    calls: usize,
    failed_calls: usize,
    forced_calls: usize,
    truncated: usize,
}

impl SummaryCollector {
    pub fn new(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            asks: Vec::new(),
            tightened_per_event: Vec::new(),
            us_per_event: Vec::new(),
            guaranteed_asks: 0,
            total_asks: 0,
            successful_asks: 0,
            calls: 0,
            failed_calls: 0,
            forced_calls: 0,
            truncated: 0,
        }
    }

    pub fn record(&mut self, record: &GameRecord) {
        let events = record.events().max(1) as f64;
        self.asks.push(record.asks as f64);
        self.tightened_per_event
            .push(record.cells_tightened as f64 / events);
        self.us_per_event
            .push(record.engine_time.as_secs_f64() * 1_000_000.0 / events);
        self.guaranteed_asks += record.guaranteed_asks;
        self.total_asks += record.asks;
        self.successful_asks += record.successful_asks;
        self.calls += record.calls;
        self.failed_calls += record.failed_calls;
        self.forced_calls += record.forced_calls;
        if record.truncated {
            self.truncated += 1;
        }
    }

    pub fn finalize(self) -> SummaryReport {
        SummaryReport {
            run_id: self.run_id,
            games: self.asks.len(),
            truncated: self.truncated,
            avg_asks: mean(&self.asks),
            asks_ci95: confidence_interval(&self.asks),
            ask_success_rate: ratio(self.successful_asks, self.total_asks),
            guaranteed_share: ratio(self.guaranteed_asks, self.total_asks),
            calls: self.calls,
            failed_calls: self.failed_calls,
            forced_calls: self.forced_calls,
            avg_tightened_per_event: mean(&self.tightened_per_event),
            avg_us_per_event: mean(&self.us_per_event),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub run_id: String,
    pub games: usize,
    pub truncated: usize,
    pub avg_asks: f64,
    pub asks_ci95: (f64, f64),
    pub ask_success_rate: f64,
    pub guaranteed_share: f64,
    pub calls: usize,
    pub failed_calls: usize,
    pub forced_calls: usize,
    pub avg_tightened_per_event: f64,
    pub avg_us_per_event: f64,
}

impl SummaryReport {
    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), SummaryError> {
        let mut rows = String::new();
        rows.push_str(&format!("# Soak Summary: {}\n\n", self.run_id));
        rows.push_str(&format!(
            "{} games played, {} stopped at the turn limit\n\n",
            self.games, self.truncated
        ));
        rows.push_str("| Metric | Value |\n");
        rows.push_str("|--------|-------|\n");
        rows.push_str(&format!(
            "| Asks per game | {avg:.1} [{low:.1}, {high:.1}] |\n",
            avg = self.avg_asks,
            low = self.asks_ci95.0,
            high = self.asks_ci95.1,
        ));
        rows.push_str(&format!(
            "| Ask success | {:.1}% |\n",
            self.ask_success_rate * 100.0
        ));
        rows.push_str(&format!(
            "| Guaranteed asks | {:.1}% |\n",
            self.guaranteed_share * 100.0
        ));
        rows.push_str(&format!(
            "| Calls (failed / forced) | {} ({} / {}) |\n",
            self.calls, self.failed_calls, self.forced_calls
        ));
        rows.push_str(&format!(
            "| Cells tightened per event | {:.2} |\n",
            self.avg_tightened_per_event
        ));
        rows.push_str(&format!(
            "| Engine µs per event | {:.1} |\n",
            self.avg_us_per_event
        ));

        fs::write(path.as_ref(), rows).map_err(|e| SummaryError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn mean(points: &[f64]) -> f64 {
    if points.is_empty() {
        0.0
    } else {
        points.iter().sum::<f64>() / points.len() as f64
    }
}

fn confidence_interval(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean = mean(points);
    if points.len() == 1 {
        return (mean, mean);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    let std_error = (variance / points.len() as f64).sqrt();
    let z = Normal::new(0.0, 1.0)
        .map(|normal| normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0))
        .unwrap_or(1.96);
    let margin = z * std_error;
    (mean - margin, mean + margin)
}
