// ============================================================
// Layer 6 — Epoch Statistics
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: average NLL loss over all training batches
//   - test_loss:  average NLL loss over all held-out batches
//   - test_acc:   average top-1 accuracy over held-out batches
//
// Output file: checkpoints/metrics.csv
//
// How to read the metrics:
//   - Loss should decrease each epoch (model is learning)
//   - If test_loss increases while train_loss decreases →
//     overfitting; dropout is the knob that counters it
//   - Untrained baseline accuracy is ~0.1 for ten classes
//
// The RunningMean accumulator implements the averaging rule
// used everywhere in the trainer: a sum of per-batch values
// divided by the number of batches, finalized only after a
// full pass over the data.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

// ─── RunningMean ──────────────────────────────────────────────────────────────
/// Accumulates per-batch scalars and finalizes them into a
/// mean at the end of an epoch. Reset by creating a new one.
#[derive(Debug, Default)]
pub struct RunningMean {
    sum: f64,
    count: usize,
}

impl RunningMean {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Sum of pushed values divided by their count.
    /// NaN when nothing was pushed — an epoch average is only
    /// meaningful over a fully-seen pass.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

// ─── EpochMetrics ─────────────────────────────────────────────────────────────
/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average NLL loss over all training batches
    pub train_loss: f64,

    /// Average NLL loss on the held-out test set.
    /// Should track train_loss — divergence indicates overfitting
    pub test_loss: f64,

    /// Average top-1 accuracy on the held-out test set,
    /// in [0.0, 1.0]
    pub test_acc: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, test_loss: f64, test_acc: f64) -> Self {
        Self { epoch, train_loss, test_loss, test_acc }
    }

    /// Returns true if this epoch improved over the previous best test loss
    pub fn is_improvement(&self, best_test_loss: f64) -> bool {
        self.test_loss < best_test_loss
    }
}

// ─── MetricsLogger ────────────────────────────────────────────────────────────
/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header only if the file is new, so
    /// multiple runs can append to the same log.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,test_loss,test_acc")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch, m.train_loss, m.test_loss, m.test_acc,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, test_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.test_loss,
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_mean_is_sum_over_count() {
        let mut mean = RunningMean::new();
        mean.push(0.5);
        mean.push(1.0);
        mean.push(0.75);
        assert_eq!(mean.count(), 3);
        assert!((mean.mean() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_running_mean_empty_is_nan() {
        assert!(RunningMean::new().mean().is_nan());
    }

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 2.5, 2.3, 0.4);
        // 2.3 < 3.0 → this is an improvement
        assert!(m.is_improvement(3.0));
        // 2.3 is NOT less than 2.0 → not an improvement
        assert!(!m.is_improvement(2.0));
    }

    #[test]
    fn test_csv_rows_append() {
        let dir = std::env::temp_dir().join(format!(
            "fashion-classifier-test-metrics-{}",
            std::process::id()
        ));
        let logger = MetricsLogger::new(dir.to_string_lossy().into_owned()).unwrap();

        logger.log(&EpochMetrics::new(1, 0.9, 0.8, 0.65)).unwrap();
        logger.log(&EpochMetrics::new(2, 0.7, 0.75, 0.71)).unwrap();

        let contents = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "epoch,train_loss,test_loss,test_acc");
        assert!(lines[1].starts_with("1,0.900000"));
        assert!(lines[2].starts_with("2,0.700000"));

        fs::remove_dir_all(dir).ok();
    }
}
