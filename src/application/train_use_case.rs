// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load train/test dataset partitions  (Layer 4 - data)
//   Step 2: Save config for inference           (Layer 6 - infra)
//   Step 3: Open the metrics log                (Layer 6 - infra)
//   Step 4: Run the train + validate loop       (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::dataset::FashionMnistDataset;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved to disk and reloaded for
// inference (the model architecture must match the weights).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub checkpoint_dir: String,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub hidden1:        usize,
    pub hidden2:        usize,
    pub hidden3:        usize,
    pub dropout:        f64,
    pub seed:           u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            checkpoint_dir: "checkpoints".to_string(),
            batch_size:     64,
            epochs:         30,
            lr:             3e-3,
            hidden1:        256,
            hidden2:        128,
            hidden3:        64,
            dropout:        0.2,
            seed:           42,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load dataset partitions ──────────────────────────────────
        // Training and held-out test sets come pre-split; the
        // test set is only ever used for validation.
        tracing::info!("Loading Fashion-MNIST");
        let train_dataset = FashionMnistDataset::train()?;
        let test_dataset = FashionMnistDataset::test()?;
        tracing::info!(
            "Dataset ready: {} train, {} test",
            train_dataset.len(),
            test_dataset.len(),
        );

        // ── Step 2: Save config for inference ────────────────────────────────
        // `predict` needs the architecture to rebuild the model
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg)?;

        // ── Step 3: Open the metrics log ──────────────────────────────────────
        let metrics_logger = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 4: Run training loop (Layer 5) ───────────────────────────────
        let history = run_training(cfg, train_dataset, test_dataset, ckpt_manager, metrics_logger)?;

        if let Some(last) = history.last() {
            tracing::info!(
                "Final epoch {}: test_loss={:.3}, test_acc={:.3}",
                last.epoch,
                last.test_loss,
                last.test_acc,
            );
        }

        Ok(())
    }
}
