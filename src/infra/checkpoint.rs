// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What gets saved per checkpoint:
//   1. Model weights (.mpk.gz file) — all learned parameters
//   2. latest_epoch.json            — which epoch was last saved
//   3. train_config.json            — model architecture config
//
// Why save the config separately?
//   When loading for inference we need the exact architecture
//   (hidden sizes) to rebuild the model before loading weights
//   into it. CompactRecorder is type-safe: loading fails if
//   the architecture doesn't match.
//
// File naming convention:
//   checkpoints/
//     model_epoch_1.mpk.gz   ← weights after epoch 1
//     ...
//     latest_epoch.json      ← number of the latest epoch
//     train_config.json      ← training hyperparameters
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use std::{fs, path::PathBuf};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::Classifier;

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating the directory
    /// (and parents) if it doesn't already exist.
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Save model weights for a given epoch and update the
    /// latest-epoch pointer. The recorder adds the .mpk.gz
    /// extension itself.
    pub fn save_model<B: AutodiffBackend>(
        &self,
        model: &Classifier<B>,
        epoch: usize,
    ) -> Result<()> {
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        let latest_path = self.dir.join("latest_epoch.json");
        fs::write(&latest_path, serde_json::to_string(&epoch)?)
            .with_context(|| "Failed to write latest_epoch.json")?;

        Ok(())
    }

    /// Load model weights from the latest saved checkpoint.
    /// The model argument must have the architecture the
    /// checkpoint was saved with.
    pub fn load_model<B: Backend>(
        &self,
        model: Classifier<B>,
        device: &B::Device,
    ) -> Result<Classifier<B>> {
        let epoch = self.latest_epoch()?;
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        tracing::info!("Loading checkpoint from epoch {}", epoch);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display()
                )
            })?;

        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON. Must run before
    /// training starts so `predict` can reconstruct the model.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");

        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Make sure you have run 'train' before 'predict'.",
                path.display()
            )
        })?;

        Ok(serde_json::from_str(&json)?)
    }

    fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join("latest_epoch.json");

        let s = fs::read_to_string(&path)
            .with_context(|| "Cannot find 'latest_epoch.json'. Have you run 'train' first?")?;

        Ok(serde_json::from_str::<usize>(&s)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn temp_checkpoint_dir(tag: &str) -> String {
        let dir = std::env::temp_dir().join(format!(
            "fashion-classifier-test-{tag}-{}",
            std::process::id()
        ));
        dir.to_string_lossy().into_owned()
    }

    #[test]
    fn test_config_round_trip() {
        let dir = temp_checkpoint_dir("config");
        let manager = CheckpointManager::new(dir.clone());

        let mut cfg = TrainConfig::default();
        cfg.epochs = 5;
        cfg.dropout = 0.35;

        manager.save_config(&cfg).unwrap();
        let loaded = manager.load_config().unwrap();

        assert_eq!(loaded.epochs, 5);
        assert!((loaded.dropout - 0.35).abs() < 1e-12);
        assert_eq!(loaded.hidden1, cfg.hidden1);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_config_gives_guidance() {
        let dir = temp_checkpoint_dir("missing");
        let manager = CheckpointManager::new(dir.clone());

        let err = manager.load_config().unwrap_err();
        assert!(err.to_string().contains("train"));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_latest_epoch_requires_training() {
        let dir = temp_checkpoint_dir("epoch");
        let manager = CheckpointManager::new(dir.clone());

        assert!(manager.latest_epoch().is_err());

        fs::write(
            PathBuf::from(&dir).join("latest_epoch.json"),
            serde_json::to_string(&7usize).unwrap(),
        )
        .unwrap();
        assert_eq!(manager.latest_epoch().unwrap(), 7);

        fs::remove_dir_all(dir).ok();
    }
}
