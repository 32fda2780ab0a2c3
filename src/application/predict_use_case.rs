// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Single-example inference workflow:
//
//   Step 1: Rebuild the model from the latest checkpoint
//   Step 2: Load the held-out test partition
//   Step 3: Pick one example (given index, or random)
//   Step 4: Run the forward pass in evaluation mode
//
// Returns a PredictionReport; the CLI layer renders it.

use anyhow::{bail, Context, Result};
use burn::data::dataset::Dataset;
use rand::Rng;

use crate::data::dataset::FashionMnistDataset;
use crate::domain::label::ClassLabel;
use crate::domain::prediction::Prediction;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::Inferencer;

/// Everything the CLI needs to display one inference result.
#[derive(Debug, Clone)]
pub struct PredictionReport {
    /// Index of the example within the test partition
    pub index: usize,

    /// The true label from the dataset
    pub actual: ClassLabel,

    /// The model's per-class probability distribution
    pub prediction: Prediction,
}

pub struct PredictUseCase {
    inferencer: Inferencer,
}

impl PredictUseCase {
    pub fn new(checkpoint_dir: String) -> Result<Self> {
        let ckpt_manager = CheckpointManager::new(checkpoint_dir);
        let inferencer = Inferencer::from_checkpoint(&ckpt_manager)?;
        Ok(Self { inferencer })
    }

    /// Predict the class of one held-out test image.
    /// With no index given, a random test example is chosen.
    pub fn predict(&self, index: Option<usize>) -> Result<PredictionReport> {
        let test_dataset = FashionMnistDataset::test()?;

        let index = match index {
            Some(i) if i >= test_dataset.len() => {
                bail!(
                    "Index {} out of range — the test set has {} examples",
                    i,
                    test_dataset.len()
                );
            }
            Some(i) => i,
            None => rand::thread_rng().gen_range(0..test_dataset.len()),
        };

        let item = test_dataset
            .get(index)
            .context("Test example disappeared while predicting")?;
        let actual = ClassLabel::from_index(item.label as usize)
            .with_context(|| format!("Dataset contains invalid label {}", item.label))?;

        tracing::debug!("Predicting test example {} (actual: {})", index, actual);
        let prediction = self.inferencer.predict(&item)?;

        Ok(PredictionReport { index, actual, prediction })
    }
}
