// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Loads a trained checkpoint and turns a single held-out image
// into a per-class probability distribution.
//
// The inference path mirrors training exactly: the image goes
// through the same batcher (same flattening, same
// normalization), just with a batch of one. The model runs on
// the inner backend, so no gradients are tracked and dropout
// is inactive. Exponentiating the log-softmax output recovers
// the per-class probabilities for display.

use anyhow::Result;
use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::{batcher::ClassifyBatcher, dataset::ImageItem};
use crate::domain::prediction::Prediction;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{Classifier, ClassifierConfig};

type InferBackend = burn::backend::Wgpu;

pub struct Inferencer {
    model: Classifier<InferBackend>,
    device: burn::backend::wgpu::WgpuDevice,
}

impl Inferencer {
    /// Rebuild the trained model from the latest checkpoint.
    /// The saved config provides the exact architecture; the
    /// dropout probability is irrelevant at inference time
    /// (inactive on the inner backend) so it is set to 0.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        let cfg = ckpt_manager.load_config()?;

        let model_cfg = ClassifierConfig::new()
            .with_hidden1(cfg.hidden1)
            .with_hidden2(cfg.hidden2)
            .with_hidden3(cfg.hidden3)
            .with_dropout(0.0);
        let model: Classifier<InferBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;

        tracing::info!("Model loaded from checkpoint");
        Ok(Self { model, device })
    }

    /// Run one image through the model and return the
    /// exponentiated class probabilities.
    pub fn predict(&self, item: &ImageItem) -> Result<Prediction> {
        let batcher = ClassifyBatcher::<InferBackend>::new(self.device.clone());
        let batch = batcher.batch(vec![item.clone()]);

        let log_probs = self.model.forward(batch.images); // [1, num_classes]
        let probabilities: Vec<f32> = log_probs
            .exp()
            .squeeze::<1>(0)
            .into_data()
            .to_vec()
            .map_err(|e| anyhow::anyhow!("Cannot read probabilities from tensor: {e:?}"))?;

        Ok(Prediction::new(probabilities))
    }
}
