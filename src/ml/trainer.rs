// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
// Key Burn backend insight:
//   - Training uses TrainBackend (Autodiff<Wgpu>) for gradients
//   - model.valid() returns the model on ValidBackend (Wgpu),
//     which tracks no gradients and disables dropout — this is
//     the evaluation-mode switch
//   - The validation batcher must also use ValidBackend
//   - argmax(1) returns [batch, 1] so we flatten to [batch]
//     before comparing with the targets
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::ClassifyBatcher, dataset::FashionMnistDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger, RunningMean};
use crate::ml::model::{nll_loss, Classifier, ClassifierConfig};

type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;
type ValidBackend = burn::backend::Wgpu;

pub fn run_training(
    cfg: &TrainConfig,
    train_dataset: FashionMnistDataset,
    test_dataset: FashionMnistDataset,
    ckpt_manager: CheckpointManager,
    metrics_logger: MetricsLogger,
) -> Result<Vec<EpochMetrics>> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop(cfg, train_dataset, test_dataset, ckpt_manager, metrics_logger, device)
}

fn train_loop(
    cfg: &TrainConfig,
    train_dataset: FashionMnistDataset,
    test_dataset: FashionMnistDataset,
    ckpt_manager: CheckpointManager,
    metrics_logger: MetricsLogger,
    device: burn::backend::wgpu::WgpuDevice,
) -> Result<Vec<EpochMetrics>> {
    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = ClassifierConfig::new()
        .with_hidden1(cfg.hidden1)
        .with_hidden2(cfg.hidden2)
        .with_hidden3(cfg.hidden3)
        .with_dropout(cfg.dropout);
    let mut model: Classifier<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: 784 → {} → {} → {} → 10, dropout={}",
        cfg.hidden1, cfg.hidden2, cfg.hidden3, cfg.dropout,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    // Reshuffles the batch order every epoch from the given seed.
    let train_batcher = ClassifyBatcher::<TrainBackend>::new(device.clone());
    let train_loader = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = ClassifyBatcher::<ValidBackend>::new(device.clone());
    let val_loader = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(test_dataset);

    // ── Untrained baseline ────────────────────────────────────────────────────
    // Accuracy on one held-out batch before any update — should
    // sit near chance (~0.1 for ten classes).
    if let Some(batch) = val_loader.iter().next() {
        let baseline = model.valid();
        let acc = batch_accuracy(baseline.forward(batch.images), &batch.targets);
        tracing::info!("Untrained baseline accuracy on one batch: {:.3}", acc);
    }

    let mut history = Vec::with_capacity(cfg.epochs);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss = RunningMean::new();

        for batch in train_loader.iter() {
            let (loss, _log_probs) = model.forward_loss(batch.images, batch.targets);
            train_loss.push(loss.clone().into_scalar().elem::<f64>());

            // Backward pass + Adam update. Each step derives fresh
            // gradients from its own loss — nothing accumulates
            // across batches.
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → Classifier<ValidBackend>
        // dropout disabled for deterministic evaluation; the
        // autodiff model keeps training untouched next epoch.
        let model_valid = model.valid();

        let mut test_loss = RunningMean::new();
        let mut test_acc = RunningMean::new();

        for batch in val_loader.iter() {
            let log_probs = model_valid.forward(batch.images);

            let batch_loss: f64 = nll_loss(log_probs.clone(), batch.targets.clone())
                .into_scalar()
                .elem::<f64>();
            test_loss.push(batch_loss);
            test_acc.push(batch_accuracy(log_probs, &batch.targets));
        }

        let metrics = EpochMetrics::new(
            epoch,
            train_loss.mean(),
            test_loss.mean(),
            test_acc.mean(),
        );

        println!(
            "Epoch {:>2}/{} | train_loss={:.3} | test_loss={:.3} | test_acc={:.3}",
            epoch, cfg.epochs, metrics.train_loss, metrics.test_loss, metrics.test_acc,
        );

        metrics_logger.log(&metrics)?;
        ckpt_manager.save_model(&model, epoch)?;
        tracing::debug!("Checkpoint saved for epoch {}", epoch);

        history.push(metrics);
    }

    tracing::info!("Training complete!");
    Ok(history)
}

/// Fraction of examples in one batch whose top-1 prediction
/// matches the true label.
///
/// argmax(1) returns shape [batch, 1] — flatten to [batch]
/// before the elementwise comparison with the targets.
pub fn batch_accuracy<B: Backend>(
    log_probs: Tensor<B, 2>,
    targets: &Tensor<B, 1, Int>,
) -> f64 {
    let batch_size = targets.dims()[0];
    if batch_size == 0 {
        return 0.0;
    }

    let predicted = log_probs.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predicted
        .equal(targets.clone())
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();

    correct as f64 / batch_size as f64
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    type TestBackend = NdArray;

    /// Log-probabilities with a known argmax per row.
    fn log_probs_predicting(classes: &[usize]) -> Tensor<TestBackend, 2> {
        let device = NdArrayDevice::Cpu;
        let rows: Vec<f32> = classes
            .iter()
            .flat_map(|&c| {
                (0..3).map(move |i| if i == c { 0.8f32.ln() } else { 0.1f32.ln() })
            })
            .collect();
        Tensor::<TestBackend, 1>::from_floats(rows.as_slice(), &device)
            .reshape([classes.len(), 3])
    }

    #[test]
    fn test_batch_accuracy_hand_computed() {
        let device = NdArrayDevice::Cpu;
        // Predictions [1, 0, 2, 2] against labels [1, 2, 2, 0]:
        // two of four match → 0.5
        let log_probs = log_probs_predicting(&[1, 0, 2, 2]);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([1, 2, 2, 0], &device);

        let acc = batch_accuracy(log_probs, &targets);
        assert!((acc - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_batch_accuracy_all_correct() {
        let device = NdArrayDevice::Cpu;
        let log_probs = log_probs_predicting(&[0, 1, 2]);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 2], &device);

        assert_eq!(batch_accuracy(log_probs, &targets), 1.0);
    }

    #[test]
    fn test_epoch_accuracy_is_mean_of_batch_means() {
        let device = NdArrayDevice::Cpu;
        // Batch one: 1/2 correct. Batch two: 2/2 correct.
        // Epoch accuracy = (0.5 + 1.0) / 2 = 0.75.
        let mut acc = RunningMean::new();

        let batch1 = log_probs_predicting(&[0, 1]);
        let targets1 = Tensor::<TestBackend, 1, Int>::from_ints([0, 2], &device);
        acc.push(batch_accuracy(batch1, &targets1));

        let batch2 = log_probs_predicting(&[2, 1]);
        let targets2 = Tensor::<TestBackend, 1, Int>::from_ints([2, 1], &device);
        acc.push(batch_accuracy(batch2, &targets2));

        assert!((acc.mean() - 0.75).abs() < 1e-9);
    }
}
