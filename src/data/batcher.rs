// ============================================================
// Layer 4 — Image Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<ImageItem>
// into model-ready tensors.
//
// What is a Batcher?
//   A Batcher takes a list of individual samples and stacks
//   them into a single batch tensor. The DataLoader calls
//   .batch(items) with each (shuffled) mini-batch of items.
//
// How batching works here:
//   Input:  Vec of N ImageItems, each a 28x28 pixel grid
//   Output: ClassifyBatch with
//     images  — shape [N, 784], pixels flattened and
//               normalized from 0..=255 to -1.0..=1.0
//     targets — shape [N], one integer label per image
//
// The same normalization must be applied at training and
// inference time, which is why it lives here and nowhere else.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::{ImageItem, PIXELS};

// ─── ClassifyBatch ───────────────────────────────────────────────────────────
/// A batch of labelled images ready for the model forward pass.
///
/// B is the Burn Backend (e.g. Wgpu, NdArray) —
/// generic so the same batcher works on any device.
#[derive(Debug, Clone)]
pub struct ClassifyBatch<B: Backend> {
    /// Normalized flattened images — shape: [batch_size, 784]
    pub images: Tensor<B, 2>,

    /// Ground truth class labels — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── ClassifyBatcher ─────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the
/// correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct ClassifyBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ClassifyBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<ImageItem, ClassifyBatch<B>> for ClassifyBatcher<B> {
    fn batch(&self, items: Vec<ImageItem>) -> ClassifyBatch<B> {
        // One [1, 784] row per image: flatten the pixel grid,
        // scale 0..=255 down to 0..=1, then center to -1..=1
        // (mean 0.5, std 0.5 — the same transform the model
        // saw during training).
        let images = items
            .iter()
            .map(|item| {
                let pixels: Vec<f32> = item.image.iter().flatten().copied().collect();
                Tensor::<B, 1>::from_floats(pixels.as_slice(), &self.device)
                    .reshape([1, PIXELS])
            })
            .map(|tensor| ((tensor / 255.0) - 0.5) / 0.5)
            .collect();

        let targets_flat: Vec<i32> = items.iter().map(|item| item.label as i32).collect();

        ClassifyBatch {
            images: Tensor::cat(images, 0),
            targets: Tensor::<B, 1, Int>::from_ints(targets_flat.as_slice(), &self.device),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{HEIGHT, WIDTH};
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    fn item_filled_with(value: f32, label: u8) -> ImageItem {
        ImageItem {
            image: [[value; WIDTH]; HEIGHT],
            label,
        }
    }

    #[test]
    fn test_batch_shapes() {
        let batcher = ClassifyBatcher::<NdArray>::new(NdArrayDevice::Cpu);
        let batch = batcher.batch(vec![
            item_filled_with(0.0, 3),
            item_filled_with(255.0, 7),
        ]);

        assert_eq!(batch.images.dims(), [2, PIXELS]);
        assert_eq!(batch.targets.dims(), [2]);
    }

    #[test]
    fn test_normalization_range() {
        let batcher = ClassifyBatcher::<NdArray>::new(NdArrayDevice::Cpu);
        let batch = batcher.batch(vec![
            item_filled_with(0.0, 0),
            item_filled_with(255.0, 1),
        ]);

        let values: Vec<f32> = batch.images.into_data().to_vec().unwrap();
        // Black pixels map to -1.0, white pixels to 1.0
        assert!(values[..PIXELS].iter().all(|&v| (v + 1.0).abs() < 1e-6));
        assert!(values[PIXELS..].iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_targets_preserve_labels() {
        let batcher = ClassifyBatcher::<NdArray>::new(NdArrayDevice::Cpu);
        let batch = batcher.batch(vec![
            item_filled_with(10.0, 9),
            item_filled_with(20.0, 0),
            item_filled_with(30.0, 4),
        ]);

        let targets: Vec<i64> = batch.targets.into_data().to_vec().unwrap();
        assert_eq!(targets, vec![9, 0, 4]);
    }
}
