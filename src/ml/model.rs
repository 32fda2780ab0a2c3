use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig, Relu},
    prelude::*,
    tensor::activation::log_softmax,
    tensor::backend::AutodiffBackend,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct ClassifierConfig {
    /// Flattened image length (28 * 28)
    #[config(default = 784)]
    pub input_dim: usize,

    #[config(default = 256)]
    pub hidden1: usize,

    #[config(default = 128)]
    pub hidden2: usize,

    #[config(default = 64)]
    pub hidden3: usize,

    #[config(default = 10)]
    pub num_classes: usize,

    /// Probability of zeroing a hidden activation during
    /// training. 0.0 disables dropout entirely.
    #[config(default = 0.2)]
    pub dropout: f64,
}

impl ClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Classifier<B> {
        Classifier {
            fc1: LinearConfig::new(self.input_dim, self.hidden1).init(device),
            fc2: LinearConfig::new(self.hidden1, self.hidden2).init(device),
            fc3: LinearConfig::new(self.hidden2, self.hidden3).init(device),
            fc4: LinearConfig::new(self.hidden3, self.num_classes).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
            activation: Relu::new(),
        }
    }
}

/// Feed-forward classifier: a shrinking stack of affine layers
/// (784 → 256 → 128 → 64 → 10 by default), each hidden layer
/// followed by ReLU and dropout, terminating in log-softmax.
///
/// Dropout is only active on an autodiff backend — on the
/// inner backend (validation/inference) it is the identity,
/// which is exactly the training/evaluation mode switch.
#[derive(Module, Debug)]
pub struct Classifier<B: Backend> {
    pub fc1: Linear<B>,
    pub fc2: Linear<B>,
    pub fc3: Linear<B>,
    pub fc4: Linear<B>,
    pub dropout: Dropout,
    pub activation: Relu,
}

impl<B: Backend> Classifier<B> {
    /// images: [batch, 784] → log-probabilities: [batch, num_classes].
    /// Exponentiating a row yields a distribution summing to 1.
    pub fn forward(&self, images: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.dropout.forward(self.activation.forward(self.fc1.forward(images)));
        let x = self.dropout.forward(self.activation.forward(self.fc2.forward(x)));
        let x = self.dropout.forward(self.activation.forward(self.fc3.forward(x)));
        log_softmax(self.fc4.forward(x), 1)
    }

    /// Forward pass plus NLL loss against the true labels —
    /// the training-step entry point.
    pub fn forward_loss(
        &self,
        images: Tensor<B, 2>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>)
    where
        B: AutodiffBackend,
    {
        let log_probs = self.forward(images);
        let loss = nll_loss(log_probs.clone(), targets);
        (loss, log_probs)
    }
}

/// Negative log-likelihood loss over a batch.
///
/// Picks each example's log-probability of its true class and
/// averages the negated values. Expects log-probabilities (the
/// model's log-softmax output), NOT raw logits.
pub fn nll_loss<B: Backend>(
    log_probs: Tensor<B, 2>,
    targets: Tensor<B, 1, Int>,
) -> Tensor<B, 1> {
    // gather wants index rank == input rank: [batch] → [batch, 1]
    let indices = targets.unsqueeze_dim::<2>(1);
    log_probs.gather(1, indices).mean().neg()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    type TestBackend = NdArray;

    #[test]
    fn test_forward_output_shape() {
        let device = NdArrayDevice::Cpu;
        let model = ClassifierConfig::new().init::<TestBackend>(&device);
        let images = Tensor::<TestBackend, 2>::zeros([4, 784], &device);

        let log_probs = model.forward(images);
        assert_eq!(log_probs.dims(), [4, 10]);
    }

    #[test]
    fn test_exponentiated_outputs_sum_to_one() {
        let device = NdArrayDevice::Cpu;
        let model = ClassifierConfig::new().init::<TestBackend>(&device);
        let images = Tensor::<TestBackend, 2>::random(
            [3, 784],
            burn::tensor::Distribution::Default,
            &device,
        );

        let probs = model.forward(images).exp();
        let sums: Vec<f32> = probs.sum_dim(1).into_data().to_vec().unwrap();
        for sum in sums {
            assert!((sum - 1.0).abs() < 1e-4, "row sums to {sum}");
        }
    }

    #[test]
    fn test_evaluation_mode_is_deterministic() {
        // On a non-autodiff backend dropout is the identity,
        // so two forward passes must agree exactly.
        let device = NdArrayDevice::Cpu;
        let model = ClassifierConfig::new()
            .with_dropout(0.5)
            .init::<TestBackend>(&device);
        let images = Tensor::<TestBackend, 2>::random(
            [2, 784],
            burn::tensor::Distribution::Default,
            &device,
        );

        let first: Vec<f32> = model.forward(images.clone()).into_data().to_vec().unwrap();
        let second: Vec<f32> = model.forward(images).into_data().to_vec().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_nll_loss_matches_hand_computed_value() {
        let device = NdArrayDevice::Cpu;
        // Two examples over three classes with known probabilities
        let log_probs = Tensor::<TestBackend, 2>::from_floats(
            [
                [0.7f32.ln(), 0.2f32.ln(), 0.1f32.ln()],
                [0.1f32.ln(), 0.3f32.ln(), 0.6f32.ln()],
            ],
            &device,
        );
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([0, 2], &device);

        let loss: f32 = nll_loss(log_probs, targets).into_scalar();
        let expected = -(0.7f32.ln() + 0.6f32.ln()) / 2.0;
        assert!((loss - expected).abs() < 1e-6, "loss {loss} vs {expected}");
    }
}
