// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `predict`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the classifier on Fashion-MNIST
    Train(TrainArgs),

    /// Predict one held-out test image using a trained checkpoint
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory to save model checkpoints and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Number of images processed together in one forward pass
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 30)]
    pub epochs: usize,

    /// How fast the model learns — too high causes instability,
    /// too low causes slow convergence
    #[arg(long, default_value_t = 3e-3)]
    pub lr: f64,

    /// Width of the first hidden layer
    #[arg(long, default_value_t = 256)]
    pub hidden1: usize,

    /// Width of the second hidden layer
    #[arg(long, default_value_t = 128)]
    pub hidden2: usize,

    /// Width of the third hidden layer
    #[arg(long, default_value_t = 64)]
    pub hidden3: usize,

    /// Dropout probability — randomly zeroes hidden activations
    /// during training to prevent overfitting. 0 disables it.
    #[arg(long, default_value_t = 0.2)]
    pub dropout: f64,

    /// Seed for the per-epoch batch shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            checkpoint_dir: a.checkpoint_dir,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            hidden1:        a.hidden1,
            hidden2:        a.hidden2,
            hidden3:        a.hidden3,
            dropout:        a.dropout,
            seed:           a.seed,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Index of the test example to predict.
    /// Omit to pick a random one.
    #[arg(long)]
    pub index: Option<usize>,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}
