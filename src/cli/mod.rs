// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`   — trains the classifier on Fashion-MNIST
//   2. `predict` — loads a checkpoint and classifies one
//                  held-out image, printing the per-class
//                  probabilities as a textual chart
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, TrainArgs};

use crate::application::predict_use_case::PredictionReport;
use crate::domain::label::ClassLabel;

// Width of the probability bars in the prediction chart
const BAR_WIDTH: f32 = 40.0;

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "fashion-classifier",
    version = "0.1.0",
    about = "Train a feed-forward classifier on Fashion-MNIST, then predict single images."
)]
pub struct Cli {
    /// The subcommand to run (train or predict)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => Self::run_train(args),
            Commands::Predict(args) => Self::run_predict(args),
        }
    }

    /// Handles the `train` subcommand.
    /// Converts CLI args into a TrainConfig and hands off to Layer 2.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training, checkpoints in: {}", args.checkpoint_dir);

        // Convert CLI args → application config (separates presentation from domain)
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint saved.");
        Ok(())
    }

    /// Handles the `predict` subcommand.
    /// Loads the model from checkpoint and prints the predicted
    /// class probabilities.
    fn run_predict(args: PredictArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let use_case = PredictUseCase::new(args.checkpoint_dir.clone())?;
        let report = use_case.predict(args.index)?;

        print_report(&report);
        Ok(())
    }
}

/// Render one inference result as a textual probability chart —
/// one bar per class, longest bar = most likely class.
fn print_report(report: &PredictionReport) {
    println!("\nTest example #{} (actual: {})\n", report.index, report.actual);

    for label in ClassLabel::ALL {
        let prob = report.prediction.probability_of(label);
        let bar = "█".repeat((prob * BAR_WIDTH).round() as usize);
        println!("{:>11} | {:<40} {:.3}", label.name(), bar, prob);
    }

    if let Some((label, prob)) = report.prediction.top1() {
        let verdict = if label == report.actual { "correct" } else { "wrong" };
        println!("\nPredicted: {} (p={:.3}) — {}", label, prob, verdict);
    }
}
