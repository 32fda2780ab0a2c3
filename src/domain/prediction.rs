// ============================================================
// Layer 3 — Prediction Domain Type
// ============================================================
// The result of running one image through the trained model:
// a probability for each of the ten classes, summing to 1
// (the model outputs log-probabilities; the inferencer
// exponentiates them before building this struct).
//
// Plain data, no framework types — the CLI layer renders
// this into a textual chart.

use serde::{Deserialize, Serialize};

use crate::domain::label::{ClassLabel, NUM_CLASSES};

/// Per-class probability distribution for a single image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// One probability per class, indexed by raw label (0..=9)
    pub probabilities: Vec<f32>,
}

impl Prediction {
    pub fn new(probabilities: Vec<f32>) -> Self {
        debug_assert_eq!(probabilities.len(), NUM_CLASSES);
        Self { probabilities }
    }

    /// The most likely class and its probability (top-1).
    /// Returns None only if the probability vector is empty.
    pub fn top1(&self) -> Option<(ClassLabel, f32)> {
        let (index, prob) = self
            .probabilities
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))?;
        Some((ClassLabel::from_index(index)?, *prob))
    }

    /// The probability assigned to a specific class
    pub fn probability_of(&self, label: ClassLabel) -> f32 {
        self.probabilities.get(label.index()).copied().unwrap_or(0.0)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_except(index: usize, peak: f32) -> Vec<f32> {
        let rest = (1.0 - peak) / (NUM_CLASSES - 1) as f32;
        (0..NUM_CLASSES)
            .map(|i| if i == index { peak } else { rest })
            .collect()
    }

    #[test]
    fn test_top1_picks_highest_probability() {
        let pred = Prediction::new(uniform_except(7, 0.82));
        let (label, prob) = pred.top1().unwrap();
        assert_eq!(label, ClassLabel::Sneaker);
        assert!((prob - 0.82).abs() < 1e-6);
    }

    #[test]
    fn test_probability_of() {
        let pred = Prediction::new(uniform_except(3, 0.5));
        assert!((pred.probability_of(ClassLabel::Dress) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_top1_empty_is_none() {
        let pred = Prediction { probabilities: Vec::new() };
        assert!(pred.top1().is_none());
    }
}
