// ============================================================
// Layer 3 — Class Labels
// ============================================================
// The ten clothing categories of Fashion-MNIST.
//
// The dataset stores labels as raw integers 0..=9; this enum
// gives them names so predictions can be displayed as
// "Sneaker" instead of "7". The discriminant of each variant
// matches the integer label used in the dataset files.
//
// Reference: Xiao et al. (2017) Fashion-MNIST
//            Rust Book §6 (Enums)

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of classes in the dataset — one per clothing category.
pub const NUM_CLASSES: usize = 10;

/// One of the ten Fashion-MNIST clothing categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassLabel {
    TShirtTop = 0,
    Trouser   = 1,
    Pullover  = 2,
    Dress     = 3,
    Coat      = 4,
    Sandal    = 5,
    Shirt     = 6,
    Sneaker   = 7,
    Bag       = 8,
    AnkleBoot = 9,
}

impl ClassLabel {
    /// All labels in dataset order — index into this array
    /// with a raw label to get the variant.
    pub const ALL: [ClassLabel; NUM_CLASSES] = [
        ClassLabel::TShirtTop,
        ClassLabel::Trouser,
        ClassLabel::Pullover,
        ClassLabel::Dress,
        ClassLabel::Coat,
        ClassLabel::Sandal,
        ClassLabel::Shirt,
        ClassLabel::Sneaker,
        ClassLabel::Bag,
        ClassLabel::AnkleBoot,
    ];

    /// Convert a raw dataset label into a ClassLabel.
    /// Returns None for out-of-range values.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The integer label as stored in the dataset files
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Human-readable category name (official dataset naming)
    pub fn name(&self) -> &'static str {
        match self {
            ClassLabel::TShirtTop => "T-shirt/top",
            ClassLabel::Trouser   => "Trouser",
            ClassLabel::Pullover  => "Pullover",
            ClassLabel::Dress     => "Dress",
            ClassLabel::Coat      => "Coat",
            ClassLabel::Sandal    => "Sandal",
            ClassLabel::Shirt     => "Shirt",
            ClassLabel::Sneaker   => "Sneaker",
            ClassLabel::Bag       => "Bag",
            ClassLabel::AnkleBoot => "Ankle boot",
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, label) in ClassLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
            assert_eq!(ClassLabel::from_index(i), Some(*label));
        }
    }

    #[test]
    fn test_out_of_range_label() {
        assert_eq!(ClassLabel::from_index(NUM_CLASSES), None);
    }

    #[test]
    fn test_names_match_dataset_convention() {
        assert_eq!(ClassLabel::Sneaker.name(), "Sneaker");
        assert_eq!(ClassLabel::from_index(9).unwrap().name(), "Ankle boot");
    }
}
