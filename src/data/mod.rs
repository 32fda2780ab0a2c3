// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from the raw dataset files
// all the way to GPU-ready tensor batches.
//
// The pipeline flows in this order:
//
//   IDX files (downloaded + cached)
//       │
//       ▼
//   FashionMnistDataset → parses images/labels, implements
//       │                 Burn's Dataset trait
//       ▼
//   ClassifyBatcher     → stacks items into normalized
//       │                 tensor batches
//       ▼
//   DataLoader          → shuffles and feeds batches to the
//                         training loop
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Downloads, caches and parses the Fashion-MNIST IDX files
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
