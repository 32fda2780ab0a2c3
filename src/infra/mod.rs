// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any specific
// business layer:
//
//   checkpoint.rs — Saving and loading model weights with
//                   Burn's CompactRecorder, plus the training
//                   config as JSON so inference can rebuild
//                   the exact architecture.
//
//   metrics.rs    — Epoch statistics: running-mean
//                   accumulators, the per-epoch metrics
//                   record, and a CSV logger for later
//                   inspection of learning curves.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Epoch accumulators and the metrics CSV logger
pub mod metrics;
