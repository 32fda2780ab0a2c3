// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// Other layers never build tensors directly — only this one
// and the data batcher do.
//
// What's in this layer:
//
//   model.rs      — The feed-forward classifier
//                   Four fully-connected layers with ReLU,
//                   dropout after each hidden activation,
//                   log-softmax output, NLL loss.
//
//   trainer.rs    — The training loop
//                   Forward pass, loss, backward pass, Adam
//                   update, then a validation pass with
//                   top-1 accuracy after every epoch.
//
//   inferencer.rs — The inference engine
//                   Loads a checkpoint and turns one image
//                   into per-class probabilities.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Srivastava et al. (2014) Dropout

/// Feed-forward classifier architecture and loss
pub mod model;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Inference engine — loads checkpoint and predicts classes
pub mod inferencer;
