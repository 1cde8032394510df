pub mod cancel;
pub mod unit;

// Re-export key types for easier access from other modules (and lib.rs)
pub use cancel::{ensure_active, CancellationToken};
pub use unit::{PipelineRef, PipelineUnit, SinkRef, SinkUnit, StepFuture};
