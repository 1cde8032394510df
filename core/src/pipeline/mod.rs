// piped_mediator/src/pipeline/mod.rs

//! Defines the concrete `Pipeline<TInput, TOutput>` and `SinkPipeline<TInput>`
//! types, the chain algebra that fuses them, and the step-by-step builder.

pub mod builder;
pub mod chain;
pub mod definition;

pub use builder::{PipelineBuilder, SinkBuilder, StepBuilder};
pub use definition::{pipe, pipe_sink, pipe_sink_unit, pipe_unit, Pipeline, SinkPipeline};
