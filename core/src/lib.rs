// src/lib.rs

//! piped-mediator: a type-keyed async mediator with composable pipelines.
//!
//! Callers send a typed input and get back nothing or a typed output, without
//! knowing which handler runs. Handlers are:
//!  - Single asynchronous steps (`PipelineUnit`, or `SinkUnit` when they produce nothing).
//!  - Fused into longer pipelines with `then`, where each step may change the type.
//!  - Optionally assembled by a `PipelineBuilder` that pulls step collaborators from the registry.
//!  - Registered in a `ServiceCollection` under their (input, output) type pair with a lifetime.
//!  - Looked up and run by the `Mediator` at dispatch time.

pub mod config;
pub mod core;
pub mod error;
pub mod mediator;
pub mod pipeline;
pub mod registration;
pub mod services;

// --- Re-exports for the Public API ---

pub use crate::core::cancel::{ensure_active, CancellationToken};
pub use crate::core::unit::{PipelineRef, PipelineUnit, SinkRef, SinkUnit, StepFuture};

pub use crate::pipeline::builder::{PipelineBuilder, SinkBuilder, StepBuilder};
pub use crate::pipeline::definition::{pipe, pipe_sink, pipe_sink_unit, pipe_unit, Pipeline, SinkPipeline};

pub use crate::mediator::{Dispatcher, Mediator};
pub use crate::services::{Lifetime, ServiceCollection, ServiceProvider, WeakServiceProvider};

pub use crate::config::MediatorConfig;
pub use crate::error::{MediatorError, MediatorResult};

/*
    Typical wiring:
    1. Write steps as async closures (`pipe`, `pipe_sink`) or as structs implementing `PipelineUnit` / `SinkUnit`.
    2. Chain them: `pipe(parse).then(scale).then_sink(print)`.
    3. Register the result: `services.add_pipeline(p, Lifetime::Singleton)` or, for steps with
       collaborators, `services.add_pipeline_with(|builder| Ok(builder.add_step(..)?.create()), lifetime)`.
    4. Register the mediator: `services.add_mediator::<MyError>(lifetime)`.
    5. `let provider = services.build();` then resolve `Mediator<MyError>` and call
       `mediator.request::<In, Out>(input, token).await` or `mediator.send(input, token).await`.
*/
