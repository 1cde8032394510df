// piped_mediator/src/pipeline/builder.rs

//! Implements the fluent builder API (`PipelineBuilder`, `StepBuilder`,
//! `SinkBuilder`) for assembling a pipeline step by step.
//!
//! Unlike bare `then` chaining, every step is produced by a factory that gets
//! the `ServiceProvider`, so a step can pull its collaborators from the
//! registry. Factories run immediately when the step is added: resolution
//! failures surface while building, never during `execute`.
//!
//! Each call consumes the builder and returns the builder for the next
//! accumulated type; a finished builder cannot be reused.

use crate::core::unit::{PipelineUnit, SinkUnit};
use crate::error::MediatorError;
use crate::pipeline::definition::{Pipeline, SinkPipeline};
use crate::services::ServiceProvider;

use std::marker::PhantomData;
use tracing::{event, instrument, Level};

/// Starting point for a built pipeline. `Err` is the error type of the steps.
pub struct PipelineBuilder<Err = MediatorError> {
  provider: ServiceProvider,
  _phantom_err: PhantomData<fn() -> Err>,
}

/// A builder holding a pipeline from `TInput` to `TOutput`.
pub struct StepBuilder<TInput, TOutput, Err = MediatorError> {
  provider: ServiceProvider,
  pipeline: Pipeline<TInput, TOutput, Err>,
  steps: usize,
}

/// A builder holding a terminated pipeline. Only `create` remains.
pub struct SinkBuilder<TInput, Err = MediatorError> {
  pipeline: SinkPipeline<TInput, Err>,
  steps: usize,
}

impl<Err> PipelineBuilder<Err>
where
  Err: Send + 'static,
{
  pub fn new(provider: ServiceProvider) -> Self {
    Self {
      provider,
      _phantom_err: PhantomData,
    }
  }

  pub fn provider(&self) -> &ServiceProvider {
    &self.provider
  }

  /// Adds the first step, produced by `factory`.
  #[instrument(
    name = "PipelineBuilder::add_step",
    skip_all,
    fields(step_type = %std::any::type_name::<P>()),
    err(Display)
  )]
  pub fn add_step<P, TInput, TOutput, F>(self, factory: F) -> Result<StepBuilder<TInput, TOutput, Err>, MediatorError>
  where
    TInput: Send + 'static,
    TOutput: Send + 'static,
    P: PipelineUnit<TInput, TOutput, Err> + 'static,
    F: FnOnce(&ServiceProvider) -> Result<P, MediatorError>,
  {
    let step = factory(&self.provider)?;
    event!(Level::DEBUG, "First step created.");
    Ok(StepBuilder {
      provider: self.provider,
      pipeline: Pipeline::from_unit(step),
      steps: 1,
    })
  }

  /// Adds the first step using its `Default` constructor.
  pub fn add_default_step<P, TInput, TOutput>(self) -> StepBuilder<TInput, TOutput, Err>
  where
    TInput: Send + 'static,
    TOutput: Send + 'static,
    P: PipelineUnit<TInput, TOutput, Err> + Default + 'static,
  {
    StepBuilder {
      provider: self.provider,
      pipeline: Pipeline::from_unit(P::default()),
      steps: 1,
    }
  }

  /// Builds a single-step sink.
  pub fn add_sink_step<P, TInput, F>(self, factory: F) -> Result<SinkBuilder<TInput, Err>, MediatorError>
  where
    TInput: Send + 'static,
    P: SinkUnit<TInput, Err> + 'static,
    F: FnOnce(&ServiceProvider) -> Result<P, MediatorError>,
  {
    let step = factory(&self.provider)?;
    Ok(SinkBuilder {
      pipeline: SinkPipeline::from_unit(step),
      steps: 1,
    })
  }

  pub fn add_default_sink_step<P, TInput>(self) -> SinkBuilder<TInput, Err>
  where
    TInput: Send + 'static,
    P: SinkUnit<TInput, Err> + Default + 'static,
  {
    SinkBuilder {
      pipeline: SinkPipeline::from_unit(P::default()),
      steps: 1,
    }
  }
}

impl<TInput, TOutput, Err> StepBuilder<TInput, TOutput, Err>
where
  TInput: Send + 'static,
  TOutput: Send + 'static,
  Err: Send + 'static,
{
  pub fn provider(&self) -> &ServiceProvider {
    &self.provider
  }

  /// Number of steps accumulated so far.
  pub fn step_count(&self) -> usize {
    self.steps
  }

  /// Appends a step `TOutput -> TNext`, produced by `factory`.
  #[instrument(
    name = "StepBuilder::add_step",
    skip_all,
    fields(step_type = %std::any::type_name::<P>(), position = self.steps),
    err(Display)
  )]
  pub fn add_step<P, TNext, F>(self, factory: F) -> Result<StepBuilder<TInput, TNext, Err>, MediatorError>
  where
    TNext: Send + 'static,
    P: PipelineUnit<TOutput, TNext, Err> + 'static,
    F: FnOnce(&ServiceProvider) -> Result<P, MediatorError>,
  {
    let step = factory(&self.provider)?;
    event!(Level::DEBUG, "Step created and chained.");
    Ok(StepBuilder {
      pipeline: self.pipeline.then_unit(step),
      provider: self.provider,
      steps: self.steps + 1,
    })
  }

  pub fn add_default_step<P, TNext>(self) -> StepBuilder<TInput, TNext, Err>
  where
    TNext: Send + 'static,
    P: PipelineUnit<TOutput, TNext, Err> + Default + 'static,
  {
    StepBuilder {
      pipeline: self.pipeline.then_unit(P::default()),
      provider: self.provider,
      steps: self.steps + 1,
    }
  }

  /// Appends a terminating step consuming `TOutput`.
  pub fn add_sink_step<P, F>(self, factory: F) -> Result<SinkBuilder<TInput, Err>, MediatorError>
  where
    P: SinkUnit<TOutput, Err> + 'static,
    F: FnOnce(&ServiceProvider) -> Result<P, MediatorError>,
  {
    let step = factory(&self.provider)?;
    Ok(SinkBuilder {
      pipeline: self.pipeline.then_sink_unit(step),
      steps: self.steps + 1,
    })
  }

  pub fn add_default_sink_step<P>(self) -> SinkBuilder<TInput, Err>
  where
    P: SinkUnit<TOutput, Err> + Default + 'static,
  {
    SinkBuilder {
      pipeline: self.pipeline.then_sink_unit(P::default()),
      steps: self.steps + 1,
    }
  }

  pub fn create(self) -> Pipeline<TInput, TOutput, Err> {
    event!(Level::DEBUG, steps = self.steps, "Pipeline created by builder.");
    self.pipeline
  }
}

impl<TInput, Err> SinkBuilder<TInput, Err>
where
  TInput: Send + 'static,
  Err: Send + 'static,
{
  pub fn step_count(&self) -> usize {
    self.steps
  }

  pub fn create(self) -> SinkPipeline<TInput, Err> {
    event!(Level::DEBUG, steps = self.steps, "Sink pipeline created by builder.");
    self.pipeline
  }
}
