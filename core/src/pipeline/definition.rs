// piped_mediator/src/pipeline/definition.rs

//! Contains the closure-backed `Pipeline<TInput, TOutput, Err>` and
//! `SinkPipeline<TInput, Err>` types and the free functions that create them.
//!
//! A `Pipeline` is nothing more than a shared step closure. Chaining (see
//! `chain.rs`) wraps the closure in a new one, so a five-step chain and a
//! single step have the same type and the same interface.

use crate::core::cancel::CancellationToken;
use crate::core::unit::{PipelineUnit, SinkUnit, StepFuture};
use crate::error::MediatorError;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// The shared closure behind a `Pipeline`.
pub type StepFn<TInput, TOutput, Err> =
  Arc<dyn Fn(TInput, CancellationToken) -> StepFuture<TOutput, Err> + Send + Sync + 'static>;

/// The shared closure behind a `SinkPipeline`.
pub type SinkFn<TInput, Err> = Arc<dyn Fn(TInput, CancellationToken) -> StepFuture<(), Err> + Send + Sync + 'static>;

/// An immutable pipeline from `TInput` to `TOutput`.
///
/// Cloning is cheap (one `Arc`), and a clone runs exactly the same steps.
pub struct Pipeline<TInput, TOutput, Err = MediatorError> {
  pub(crate) func: StepFn<TInput, TOutput, Err>,
}

/// An immutable pipeline that consumes `TInput` and produces nothing.
///
/// A sink is the end of a chain: it has no `then`.
pub struct SinkPipeline<TInput, Err = MediatorError> {
  pub(crate) func: SinkFn<TInput, Err>,
}

impl<TInput, TOutput, Err> Pipeline<TInput, TOutput, Err>
where
  TInput: Send + 'static,
  TOutput: Send + 'static,
  Err: Send + 'static,
{
  /// Wraps an asynchronous function into a pipeline.
  pub fn new<F, Fut>(func: F) -> Self
  where
    F: Fn(TInput, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<TOutput, Err>> + Send + 'static,
  {
    let func: StepFn<TInput, TOutput, Err> =
      Arc::new(move |input: TInput, cancel: CancellationToken| -> StepFuture<TOutput, Err> { Box::pin(func(input, cancel)) });
    Self { func }
  }

  /// Wraps an existing unit (for example a struct implementing `PipelineUnit`,
  /// or a resolved `PipelineRef`) so it can be chained.
  pub fn from_unit<U>(unit: U) -> Self
  where
    U: PipelineUnit<TInput, TOutput, Err> + 'static,
  {
    let unit = Arc::new(unit);
    let func: StepFn<TInput, TOutput, Err> = Arc::new(move |input: TInput, cancel: CancellationToken| -> StepFuture<TOutput, Err> {
      let unit = Arc::clone(&unit);
      Box::pin(async move { <U as PipelineUnit<TInput, TOutput, Err>>::execute(&unit, input, cancel).await })
    });
    Self { func }
  }

  pub(crate) fn from_step_fn(func: StepFn<TInput, TOutput, Err>) -> Self {
    Self { func }
  }

  /// Runs the pipeline. Equivalent to `PipelineUnit::execute`, without needing the trait in scope.
  pub async fn run(&self, input: TInput, cancel: CancellationToken) -> Result<TOutput, Err> {
    (self.func)(input, cancel).await
  }
}

impl<TInput, Err> SinkPipeline<TInput, Err>
where
  TInput: Send + 'static,
  Err: Send + 'static,
{
  /// Wraps an asynchronous function returning `()` into a sink.
  pub fn new<F, Fut>(func: F) -> Self
  where
    F: Fn(TInput, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Err>> + Send + 'static,
  {
    let func: SinkFn<TInput, Err> =
      Arc::new(move |input: TInput, cancel: CancellationToken| -> StepFuture<(), Err> { Box::pin(func(input, cancel)) });
    Self { func }
  }

  pub fn from_unit<U>(unit: U) -> Self
  where
    U: SinkUnit<TInput, Err> + 'static,
  {
    let unit = Arc::new(unit);
    let func: SinkFn<TInput, Err> = Arc::new(move |input: TInput, cancel: CancellationToken| -> StepFuture<(), Err> {
      let unit = Arc::clone(&unit);
      Box::pin(async move { <U as SinkUnit<TInput, Err>>::execute(&unit, input, cancel).await })
    });
    Self { func }
  }

  pub(crate) fn from_sink_fn(func: SinkFn<TInput, Err>) -> Self {
    Self { func }
  }

  pub async fn run(&self, input: TInput, cancel: CancellationToken) -> Result<(), Err> {
    (self.func)(input, cancel).await
  }
}

// Manual Clone: a derive would demand Clone on TInput, TOutput and Err.
impl<TInput, TOutput, Err> Clone for Pipeline<TInput, TOutput, Err> {
  fn clone(&self) -> Self {
    Self {
      func: Arc::clone(&self.func),
    }
  }
}

impl<TInput, Err> Clone for SinkPipeline<TInput, Err> {
  fn clone(&self) -> Self {
    Self {
      func: Arc::clone(&self.func),
    }
  }
}

impl<TInput, TOutput, Err> std::fmt::Debug for Pipeline<TInput, TOutput, Err> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("input", &std::any::type_name::<TInput>())
      .field("output", &std::any::type_name::<TOutput>())
      .finish()
  }
}

impl<TInput, Err> std::fmt::Debug for SinkPipeline<TInput, Err> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SinkPipeline")
      .field("input", &std::any::type_name::<TInput>())
      .finish()
  }
}

#[async_trait]
impl<TInput, TOutput, Err> PipelineUnit<TInput, TOutput, Err> for Pipeline<TInput, TOutput, Err>
where
  TInput: Send + 'static,
  TOutput: Send + 'static,
  Err: Send + 'static,
{
  async fn execute(&self, input: TInput, cancel: CancellationToken) -> Result<TOutput, Err> {
    (self.func)(input, cancel).await
  }
}

#[async_trait]
impl<TInput, Err> SinkUnit<TInput, Err> for SinkPipeline<TInput, Err>
where
  TInput: Send + 'static,
  Err: Send + 'static,
{
  async fn execute(&self, input: TInput, cancel: CancellationToken) -> Result<(), Err> {
    (self.func)(input, cancel).await
  }
}

// --- Free construction functions ---

/// Creates a pipeline from an asynchronous function.
///
/// ```ignore
/// let add_two = pipe(|n: i32, _cancel| async move { Ok::<_, MediatorError>(n + 2) });
/// ```
pub fn pipe<TInput, TOutput, Err, F, Fut>(func: F) -> Pipeline<TInput, TOutput, Err>
where
  TInput: Send + 'static,
  TOutput: Send + 'static,
  Err: Send + 'static,
  F: Fn(TInput, CancellationToken) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<TOutput, Err>> + Send + 'static,
{
  Pipeline::new(func)
}

/// Creates a sink from an asynchronous function.
pub fn pipe_sink<TInput, Err, F, Fut>(func: F) -> SinkPipeline<TInput, Err>
where
  TInput: Send + 'static,
  Err: Send + 'static,
  F: Fn(TInput, CancellationToken) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<(), Err>> + Send + 'static,
{
  SinkPipeline::new(func)
}

pub fn pipe_unit<TInput, TOutput, Err, U>(unit: U) -> Pipeline<TInput, TOutput, Err>
where
  TInput: Send + 'static,
  TOutput: Send + 'static,
  Err: Send + 'static,
  U: PipelineUnit<TInput, TOutput, Err> + 'static,
{
  Pipeline::from_unit(unit)
}

pub fn pipe_sink_unit<TInput, Err, U>(unit: U) -> SinkPipeline<TInput, Err>
where
  TInput: Send + 'static,
  Err: Send + 'static,
  U: SinkUnit<TInput, Err> + 'static,
{
  SinkPipeline::from_unit(unit)
}
