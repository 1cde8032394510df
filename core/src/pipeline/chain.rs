// piped_mediator/src/pipeline/chain.rs

//! The chain algebra: `then*` methods that fuse a `Pipeline` with a next step.
//!
//! Every method borrows `self` and returns a new pipeline; the receiver is never
//! modified. The fused closure runs the receiver first, returns its error
//! without calling the next step, and otherwise hands the value and the same
//! cancellation token to the next step.

use crate::core::cancel::CancellationToken;
use crate::core::unit::{PipelineUnit, SinkUnit, StepFuture};
use crate::pipeline::definition::{Pipeline, SinkFn, SinkPipeline, StepFn};
use std::future::Future;
use std::sync::Arc;

impl<TInput, TOutput, Err> Pipeline<TInput, TOutput, Err>
where
  TInput: Send + 'static,
  TOutput: Send + 'static,
  Err: Send + 'static,
{
  /// Continues the chain with an asynchronous function `TOutput -> TNext`.
  pub fn then<TNext, F, Fut>(&self, func: F) -> Pipeline<TInput, TNext, Err>
  where
    TNext: Send + 'static,
    F: Fn(TOutput, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<TNext, Err>> + Send + 'static,
  {
    let head = Arc::clone(&self.func);
    let next = Arc::new(func);
    let fused: StepFn<TInput, TNext, Err> = Arc::new(move |input: TInput, cancel: CancellationToken| -> StepFuture<TNext, Err> {
      let head_fut = head(input, cancel.clone());
      let next = Arc::clone(&next);
      Box::pin(async move {
        let value = head_fut.await?;
        next(value, cancel).await
      })
    });
    Pipeline::from_step_fn(fused)
  }

  /// Continues the chain with an existing unit, which may itself be a chain.
  pub fn then_unit<TNext, U>(&self, unit: U) -> Pipeline<TInput, TNext, Err>
  where
    TNext: Send + 'static,
    U: PipelineUnit<TOutput, TNext, Err> + 'static,
  {
    let head = Arc::clone(&self.func);
    let next = Arc::new(unit);
    let fused: StepFn<TInput, TNext, Err> = Arc::new(move |input: TInput, cancel: CancellationToken| -> StepFuture<TNext, Err> {
      let head_fut = head(input, cancel.clone());
      let next = Arc::clone(&next);
      Box::pin(async move {
        let value = head_fut.await?;
        <U as PipelineUnit<TOutput, TNext, Err>>::execute(&next, value, cancel).await
      })
    });
    Pipeline::from_step_fn(fused)
  }

  /// Ends the chain with an asynchronous function consuming `TOutput`.
  pub fn then_sink<F, Fut>(&self, func: F) -> SinkPipeline<TInput, Err>
  where
    F: Fn(TOutput, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Err>> + Send + 'static,
  {
    let head = Arc::clone(&self.func);
    let next = Arc::new(func);
    let fused: SinkFn<TInput, Err> = Arc::new(move |input: TInput, cancel: CancellationToken| -> StepFuture<(), Err> {
      let head_fut = head(input, cancel.clone());
      let next = Arc::clone(&next);
      Box::pin(async move {
        let value = head_fut.await?;
        next(value, cancel).await
      })
    });
    SinkPipeline::from_sink_fn(fused)
  }

  /// Ends the chain with an existing sink unit.
  pub fn then_sink_unit<U>(&self, unit: U) -> SinkPipeline<TInput, Err>
  where
    U: SinkUnit<TOutput, Err> + 'static,
  {
    let head = Arc::clone(&self.func);
    let next = Arc::new(unit);
    let fused: SinkFn<TInput, Err> = Arc::new(move |input: TInput, cancel: CancellationToken| -> StepFuture<(), Err> {
      let head_fut = head(input, cancel.clone());
      let next = Arc::clone(&next);
      Box::pin(async move {
        let value = head_fut.await?;
        <U as SinkUnit<TOutput, Err>>::execute(&next, value, cancel).await
      })
    });
    SinkPipeline::from_sink_fn(fused)
  }
}
