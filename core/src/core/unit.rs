// piped_mediator/src/core/unit.rs

//! Defines the two pipeline capabilities: `PipelineUnit<TInput, TOutput, Err>`
//! (consume an input, produce an output) and `SinkUnit<TInput, Err>` (consume an
//! input, produce nothing).
//!
//! Both traits are object safe. The registry stores them as `Arc<dyn ...>`
//! (`PipelineRef` / `SinkRef`), and those `Arc`s implement the traits again, so
//! a resolved unit chains like any other.

use crate::core::cancel::CancellationToken;
use crate::error::MediatorError;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by the closures a `Pipeline` wraps.
pub type StepFuture<T, Err> = Pin<Box<dyn Future<Output = Result<T, Err>> + Send>>;

/// The registry key for a value-producing pipeline.
pub type PipelineRef<TInput, TOutput, Err = MediatorError> = Arc<dyn PipelineUnit<TInput, TOutput, Err>>;

/// The registry key for a terminating pipeline.
pub type SinkRef<TInput, Err = MediatorError> = Arc<dyn SinkUnit<TInput, Err>>;

/// An asynchronous step from `TInput` to `TOutput`.
///
/// Implementations should check `cancel` (see `ensure_active`) and abort with a
/// cancellation error when it fires. Nothing else checks it for them.
#[async_trait]
pub trait PipelineUnit<TInput, TOutput, Err = MediatorError>: Send + Sync {
  async fn execute(&self, input: TInput, cancel: CancellationToken) -> Result<TOutput, Err>;
}

/// An asynchronous step that consumes `TInput` and produces no value.
#[async_trait]
pub trait SinkUnit<TInput, Err = MediatorError>: Send + Sync {
  async fn execute(&self, input: TInput, cancel: CancellationToken) -> Result<(), Err>;
}

#[async_trait]
impl<TInput, TOutput, Err, T> PipelineUnit<TInput, TOutput, Err> for Arc<T>
where
  T: PipelineUnit<TInput, TOutput, Err> + ?Sized,
  TInput: Send + 'static,
  TOutput: Send + 'static,
  Err: Send + 'static,
{
  async fn execute(&self, input: TInput, cancel: CancellationToken) -> Result<TOutput, Err> {
    <T as PipelineUnit<TInput, TOutput, Err>>::execute(&**self, input, cancel).await
  }
}

#[async_trait]
impl<TInput, Err, T> SinkUnit<TInput, Err> for Arc<T>
where
  T: SinkUnit<TInput, Err> + ?Sized,
  TInput: Send + 'static,
  Err: Send + 'static,
{
  async fn execute(&self, input: TInput, cancel: CancellationToken) -> Result<(), Err> {
    <T as SinkUnit<TInput, Err>>::execute(&**self, input, cancel).await
  }
}
