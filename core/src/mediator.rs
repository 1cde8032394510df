// piped_mediator/src/mediator.rs

//! Defines `Mediator<E>`, the type-keyed dispatcher.
//!
//! The mediator stores no handlers. On every call it resolves the pipeline
//! bound to `SinkRef<TInput, E>` or `PipelineRef<TInput, TOutput, E>` from its
//! `ServiceProvider` and forwards the input and the caller's cancellation token.
//! `E` is the application error type returned to callers; it must be
//! constructible from `MediatorError` so lookup failures can be reported.
//!
//! A mediator cached by the registry (scoped or singleton) holds its provider
//! weakly; see `ServiceCollection::add_mediator`.

use crate::core::cancel::CancellationToken;
use crate::core::unit::{PipelineRef, PipelineUnit, SinkRef, SinkUnit};
use crate::error::MediatorError;
use crate::services::{ServiceProvider, WeakServiceProvider};

use async_trait::async_trait;
use std::marker::PhantomData;
use tracing::{event, instrument, Level};

/// The dispatch seam: send an input, optionally get an output, without knowing
/// which pipeline handles it.
#[async_trait]
pub trait Dispatcher<E>: Send + Sync
where
  E: std::error::Error + From<MediatorError> + Send + Sync + 'static,
{
  /// Dispatches to the sink registered for `TInput`.
  async fn send<TInput>(&self, input: TInput, cancel: CancellationToken) -> Result<(), E>
  where
    TInput: Send + 'static;

  /// Dispatches to the pipeline registered for `(TInput, TOutput)`.
  async fn request<TInput, TOutput>(&self, input: TInput, cancel: CancellationToken) -> Result<TOutput, E>
  where
    TInput: Send + 'static,
    TOutput: Send + 'static;
}

#[derive(Clone)]
enum ProviderHandle {
  Owned(ServiceProvider),
  Weak(WeakServiceProvider),
}

/// The mediator. Cheap to clone; clones dispatch against the same provider.
pub struct Mediator<ApplicationError = MediatorError>
where
  ApplicationError: std::error::Error + From<MediatorError> + Send + Sync + 'static,
{
  services: ProviderHandle,
  _phantom_app_err: PhantomData<fn() -> ApplicationError>,
}

impl<ApplicationError> Mediator<ApplicationError>
where
  ApplicationError: std::error::Error + From<MediatorError> + Send + Sync + 'static,
{
  /// Creates a mediator resolving from `services` (root provider or a scope).
  pub fn new(services: ServiceProvider) -> Self {
    Self {
      services: ProviderHandle::Owned(services),
      _phantom_app_err: PhantomData,
    }
  }

  /// Creates a mediator that does not keep `services` alive. Dispatch fails with
  /// `ProviderDropped` once that provider or scope is gone.
  pub fn from_weak(services: WeakServiceProvider) -> Self {
    Self {
      services: ProviderHandle::Weak(services),
      _phantom_app_err: PhantomData,
    }
  }

  /// The provider this mediator dispatches against.
  pub fn services(&self) -> Result<ServiceProvider, MediatorError> {
    match &self.services {
      ProviderHandle::Owned(services) => Ok(services.clone()),
      ProviderHandle::Weak(services) => services.upgrade().ok_or_else(|| {
        event!(Level::ERROR, "Mediator used after its provider was dropped.");
        MediatorError::ProviderDropped {
          service_type: std::any::type_name::<Self>(),
        }
      }),
    }
  }

  /// Runs the sink registered for `TInput`.
  #[instrument(
    name = "Mediator::send",
    skip_all,
    fields(input_type = %std::any::type_name::<TInput>()),
    err(Display)
  )]
  pub async fn send<TInput>(&self, input: TInput, cancel: CancellationToken) -> Result<(), ApplicationError>
  where
    TInput: Send + 'static,
  {
    event!(Level::DEBUG, "Resolving sink pipeline.");
    let pipeline = match self.services()?.try_resolve::<SinkRef<TInput, ApplicationError>>()? {
      Some(pipeline) => pipeline,
      None => return Err(ApplicationError::from(not_registered::<TInput>("()"))),
    };

    event!(Level::TRACE, "Sink pipeline resolved. Executing.");
    SinkUnit::execute(&*pipeline, input, cancel).await
  }

  /// Runs the pipeline registered for `(TInput, TOutput)` and returns its output.
  #[instrument(
    name = "Mediator::request",
    skip_all,
    fields(
      input_type = %std::any::type_name::<TInput>(),
      output_type = %std::any::type_name::<TOutput>(),
    ),
    err(Display)
  )]
  pub async fn request<TInput, TOutput>(&self, input: TInput, cancel: CancellationToken) -> Result<TOutput, ApplicationError>
  where
    TInput: Send + 'static,
    TOutput: Send + 'static,
  {
    event!(Level::DEBUG, "Resolving pipeline.");
    let pipeline = match self
      .services()?
      .try_resolve::<PipelineRef<TInput, TOutput, ApplicationError>>()?
    {
      Some(pipeline) => pipeline,
      None => return Err(ApplicationError::from(not_registered::<TInput>(std::any::type_name::<TOutput>()))),
    };

    event!(Level::TRACE, "Pipeline resolved. Executing.");
    PipelineUnit::execute(&*pipeline, input, cancel).await
  }
}

// Resolution failures other than a missing binding (a failing factory, a
// missing collaborator inside a factory) are returned unchanged by the callers.
fn not_registered<TInput>(output_type: &'static str) -> MediatorError {
  let input_type = std::any::type_name::<TInput>();
  event!(Level::ERROR, %input_type, %output_type, "No pipeline registered for type pair.");
  MediatorError::HandlerNotRegistered {
    input_type,
    output_type,
  }
}

#[async_trait]
impl<ApplicationError> Dispatcher<ApplicationError> for Mediator<ApplicationError>
where
  ApplicationError: std::error::Error + From<MediatorError> + Send + Sync + 'static,
{
  async fn send<TInput>(&self, input: TInput, cancel: CancellationToken) -> Result<(), ApplicationError>
  where
    TInput: Send + 'static,
  {
    Mediator::send(self, input, cancel).await
  }

  async fn request<TInput, TOutput>(&self, input: TInput, cancel: CancellationToken) -> Result<TOutput, ApplicationError>
  where
    TInput: Send + 'static,
    TOutput: Send + 'static,
  {
    Mediator::request(self, input, cancel).await
  }
}

impl<ApplicationError> Clone for Mediator<ApplicationError>
where
  ApplicationError: std::error::Error + From<MediatorError> + Send + Sync + 'static,
{
  fn clone(&self) -> Self {
    Self {
      services: self.services.clone(),
      _phantom_app_err: PhantomData,
    }
  }
}
