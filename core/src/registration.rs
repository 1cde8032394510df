// piped_mediator/src/registration.rs

//! Convenience registrations on `ServiceCollection` for mediators and pipelines.
//!
//! Every method binds one of the dispatch keys (`Mediator<E>`,
//! `PipelineRef<I, O, E>`, `SinkRef<I, E>`) with the requested lifetime. They
//! are thin wrappers over `ServiceCollection::add`.

use crate::core::unit::{PipelineRef, PipelineUnit, SinkRef, SinkUnit};
use crate::error::MediatorError;
use crate::mediator::Mediator;
use crate::pipeline::builder::PipelineBuilder;
use crate::services::{Lifetime, ServiceCollection, ServiceProvider};

use std::sync::Arc;

impl ServiceCollection {
  /// Registers `Mediator<E>`.
  ///
  /// A transient mediator owns the provider (root or scope) it was resolved
  /// from. A scoped mediator is cached in its scope and a singleton in the root,
  /// so those hold the provider weakly: a scoped mediator dispatches against its
  /// scope until the scope is dropped, a singleton always against the root.
  pub fn add_mediator<E>(&mut self, lifetime: Lifetime) -> &mut Self
  where
    E: std::error::Error + From<MediatorError> + Send + Sync + 'static,
  {
    self.add(lifetime, move |provider: &ServiceProvider| {
      let mediator = match lifetime {
        Lifetime::Transient => Mediator::<E>::new(provider.clone()),
        Lifetime::Scoped | Lifetime::Singleton => Mediator::<E>::from_weak(provider.downgrade()),
      };
      Ok(mediator)
    })
  }

  // --- Value-producing pipelines ---

  /// Registers an existing pipeline instance. Every lifetime hands out that same
  /// instance; the lifetime only controls how the shared handle is cached.
  pub fn add_pipeline<TInput, TOutput, E, P>(&mut self, pipeline: P, lifetime: Lifetime) -> &mut Self
  where
    TInput: Send + 'static,
    TOutput: Send + 'static,
    E: Send + 'static,
    P: PipelineUnit<TInput, TOutput, E> + 'static,
  {
    let shared: PipelineRef<TInput, TOutput, E> = Arc::new(pipeline);
    self.add(lifetime, move |_: &ServiceProvider| Ok(Arc::clone(&shared)))
  }

  /// Registers a pipeline produced by `factory` on resolve.
  pub fn add_pipeline_factory<TInput, TOutput, E, P, F>(&mut self, factory: F, lifetime: Lifetime) -> &mut Self
  where
    TInput: Send + 'static,
    TOutput: Send + 'static,
    E: Send + 'static,
    P: PipelineUnit<TInput, TOutput, E> + 'static,
    F: Fn(&ServiceProvider) -> Result<P, MediatorError> + Send + Sync + 'static,
  {
    self.add(lifetime, move |provider: &ServiceProvider| {
      let pipeline = factory(provider)?;
      Ok(Arc::new(pipeline) as PipelineRef<TInput, TOutput, E>)
    })
  }

  /// Registers a pipeline assembled by a `PipelineBuilder` on resolve.
  pub fn add_pipeline_with<TInput, TOutput, E, P, F>(&mut self, build: F, lifetime: Lifetime) -> &mut Self
  where
    TInput: Send + 'static,
    TOutput: Send + 'static,
    E: Send + 'static,
    P: PipelineUnit<TInput, TOutput, E> + 'static,
    F: Fn(PipelineBuilder<E>) -> Result<P, MediatorError> + Send + Sync + 'static,
  {
    self.add_pipeline_factory::<TInput, TOutput, E, P, _>(move |provider: &ServiceProvider| build(PipelineBuilder::new(provider.clone())), lifetime)
  }

  /// Registers a pipeline type constructed with `Default` on resolve.
  pub fn add_pipeline_default<P, TInput, TOutput, E>(&mut self, lifetime: Lifetime) -> &mut Self
  where
    TInput: Send + 'static,
    TOutput: Send + 'static,
    E: Send + 'static,
    P: PipelineUnit<TInput, TOutput, E> + Default + 'static,
  {
    self.add_pipeline_factory::<TInput, TOutput, E, P, _>(|_: &ServiceProvider| Ok(P::default()), lifetime)
  }

  // --- Sinks ---

  pub fn add_sink<TInput, E, P>(&mut self, sink: P, lifetime: Lifetime) -> &mut Self
  where
    TInput: Send + 'static,
    E: Send + 'static,
    P: SinkUnit<TInput, E> + 'static,
  {
    let shared: SinkRef<TInput, E> = Arc::new(sink);
    self.add(lifetime, move |_: &ServiceProvider| Ok(Arc::clone(&shared)))
  }

  pub fn add_sink_factory<TInput, E, P, F>(&mut self, factory: F, lifetime: Lifetime) -> &mut Self
  where
    TInput: Send + 'static,
    E: Send + 'static,
    P: SinkUnit<TInput, E> + 'static,
    F: Fn(&ServiceProvider) -> Result<P, MediatorError> + Send + Sync + 'static,
  {
    self.add(lifetime, move |provider: &ServiceProvider| {
      let sink = factory(provider)?;
      Ok(Arc::new(sink) as SinkRef<TInput, E>)
    })
  }

  pub fn add_sink_with<TInput, E, P, F>(&mut self, build: F, lifetime: Lifetime) -> &mut Self
  where
    TInput: Send + 'static,
    E: Send + 'static,
    P: SinkUnit<TInput, E> + 'static,
    F: Fn(PipelineBuilder<E>) -> Result<P, MediatorError> + Send + Sync + 'static,
  {
    self.add_sink_factory::<TInput, E, P, _>(move |provider: &ServiceProvider| build(PipelineBuilder::new(provider.clone())), lifetime)
  }

  pub fn add_sink_default<P, TInput, E>(&mut self, lifetime: Lifetime) -> &mut Self
  where
    TInput: Send + 'static,
    E: Send + 'static,
    P: SinkUnit<TInput, E> + Default + 'static,
  {
    self.add_sink_factory::<TInput, E, P, _>(|_: &ServiceProvider| Ok(P::default()), lifetime)
  }
}
