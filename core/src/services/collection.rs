// piped_mediator/src/services/collection.rs

//! Defines `ServiceCollection`, the registration side of the service registry.
//! Bindings are keyed by the `TypeId` of the service type `S`; `S` is usually an
//! `Arc<dyn Trait>` such as `PipelineRef<I, O, E>`.

use crate::error::MediatorError;
use crate::services::lifetime::Lifetime;
use crate::services::provider::ServiceProvider;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, Level};

/// A type-erased service instance as stored in the singleton and scoped caches.
pub(crate) type AnyService = Arc<dyn Any + Send + Sync>;

/// Type-erased factory so bindings for different `S` can share one map.
pub(crate) trait AnyServiceFactory: Send + Sync {
  fn create(&self, provider: &ServiceProvider) -> Result<AnyService, MediatorError>;
}

/// Wraps a user factory `Fn(&ServiceProvider) -> Result<S, MediatorError>`.
pub(crate) struct TypedFactory<S, F>
where
  S: Clone + Send + Sync + 'static,
  F: Fn(&ServiceProvider) -> Result<S, MediatorError> + Send + Sync + 'static,
{
  pub(crate) factory: F,
  pub(crate) _phantom_service: PhantomData<fn() -> S>,
}

impl<S, F> AnyServiceFactory for TypedFactory<S, F>
where
  S: Clone + Send + Sync + 'static,
  F: Fn(&ServiceProvider) -> Result<S, MediatorError> + Send + Sync + 'static,
{
  fn create(&self, provider: &ServiceProvider) -> Result<AnyService, MediatorError> {
    let service = (self.factory)(provider)?;
    Ok(Arc::new(service))
  }
}

/// A single binding: service type name, lifetime and factory.
pub(crate) struct ServiceDescriptor {
  pub(crate) service_type: &'static str,
  pub(crate) lifetime: Lifetime,
  pub(crate) factory: Arc<dyn AnyServiceFactory>,
}

impl std::fmt::Debug for ServiceDescriptor {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ServiceDescriptor")
      .field("service_type", &self.service_type)
      .field("lifetime", &self.lifetime)
      .finish()
  }
}

/// Collects service bindings before building a `ServiceProvider`.
///
/// Registering a second binding for the same service type replaces the first.
#[derive(Default, Debug)]
pub struct ServiceCollection {
  pub(crate) descriptors: HashMap<TypeId, ServiceDescriptor>,
}

impl ServiceCollection {
  pub fn new() -> Self {
    Self::default()
  }

  /// Binds service type `S` to `factory` with the given lifetime.
  pub fn add<S, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
  where
    S: Clone + Send + Sync + 'static,
    F: Fn(&ServiceProvider) -> Result<S, MediatorError> + Send + Sync + 'static,
  {
    let service_type = std::any::type_name::<S>();
    let descriptor = ServiceDescriptor {
      service_type,
      lifetime,
      factory: Arc::new(TypedFactory {
        factory,
        _phantom_service: PhantomData,
      }),
    };
    if let Some(previous) = self.descriptors.insert(TypeId::of::<S>(), descriptor) {
      event!(
        Level::WARN,
        %service_type,
        previous_lifetime = %previous.lifetime,
        %lifetime,
        "Service binding replaced; the last registration wins."
      );
    } else {
      event!(Level::DEBUG, %service_type, %lifetime, "Service registered.");
    }
    self
  }

  pub fn add_transient<S, F>(&mut self, factory: F) -> &mut Self
  where
    S: Clone + Send + Sync + 'static,
    F: Fn(&ServiceProvider) -> Result<S, MediatorError> + Send + Sync + 'static,
  {
    self.add(Lifetime::Transient, factory)
  }

  pub fn add_scoped<S, F>(&mut self, factory: F) -> &mut Self
  where
    S: Clone + Send + Sync + 'static,
    F: Fn(&ServiceProvider) -> Result<S, MediatorError> + Send + Sync + 'static,
  {
    self.add(Lifetime::Scoped, factory)
  }

  pub fn add_singleton<S, F>(&mut self, factory: F) -> &mut Self
  where
    S: Clone + Send + Sync + 'static,
    F: Fn(&ServiceProvider) -> Result<S, MediatorError> + Send + Sync + 'static,
  {
    self.add(Lifetime::Singleton, factory)
  }

  /// Binds an existing instance. Every resolve returns a clone of it.
  pub fn add_instance<S>(&mut self, instance: S) -> &mut Self
  where
    S: Clone + Send + Sync + 'static,
  {
    self.add(Lifetime::Singleton, move |_| Ok(instance.clone()))
  }

  pub fn contains<S: 'static>(&self) -> bool {
    self.descriptors.contains_key(&TypeId::of::<S>())
  }

  pub fn len(&self) -> usize {
    self.descriptors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.descriptors.is_empty()
  }

  /// Freezes the bindings into a root `ServiceProvider`.
  pub fn build(self) -> ServiceProvider {
    event!(Level::DEBUG, services = self.descriptors.len(), "Building service provider.");
    ServiceProvider::from_descriptors(self.descriptors)
  }
}
