// piped_mediator/src/services/provider.rs

//! Defines `ServiceProvider`, the resolution side of the service registry.
//!
//! A provider is either the root (created by `ServiceCollection::build`) or a
//! scope (created by `create_scope`). All providers built from the same
//! collection share the bindings and the singleton cache; each scope has its
//! own scoped cache, and the root acts as its own scope.
//!
//! Caches own the instances they store. A cached service that needs to resolve
//! later (the mediator, for one) must hold a `WeakServiceProvider`, otherwise
//! the cache and the service keep each other alive.

use crate::error::MediatorError;
use crate::services::collection::{AnyService, ServiceDescriptor};
use crate::services::lifetime::Lifetime;

use parking_lot::Mutex;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::{event, Level};

type InstanceCache = Mutex<HashMap<TypeId, AnyService>>;

struct RootServices {
  descriptors: HashMap<TypeId, ServiceDescriptor>,
  singletons: InstanceCache,
  root_scoped: InstanceCache,
}

/// Resolves services registered in a `ServiceCollection`. Cheap to clone; clones
/// share the same scope.
#[derive(Clone)]
pub struct ServiceProvider {
  root: Arc<RootServices>,
  // `None` for the root provider.
  scope: Option<Arc<InstanceCache>>,
}

/// A non-owning handle to a `ServiceProvider`. `upgrade` fails once the scope
/// (or, for a root handle, every provider of the collection) has been dropped.
#[derive(Clone)]
pub struct WeakServiceProvider {
  root: Weak<RootServices>,
  scope: Option<Weak<InstanceCache>>,
}

impl WeakServiceProvider {
  pub fn upgrade(&self) -> Option<ServiceProvider> {
    let root = self.root.upgrade()?;
    let scope = match &self.scope {
      Some(scope) => Some(scope.upgrade()?),
      None => None,
    };
    Some(ServiceProvider { root, scope })
  }
}

impl ServiceProvider {
  pub(crate) fn from_descriptors(descriptors: HashMap<TypeId, ServiceDescriptor>) -> Self {
    Self {
      root: Arc::new(RootServices {
        descriptors,
        singletons: Mutex::new(HashMap::new()),
        root_scoped: Mutex::new(HashMap::new()),
      }),
      scope: None,
    }
  }

  /// Creates a new scope. Scoped services resolved from it are cached per scope
  /// and dropped with it; singletons stay shared with the root.
  pub fn create_scope(&self) -> ServiceProvider {
    event!(Level::TRACE, "Creating service scope.");
    Self {
      root: Arc::clone(&self.root),
      scope: Some(Arc::new(Mutex::new(HashMap::new()))),
    }
  }

  /// The root provider of this provider's collection.
  pub fn root(&self) -> ServiceProvider {
    Self {
      root: Arc::clone(&self.root),
      scope: None,
    }
  }

  pub fn is_root(&self) -> bool {
    self.scope.is_none()
  }

  pub fn downgrade(&self) -> WeakServiceProvider {
    WeakServiceProvider {
      root: Arc::downgrade(&self.root),
      scope: self.scope.as_ref().map(Arc::downgrade),
    }
  }

  pub fn contains<S: 'static>(&self) -> bool {
    self.root.descriptors.contains_key(&TypeId::of::<S>())
  }

  /// Resolves `S`, failing with `ServiceNotRegistered` when no binding exists.
  pub fn resolve<S>(&self) -> Result<S, MediatorError>
  where
    S: Clone + Send + Sync + 'static,
  {
    self.try_resolve::<S>()?.ok_or_else(|| {
      let service_type = std::any::type_name::<S>();
      event!(Level::DEBUG, %service_type, "No binding for requested service.");
      MediatorError::ServiceNotRegistered { service_type }
    })
  }

  /// Resolves `S`, returning `Ok(None)` when no binding exists. Factory failures
  /// are still returned as errors.
  ///
  /// Transient and scoped factories receive this provider. Singleton factories
  /// receive the root provider, whichever scope resolves them first.
  pub fn try_resolve<S>(&self) -> Result<Option<S>, MediatorError>
  where
    S: Clone + Send + Sync + 'static,
  {
    let type_id = TypeId::of::<S>();
    let Some(descriptor) = self.root.descriptors.get(&type_id) else {
      return Ok(None);
    };

    let service = match descriptor.lifetime {
      Lifetime::Transient => descriptor.factory.create(self)?,
      Lifetime::Scoped => Self::cached(self.scoped_cache(), type_id, descriptor, self)?,
      Lifetime::Singleton => Self::cached(&self.root.singletons, type_id, descriptor, &self.root())?,
    };

    downcast_service(service, descriptor)
  }

  fn scoped_cache(&self) -> &InstanceCache {
    match &self.scope {
      Some(scope) => &**scope,
      None => &self.root.root_scoped,
    }
  }

  // The cache lock is never held while the factory runs, so factories may
  // resolve other services. If two callers race, the first stored instance wins.
  fn cached(
    cache: &InstanceCache,
    type_id: TypeId,
    descriptor: &ServiceDescriptor,
    factory_provider: &ServiceProvider,
  ) -> Result<AnyService, MediatorError> {
    let existing = cache.lock().get(&type_id).cloned();
    if let Some(service) = existing {
      return Ok(service);
    }
    let created = descriptor.factory.create(factory_provider)?;
    event!(Level::TRACE, service_type = descriptor.service_type, lifetime = %descriptor.lifetime, "Caching service instance.");
    Ok(Arc::clone(cache.lock().entry(type_id).or_insert(created)))
  }
}

// Bindings are keyed by `TypeId::of::<S>()` and `ServiceCollection::add` only
// accepts factories producing `S`, so a mismatch means a descriptor was stored
// under the wrong key.
fn downcast_service<S>(service: AnyService, descriptor: &ServiceDescriptor) -> Result<Option<S>, MediatorError>
where
  S: Clone + Send + Sync + 'static,
{
  match service.downcast_ref::<S>() {
    Some(typed) => Ok(Some(typed.clone())),
    None => {
      let expected_type = std::any::type_name::<S>();
      event!(Level::ERROR, %expected_type, stored_type = descriptor.service_type, "Resolved service type mismatch.");
      Err(MediatorError::TypeMismatch { expected_type })
    }
  }
}

impl std::fmt::Debug for ServiceProvider {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ServiceProvider")
      .field("services", &self.root.descriptors.len())
      .field("is_root", &self.is_root())
      .finish()
  }
}

impl std::fmt::Debug for WeakServiceProvider {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WeakServiceProvider")
      .field("is_root", &self.scope.is_none())
      .field("alive", &(self.root.strong_count() > 0))
      .finish()
  }
}
