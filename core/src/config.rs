// piped_mediator/src/config.rs

//! Lifetime configuration for mediator and pipeline registrations.

use crate::error::MediatorResult;
use crate::services::Lifetime;
use std::env;

pub const PIPELINE_LIFETIME_VAR: &str = "PIPED_MEDIATOR_PIPELINE_LIFETIME";
pub const MEDIATOR_LIFETIME_VAR: &str = "PIPED_MEDIATOR_MEDIATOR_LIFETIME";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MediatorConfig {
  /// Lifetime used when registering pipelines and sinks.
  pub pipeline_lifetime: Lifetime,
  /// Lifetime used when registering the mediator itself.
  pub mediator_lifetime: Lifetime,
}

impl MediatorConfig {
  /// Reads both lifetimes from the process environment. Unset variables fall
  /// back to `transient`; unrecognised values fail with `InvalidLifetimePolicy`.
  pub fn from_env() -> MediatorResult<Self> {
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Same as `from_env`, reading values through `lookup`.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> MediatorResult<Self> {
    let read = |var_name: &str| -> MediatorResult<Lifetime> {
      match lookup(var_name) {
        Some(raw) => raw.parse::<Lifetime>().map_err(|err| {
          tracing::error!(%var_name, value = %raw, "Invalid lifetime in configuration.");
          err
        }),
        None => Ok(Lifetime::default()),
      }
    };

    let config = Self {
      pipeline_lifetime: read(PIPELINE_LIFETIME_VAR)?,
      mediator_lifetime: read(MEDIATOR_LIFETIME_VAR)?,
    };
    tracing::debug!(pipeline_lifetime = %config.pipeline_lifetime, mediator_lifetime = %config.mediator_lifetime, "Mediator configuration loaded.");
    Ok(config)
  }

  pub fn with_pipeline_lifetime(mut self, lifetime: Lifetime) -> Self {
    self.pipeline_lifetime = lifetime;
    self
  }

  pub fn with_mediator_lifetime(mut self, lifetime: Lifetime) -> Self {
    self.mediator_lifetime = lifetime;
    self
  }
}

