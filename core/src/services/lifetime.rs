// piped_mediator/src/services/lifetime.rs

use crate::error::MediatorError;
use std::fmt;
use std::str::FromStr;

/// How long a resolved service instance lives.
///
/// The numeric values (`Singleton = 0`, `Scoped = 1`, `Transient = 2`) are the
/// ones accepted by `TryFrom<u8>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
  /// One instance for the provider and every scope created from it.
  Singleton,
  /// One instance per scope. Resolving from the root provider uses the root scope.
  Scoped,
  /// A new instance on every resolve.
  #[default]
  Transient,
}

impl Lifetime {
  pub fn as_str(&self) -> &'static str {
    match self {
      Lifetime::Singleton => "singleton",
      Lifetime::Scoped => "scoped",
      Lifetime::Transient => "transient",
    }
  }
}

impl fmt::Display for Lifetime {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Lifetime {
  type Err = MediatorError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.trim().to_ascii_lowercase().as_str() {
      "singleton" => Ok(Lifetime::Singleton),
      "scoped" => Ok(Lifetime::Scoped),
      "transient" => Ok(Lifetime::Transient),
      _ => Err(MediatorError::InvalidLifetimePolicy {
        value: value.to_string(),
      }),
    }
  }
}

impl TryFrom<u8> for Lifetime {
  type Error = MediatorError;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0 => Ok(Lifetime::Singleton),
      1 => Ok(Lifetime::Scoped),
      2 => Ok(Lifetime::Transient),
      other => Err(MediatorError::InvalidLifetimePolicy {
        value: other.to_string(),
      }),
    }
  }
}
