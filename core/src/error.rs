// piped_mediator/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediatorError {
  /// No pipeline is bound for the requested (input, output) type pair.
  #[error("No pipeline registered for input '{input_type}' and output '{output_type}'")]
  HandlerNotRegistered {
    input_type: &'static str,
    output_type: &'static str,
  },

  /// A raw lifetime value (string or number) is not one of transient, scoped or singleton.
  #[error("Invalid service lifetime policy: '{value}'")]
  InvalidLifetimePolicy { value: String },

  /// A step's own logic failed.
  #[error("Pipeline step failed. Source: {source}")]
  StepFailure {
    #[source]
    source: AnyhowError,
  },

  /// A step observed the cancellation signal and aborted.
  #[error("Pipeline execution was canceled")]
  Canceled,

  #[error("Service not registered: {service_type}")]
  ServiceNotRegistered { service_type: &'static str },

  /// A cached service outlived the scope (or provider) it was resolved from.
  #[error("Service provider dropped; the scope this {service_type} was resolved from no longer exists")]
  ProviderDropped { service_type: &'static str },

  #[error("Type mismatch while resolving service (expected {expected_type})")]
  TypeMismatch { expected_type: &'static str },
}

impl MediatorError {
  pub fn is_canceled(&self) -> bool {
    matches!(self, MediatorError::Canceled)
  }
}

// Lets steps written against anyhow::Result use `?` directly.
impl From<AnyhowError> for MediatorError {
  fn from(err: AnyhowError) -> Self {
    // An anyhow::Error that already wraps a MediatorError keeps its variant.
    match err.downcast::<MediatorError>() {
      Ok(inner) => inner,
      Err(source) => MediatorError::StepFailure { source },
    }
  }
}

pub type MediatorResult<T, E = MediatorError> = std::result::Result<T, E>;
