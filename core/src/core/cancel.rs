// piped_mediator/src/core/cancel.rs

//! The cancellation signal shared by every step of one pipeline invocation.
//!
//! The signal is a `tokio_util` token. Each step receives a clone of the token
//! the caller passed in; clones share one cancellation state, so cancelling the
//! caller's token is observed by whichever step is running. The pipeline algebra
//! never creates, narrows or replaces the token.

use crate::error::MediatorError;

pub use tokio_util::sync::CancellationToken;

/// Cooperative check for steps: fails with `MediatorError::Canceled` once the
/// token has been cancelled.
pub fn ensure_active(cancel: &CancellationToken) -> Result<(), MediatorError> {
  if cancel.is_cancelled() {
    tracing::event!(tracing::Level::DEBUG, "Cancellation observed by step.");
    return Err(MediatorError::Canceled);
  }
  Ok(())
}
