// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use piped_mediator::{CancellationToken, MediatorError, PipelineUnit, SinkUnit};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Level;

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)] // Clone, PartialEq, Eq for assertions
pub enum TestError {
  #[error("Mediator error: {0}")]
  Mediator(String), // Stored as String for Eq comparison

  #[error("Test step failed: {0}")]
  Step(String),

  #[error("Test step canceled")]
  Canceled,
}

impl From<MediatorError> for TestError {
  fn from(err: MediatorError) -> Self {
    match err {
      MediatorError::Canceled => TestError::Canceled,
      other => TestError::Mediator(format!("{:?}", other)),
    }
  }
}

// --- Fake pipelines ---

/// Writes `input * 3` to `CONSOLE_OUTPUT`. Tests using it must be `#[serial]`.
#[derive(Clone, Debug, Default)]
pub struct FakeConsolePipeline;

#[async_trait]
impl SinkUnit<i32> for FakeConsolePipeline {
  async fn execute(&self, input: i32, _cancel: CancellationToken) -> Result<(), MediatorError> {
    tracing::debug!(target: "test_pipelines", input, "fake console writing");
    CONSOLE_OUTPUT.lock().push(input * 3);
    Ok(())
  }
}

#[derive(Clone, Debug, Default)]
pub struct FakeSquarePipeline;

#[async_trait]
impl PipelineUnit<i32, i32> for FakeSquarePipeline {
  async fn execute(&self, input: i32, _cancel: CancellationToken) -> Result<i32, MediatorError> {
    Ok(input * input)
  }
}

// Collaborators pulled from the registry by builder tests.
#[derive(Clone, Debug, Default)]
pub struct DoubleHandler;

#[async_trait]
impl PipelineUnit<i32, i32> for DoubleHandler {
  async fn execute(&self, input: i32, _cancel: CancellationToken) -> Result<i32, MediatorError> {
    STEP_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
    Ok(input * 2)
  }
}

#[derive(Clone, Debug, Default)]
pub struct SextupleHandler;

#[async_trait]
impl PipelineUnit<i32, i32> for SextupleHandler {
  async fn execute(&self, input: i32, _cancel: CancellationToken) -> Result<i32, MediatorError> {
    STEP_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
    Ok(input * 6)
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Shared state for checking side effects ---
pub static CONSOLE_OUTPUT: Lazy<Mutex<Vec<i32>>> = Lazy::new(|| Mutex::new(Vec::new()));
pub static STEP_EXEC_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn reset_counters() {
  CONSOLE_OUTPUT.lock().clear();
  STEP_EXEC_COUNTER.store(0, Ordering::SeqCst);
}
