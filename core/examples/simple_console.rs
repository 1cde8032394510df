// piped_mediator/examples/simple_console.rs

use piped_mediator::{pipe, pipe_sink, CancellationToken, Mediator, MediatorConfig, MediatorError, ServiceCollection};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), MediatorError> {
  // RUST_LOG=piped_mediator=debug shows resolution and dispatch events.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  info!("--- Simple Console Example ---");

  // Lifetimes come from PIPED_MEDIATOR_PIPELINE_LIFETIME / PIPED_MEDIATOR_MEDIATOR_LIFETIME.
  let config = MediatorConfig::from_env()?;
  info!(pipeline_lifetime = %config.pipeline_lifetime, mediator_lifetime = %config.mediator_lifetime, "Configuration loaded.");

  // 1. A type-changing chain: String -> f64 -> f64 -> String.
  let describe = pipe(|raw: String, _cancel: CancellationToken| async move {
    let value: f64 = raw.trim().parse().map_err(anyhow::Error::from)?;
    Ok::<_, MediatorError>(value)
  })
  .then(|value: f64, _cancel| async move { Ok(value * 3.0) })
  .then(|value: f64, _cancel| async move { Ok(format!("tripled: {}", value)) });

  // 2. A sink: consumes an i32 and writes it out.
  let console = pipe_sink(|n: i32, _cancel: CancellationToken| async move {
    info!("console received {}", n);
    Ok::<_, MediatorError>(())
  });

  // 3. Register both plus the mediator.
  let mut services = ServiceCollection::new();
  services
    .add_mediator::<MediatorError>(config.mediator_lifetime)
    .add_pipeline::<String, String, MediatorError, _>(describe, config.pipeline_lifetime)
    .add_sink::<i32, MediatorError, _>(console, config.pipeline_lifetime);
  let provider = services.build();

  // 4. Dispatch by type.
  let mediator = provider.resolve::<Mediator>()?;
  let cancel = CancellationToken::new();

  let described = mediator.request::<String, String>("3.0".to_string(), cancel.clone()).await?;
  info!("request returned '{}'", described);

  mediator.send(65, cancel.clone()).await?;

  // Nothing is registered for (i32 -> String).
  match mediator.request::<i32, String>(1, cancel).await {
    Err(err) => info!("expected failure: {}", err),
    Ok(value) => info!("unexpected value: {}", value),
  }

  info!("--- Simple Console Example Finished ---");
  Ok(())
}
