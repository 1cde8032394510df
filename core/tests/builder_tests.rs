// tests/builder_tests.rs
mod common;

use common::*;
use piped_mediator::{
  CancellationToken, Lifetime, Mediator, MediatorError, PipelineBuilder, ServiceCollection, ServiceProvider,
};
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn handler_services() -> ServiceCollection {
  let mut services = ServiceCollection::new();
  services
    .add_transient(|_: &ServiceProvider| Ok(DoubleHandler))
    .add_transient(|_: &ServiceProvider| Ok(SextupleHandler));
  services
}

#[tokio::test]
#[serial]
async fn test_builder_pipeline_for_every_lifetime() {
  setup_tracing();
  for lifetime in [Lifetime::Singleton, Lifetime::Scoped, Lifetime::Transient] {
    reset_counters();
    let mut services = handler_services();
    services.add_mediator::<MediatorError>(lifetime).add_pipeline_with::<i32, i32, MediatorError, _, _>(
      |builder: PipelineBuilder| {
        Ok(
          builder
            .add_step::<DoubleHandler, i32, i32, _>(|provider| provider.resolve())?
            .add_step::<SextupleHandler, i32, _>(|provider| provider.resolve())?
            .create(),
        )
      },
      lifetime,
    );
    let provider = services.build();
    let scope = provider.create_scope();
    let mediator = scope.resolve::<Mediator>().unwrap();

    let result = mediator.request::<i32, i32>(5, CancellationToken::new()).await;
    assert_eq!(result.unwrap(), 60, "lifetime {}", lifetime);
    assert_eq!(STEP_EXEC_COUNTER.load(Ordering::SeqCst), 2);
  }
}

#[tokio::test]
async fn test_collaborators_resolved_once_at_build_time() {
  setup_tracing();
  let resolutions = Arc::new(AtomicUsize::new(0));
  let counted = Arc::clone(&resolutions);

  let mut services = ServiceCollection::new();
  services.add_transient(move |_: &ServiceProvider| {
    counted.fetch_add(1, Ordering::SeqCst);
    Ok(FakeSquarePipeline)
  });
  let provider = services.build();

  let pipeline = PipelineBuilder::<MediatorError>::new(provider)
    .add_step::<FakeSquarePipeline, i32, i32, _>(|provider| provider.resolve())
    .unwrap()
    .create();
  assert_eq!(resolutions.load(Ordering::SeqCst), 1);

  for n in 1..=3 {
    assert_eq!(pipeline.run(n, CancellationToken::new()).await.unwrap(), n * n);
  }
  assert_eq!(resolutions.load(Ordering::SeqCst), 1);
}

#[test]
fn test_missing_collaborator_fails_while_building() {
  setup_tracing();
  let provider = ServiceCollection::new().build();

  let result = PipelineBuilder::<MediatorError>::new(provider)
    .add_default_step::<FakeSquarePipeline, i32, i32>()
    .add_step::<DoubleHandler, i32, _>(|provider| provider.resolve());

  let Err(err) = result else {
    panic!("Expected the builder to fail for a missing collaborator");
  };
  match err {
    MediatorError::ServiceNotRegistered { service_type } => assert!(service_type.ends_with("DoubleHandler")),
    other => panic!("Expected ServiceNotRegistered, got {:?}", other),
  }
}

#[tokio::test]
async fn test_missing_collaborator_surfaces_through_mediator() {
  setup_tracing();
  let mut services = ServiceCollection::new();
  services.add_pipeline_with::<i32, i32, MediatorError, _, _>(
    |builder: PipelineBuilder| Ok(builder.add_step::<DoubleHandler, i32, i32, _>(|provider| provider.resolve())?.create()),
    Lifetime::Transient,
  );
  let mediator = Mediator::<MediatorError>::new(services.build());

  let err = mediator.request::<i32, i32>(1, CancellationToken::new()).await.unwrap_err();
  assert!(matches!(err, MediatorError::ServiceNotRegistered { .. }), "got {:?}", err);
}

#[tokio::test]
#[serial]
async fn test_default_steps_and_step_count() {
  setup_tracing();
  reset_counters();
  let builder = PipelineBuilder::<MediatorError>::new(ServiceCollection::new().build())
    .add_default_step::<DoubleHandler, i32, i32>()
    .add_default_step::<SextupleHandler, i32>();
  assert_eq!(builder.step_count(), 2);
  assert!(builder.provider().is_root());

  let pipeline = builder.create();
  assert_eq!(pipeline.run(1, CancellationToken::new()).await.unwrap(), 12);
  assert_eq!(STEP_EXEC_COUNTER.load(Ordering::SeqCst), 2);
}

#[tokio::test]
#[serial]
async fn test_builder_ending_in_sink() {
  setup_tracing();
  reset_counters();
  let sink_builder = PipelineBuilder::<MediatorError>::new(handler_services().build())
    .add_step::<DoubleHandler, i32, i32, _>(|provider| provider.resolve())
    .unwrap()
    .add_sink_step::<FakeConsolePipeline, _>(|_| Ok(FakeConsolePipeline))
    .unwrap();
  assert_eq!(sink_builder.step_count(), 2);

  sink_builder.create().run(5, CancellationToken::new()).await.unwrap();
  assert_eq!(*CONSOLE_OUTPUT.lock(), vec![30]);
}

#[tokio::test]
#[serial]
async fn test_single_step_sink_builders() {
  setup_tracing();
  reset_counters();
  let provider = ServiceCollection::new().build();

  let by_default = PipelineBuilder::<MediatorError>::new(provider.clone())
    .add_default_sink_step::<FakeConsolePipeline, i32>()
    .create();
  let by_factory = PipelineBuilder::<MediatorError>::new(provider)
    .add_sink_step::<FakeConsolePipeline, i32, _>(|_| Ok(FakeConsolePipeline))
    .unwrap()
    .create();

  by_default.run(1, CancellationToken::new()).await.unwrap();
  by_factory.run(2, CancellationToken::new()).await.unwrap();
  assert_eq!(*CONSOLE_OUTPUT.lock(), vec![3, 6]);
}

#[tokio::test]
#[serial]
async fn test_sink_registered_with_builder() {
  setup_tracing();
  reset_counters();
  let mut services = handler_services();
  services.add_mediator::<MediatorError>(Lifetime::Scoped).add_sink_with::<i32, MediatorError, _, _>(
    |builder: PipelineBuilder| {
      Ok(
        builder
          .add_step::<DoubleHandler, i32, i32, _>(|provider| provider.resolve())?
          .add_default_sink_step::<FakeConsolePipeline>()
          .create(),
      )
    },
    Lifetime::Singleton,
  );
  let provider = services.build();
  let mediator = provider.resolve::<Mediator>().unwrap();

  mediator.send(5, CancellationToken::new()).await.unwrap();
  mediator.send(7, CancellationToken::new()).await.unwrap();
  assert_eq!(*CONSOLE_OUTPUT.lock(), vec![30, 42]);
}
