// piped_mediator/examples/builder_collaborators.rs

use async_trait::async_trait;
use piped_mediator::{
  ensure_active, CancellationToken, Lifetime, Mediator, MediatorError, PipelineBuilder, PipelineUnit, ServiceCollection,
  ServiceProvider,
};
use std::sync::Arc;
use tracing::info;

// 1. An application error type. The mediator reports lookup failures through `From<MediatorError>`.
#[derive(Debug, thiserror::Error)]
enum AppError {
  #[error("Mediator: {0}")]
  Mediator(#[from] MediatorError),
  #[error("Order rejected: {0}")]
  Rejected(String),
}

// 2. A collaborator that lives in the registry.
struct TaxTable {
  rate_percent: u64,
}

#[derive(Debug)]
struct Order {
  net_cents: u64,
}

// 3. Steps implemented as structs.
struct ValidateOrder;

#[async_trait]
impl PipelineUnit<Order, Order, AppError> for ValidateOrder {
  async fn execute(&self, order: Order, cancel: CancellationToken) -> Result<Order, AppError> {
    ensure_active(&cancel)?;
    if order.net_cents == 0 {
      return Err(AppError::Rejected("empty order".to_string()));
    }
    Ok(order)
  }
}

struct ApplyTax {
  table: Arc<TaxTable>,
}

#[async_trait]
impl PipelineUnit<Order, u64, AppError> for ApplyTax {
  async fn execute(&self, order: Order, _cancel: CancellationToken) -> Result<u64, AppError> {
    Ok(order.net_cents + order.net_cents * self.table.rate_percent / 100)
  }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Builder Collaborators Example ---");

  let mut services = ServiceCollection::new();
  services
    .add_instance(Arc::new(TaxTable { rate_percent: 20 }))
    .add_mediator::<AppError>(Lifetime::Scoped)
    .add_pipeline_with::<Order, u64, AppError, _, _>(
      |builder: PipelineBuilder<AppError>| {
        Ok(
          builder
            .add_step::<ValidateOrder, Order, Order, _>(|_| Ok(ValidateOrder))?
            .add_step::<ApplyTax, u64, _>(|provider: &ServiceProvider| {
              Ok(ApplyTax {
                table: provider.resolve::<Arc<TaxTable>>()?,
              })
            })?
            .create(),
        )
      },
      Lifetime::Scoped,
    );
  let provider = services.build();

  // One scope per unit of work.
  let scope = provider.create_scope();
  let mediator = scope.resolve::<Mediator<AppError>>()?;

  let total = mediator.request::<Order, u64>(Order { net_cents: 1_000 }, CancellationToken::new()).await?;
  info!("total with tax: {} cents", total);

  match mediator.request::<Order, u64>(Order { net_cents: 0 }, CancellationToken::new()).await {
    Err(err) => info!("rejected as expected: {}", err),
    Ok(total) => info!("unexpected total: {}", total),
  }

  info!("--- Builder Collaborators Example Finished ---");
  Ok(())
}
