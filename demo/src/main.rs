use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tx_events::{
    Event, EventBus, EventError, EventRef, FnListener, InMemoryEventBus, Payload,
    TransactionalDispatcher, TransactionalEventsConfig, UnitOfWork,
};

mod app {
    pub mod events {
        use tx_events::Event;

        #[derive(Debug, Event)]
        #[event(name = "app::events::OrderPlaced")]
        pub struct OrderPlaced {
            pub order_id: u64,
            pub amount: i64,
        }
    }
}

use app::events::OrderPlaced;

#[derive(Debug, thiserror::Error)]
enum CheckoutError {
    #[error("insufficient stock for order {0}")]
    OutOfStock(u64),
    #[error(transparent)]
    Events(#[from] EventError),
}

async fn checkout(
    uow: &UnitOfWork,
    bus: &Arc<dyn EventBus>,
    order_id: u64,
    amount: i64,
    in_stock: bool,
) -> Result<(), CheckoutError> {
    uow.run(move || async move {
        info!(order_id, "writing order rows");
        let outcome = bus
            .dispatch(
                EventRef::object(OrderPlaced { order_id, amount }),
                serde_json::json!({ "channel": "web" }),
                false,
            )
            .await?;
        info!(order_id, deferred = outcome.is_deferred(), "order event dispatched");

        // 审计事件不在 include 范围内，立即投递
        bus.dispatch("audit::checkout".into(), Payload::Null, false)
            .await?;

        if !in_stock {
            return Err(CheckoutError::OutOfStock(order_id));
        }
        Ok::<(), CheckoutError>(())
    })
    .await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tx_events=debug")),
        )
        .init();

    let config = match std::env::var("TX_EVENTS_CONFIG") {
        Ok(path) => TransactionalEventsConfig::from_path(path)?,
        Err(_) => TransactionalEventsConfig::default(),
    };
    info!(include = ?config.include, exclude = ?config.exclude, "loaded config");

    let inner: Arc<dyn EventBus> = Arc::new(InMemoryEventBus::new());
    let bus: Arc<dyn EventBus> = Arc::new(TransactionalDispatcher::new(inner, &config));

    bus.listen(
        OrderPlaced { order_id: 0, amount: 0 }.event_name(),
        Arc::new(FnListener::new("send_confirmation", |event: &EventRef, _: &Payload| {
            if let Some(order) = event.downcast_ref::<OrderPlaced>() {
                info!(order_id = order.order_id, amount = order.amount, "confirmation email sent");
            }
            Ok(None)
        })),
    );
    bus.listen(
        "audit::*",
        Arc::new(FnListener::new("audit_log", |event: &EventRef, _: &Payload| {
            info!(event = %event, "audit entry written");
            Ok(None)
        })),
    );

    let uow = UnitOfWork::new(bus.clone());

    checkout(&uow, &bus, 1001, 4200, true).await?;

    match checkout(&uow, &bus, 1002, 990, false).await {
        Err(CheckoutError::OutOfStock(order_id)) => {
            info!(order_id, "checkout rolled back, confirmation discarded")
        }
        other => other?,
    }

    Ok(())
}
