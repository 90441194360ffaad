/// 嵌套事务示例
/// 展示事件在最外层提交后才被投递，以及子事务回滚只丢弃自身排队的事件
use anyhow::Result as AnyResult;
use std::sync::Arc;
use tx_events::{
    EventBus, EventRef, FnListener, InMemoryEventBus, Payload, TransactionalDispatcher,
    UnitOfWork,
};

#[tokio::main]
async fn main() -> AnyResult<()> {
    let inner: Arc<dyn EventBus> = Arc::new(InMemoryEventBus::new());
    let dispatcher = TransactionalDispatcher::with_policy(inner, Default::default());
    dispatcher.set_include_patterns(["billing"]);
    dispatcher.set_exclude_patterns(["tx_events::lifecycle"]);

    dispatcher.listen(
        "billing.*",
        Arc::new(FnListener::new("printer", |event: &EventRef, payload: &Payload| {
            println!("delivered {event} {payload}");
            Ok(None)
        })),
    );

    let uow = UnitOfWork::new(Arc::new(dispatcher.clone()));

    uow.begin().await?;
    dispatcher
        .dispatch("billing.invoice_created".into(), serde_json::json!({"id": 1}), false)
        .await?;

    uow.begin().await?;
    dispatcher
        .dispatch("billing.discount_applied".into(), serde_json::json!({"id": 1}), false)
        .await?;
    uow.rollback().await?;

    uow.begin().await?;
    dispatcher
        .dispatch("billing.invoice_sent".into(), serde_json::json!({"id": 1}), false)
        .await?;
    uow.commit().await?;

    println!(
        "before outermost commit: depth={}, nothing delivered yet",
        dispatcher.transaction_depth()
    );
    uow.commit().await?;
    println!("after commit: depth={}", dispatcher.transaction_depth());

    Ok(())
}
