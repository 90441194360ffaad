//! 事务生命周期通知、工作单元（UnitOfWork）与 `transaction` 辅助函数
//!
//! 事务性资源（如数据库连接）在每一层事务开启、提交、回滚时向总线分发对应通知，
//! `TransactionalDispatcher` 订阅这些通知来驱动事务栈。
//!
//! 通知名称共享前缀 `LIFECYCLE_NAMESPACE`，默认配置将其排除在事务延迟之外：
//! 生命周期通知自身绝不能被延迟，否则嵌套事务的开启/提交会被吞进父帧。
//!
use crate::error::{EventError, EventResult as Result};
use crate::event::{Event, EventRef, Payload};
use crate::eventing::EventBus;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

/// 生命周期通知名称的公共前缀
pub const LIFECYCLE_NAMESPACE: &str = "tx_events::lifecycle";

/// 事务开启
#[derive(Clone, Copy, Debug, Default)]
pub struct TransactionBeginning;

/// 事务提交
#[derive(Clone, Copy, Debug, Default)]
pub struct TransactionCommitted;

/// 事务回滚
#[derive(Clone, Copy, Debug, Default)]
pub struct TransactionRolledBack;

impl TransactionBeginning {
    pub const NAME: &'static str = "tx_events::lifecycle::TransactionBeginning";
}

impl TransactionCommitted {
    pub const NAME: &'static str = "tx_events::lifecycle::TransactionCommitted";
}

impl TransactionRolledBack {
    pub const NAME: &'static str = "tx_events::lifecycle::TransactionRolledBack";
}

impl Event for TransactionBeginning {
    fn event_name(&self) -> &str {
        Self::NAME
    }
}

impl Event for TransactionCommitted {
    fn event_name(&self) -> &str {
        Self::NAME
    }
}

impl Event for TransactionRolledBack {
    fn event_name(&self) -> &str {
        Self::NAME
    }
}

/// 工作单元：代表一个事务性资源，在事务边界上分发生命周期通知
///
/// 每次 `begin` 对应一层嵌套事务；`run` 包裹一段业务逻辑，成功则提交，失败则回滚。
#[derive(Clone)]
pub struct UnitOfWork {
    bus: Arc<dyn EventBus>,
}

impl UnitOfWork {
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self { bus }
    }

    pub async fn begin(&self) -> Result<()> {
        self.notify(EventRef::object(TransactionBeginning)).await
    }

    /// 提交；提交时重放的监听器错误会从这里返回
    pub async fn commit(&self) -> Result<()> {
        self.notify(EventRef::object(TransactionCommitted)).await
    }

    pub async fn rollback(&self) -> Result<()> {
        self.notify(EventRef::object(TransactionRolledBack)).await
    }

    /// 在一层事务内执行 `body`
    ///
    /// - `body` 返回 `Ok` 时提交，提交失败（重放中监听器出错）作为错误返回；
    /// - `body` 返回 `Err` 时回滚，并原样返回该错误。
    pub async fn run<F, Fut, T, E>(&self, body: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: From<EventError>,
    {
        self.begin().await?;

        match body().await {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.rollback().await {
                    warn!(error = %rollback_err, "rollback notification failed");
                }
                Err(err)
            }
        }
    }

    async fn notify(&self, event: EventRef) -> Result<()> {
        self.bus.dispatch(event, Payload::Null, false).await?;
        Ok(())
    }
}

/// 在总线上以一层事务执行 `body`，等价于 `UnitOfWork::new(bus).run(body)`
pub async fn transaction<F, Fut, T, E>(
    bus: Arc<dyn EventBus>,
    body: F,
) -> std::result::Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: From<EventError>,
{
    UnitOfWork::new(bus).run(body).await
}
