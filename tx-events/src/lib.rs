//! 事务性事件分发（tx-events）
//!
//! 在事件生产者与监听器之间插入一个总线装饰器：事务开启期间分发的"事务性"事件
//! 会被暂存，直到外层工作单元提交后才真正投递；若工作单元回滚，则静默丢弃。
//!
//! - 模式匹配（`pattern`）：前缀或 `*` 通配；
//! - 资格判定（`policy`）：exclude 优先，其次 include，事件也可自声明为事务性；
//! - 事务栈（`stack`）：每层嵌套事务一帧，提交时冲刷、回滚时丢弃；
//! - 调度器（`eventing::TransactionalDispatcher`）：对调用方透明地替换底层总线；
//! - 生命周期（`lifecycle`）：事务开启/提交/回滚通知与 `UnitOfWork`。
//!
//! 典型用法：
//! 1. 构建底层总线（如 `InMemoryEventBus`）并注册业务监听器；
//! 2. 读取 `TransactionalEventsConfig`，以其包裹底层总线得到 `TransactionalDispatcher`；
//! 3. 将调度器作为 `Arc<dyn EventBus>` 注入生产者与事务性资源（`UnitOfWork`）。
//!
pub mod config;
pub mod error;
pub mod event;
pub mod eventing;
pub mod lifecycle;
pub mod pattern;
pub mod policy;
pub mod stack;

pub use config::TransactionalEventsConfig;
pub use error::{EventError, EventResult};
pub use event::{Event, EventRef, Payload};
pub use eventing::{
    DispatchOutcome, EventBus, EventListener, FnListener, InMemoryEventBus,
    TransactionalDispatcher,
};
pub use lifecycle::{
    LIFECYCLE_NAMESPACE, TransactionBeginning, TransactionCommitted, TransactionRolledBack,
    UnitOfWork, transaction,
};
pub use pattern::EventPattern;
pub use policy::EligibilityPolicy;
pub use stack::{QueuedDispatch, TransactionFrame, TransactionStack};

#[cfg(feature = "derive")]
pub use tx_events_macros::Event;

// 允许在本 crate 内部通过 ::tx_events 进行自引用，
// 以便派生宏在本 crate 的单元测试中也能解析到 ::tx_events 路径。
extern crate self as tx_events;
