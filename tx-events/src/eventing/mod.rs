//! 事件子系统（eventing）
//!
//! - `EventBus`：注册监听器与分发事件的统一协议；
//! - `EventListener`：处理一次分发的监听器；
//! - `InMemoryEventBus`：进程内参考实现；
//! - `TransactionalDispatcher`：按事务边界延迟/丢弃事件的总线装饰器。
//!
pub mod bus;
pub mod bus_inmemory;
pub mod dispatcher;
pub mod listener;

pub use bus::{DispatchOutcome, EventBus};
pub use bus_inmemory::InMemoryEventBus;
pub use dispatcher::TransactionalDispatcher;
pub use listener::{EventListener, FnListener};
