//! 事务性事件调度器（TransactionalDispatcher）
//!
//! 包裹一个底层 `EventBus`，对调用方暴露同样的协议，只改变分发路径：
//! - `halt` 分发总是立即转发（调用方需要同步拿到返回值）；
//! - 有事务开启且事件符合资格时，记录到栈顶事务帧并返回 `Deferred`；
//! - 其余情况立即转发到底层总线。
//!
//! 构造时在底层总线上订阅三种事务生命周期通知：
//! - 开启：压入新帧；
//! - 提交：先弹出栈顶帧，再按原始顺序经由本调度器重放（父事务仍开启时会再次延迟到父帧）；
//! - 回滚：弹出并丢弃栈顶帧。
//!
//! 事务栈由互斥锁保护，"检查是否开启 + 追加" 在同一临界区内完成，且不跨越 await。
//! 若多个互不相关的执行流并发地开启/提交事务，应各自持有独立的调度器实例。

use super::{DispatchOutcome, EventBus, EventListener};
use crate::config::TransactionalEventsConfig;
use crate::error::EventResult as Result;
use crate::event::{EventRef, Payload};
use crate::lifecycle::{TransactionBeginning, TransactionCommitted, TransactionRolledBack};
use crate::pattern::EventPattern;
use crate::policy::EligibilityPolicy;
use crate::stack::{QueuedDispatch, TransactionStack};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use tracing::{debug, trace, warn};

/// 事务性事件调度器
#[derive(Clone)]
pub struct TransactionalDispatcher {
    shared: Arc<Shared>,
}

impl TransactionalDispatcher {
    /// 以配置中的 include/exclude 列表构建调度器
    pub fn new(bus: Arc<dyn EventBus>, config: &TransactionalEventsConfig) -> Self {
        Self::with_policy(bus, config.policy())
    }

    pub fn with_policy(bus: Arc<dyn EventBus>, policy: EligibilityPolicy) -> Self {
        let shared = Arc::new(Shared {
            bus,
            stack: Mutex::new(TransactionStack::new()),
            policy: RwLock::new(policy),
        });
        Shared::register_listeners(&shared);
        Self { shared }
    }

    /// 整体替换 include 列表（不应与进行中的分发并发调用）
    pub fn set_include_patterns<P: Into<EventPattern>>(
        &self,
        patterns: impl IntoIterator<Item = P>,
    ) {
        let mut policy = self.shared.write_policy();
        policy.set_include(patterns);
        if lifecycle_deferrable(&policy) {
            warn!("include patterns now cover lifecycle notifications");
        }
    }

    /// 整体替换 exclude 列表（不应与进行中的分发并发调用）
    ///
    /// 新列表应保留 `LIFECYCLE_NAMESPACE`：生命周期通知一旦符合资格，
    /// 事务内开启的嵌套事务、提交通知都会被当作普通事件延迟到父帧。
    pub fn set_exclude_patterns<P: Into<EventPattern>>(
        &self,
        patterns: impl IntoIterator<Item = P>,
    ) {
        let mut policy = self.shared.write_policy();
        policy.set_exclude(patterns);
        if lifecycle_deferrable(&policy) {
            warn!("exclude patterns no longer cover lifecycle notifications");
        }
    }

    /// 当前规则集的快照
    pub fn policy(&self) -> EligibilityPolicy {
        self.shared.read_policy().clone()
    }

    /// 当前事务嵌套深度
    pub fn transaction_depth(&self) -> usize {
        self.shared.lock_stack().depth()
    }

    pub fn is_transaction_open(&self) -> bool {
        self.shared.lock_stack().is_open()
    }

    /// 被包裹的底层总线
    pub fn inner(&self) -> &Arc<dyn EventBus> {
        &self.shared.bus
    }
}

#[async_trait]
impl EventBus for TransactionalDispatcher {
    async fn dispatch(
        &self,
        event: EventRef,
        payload: Payload,
        halt: bool,
    ) -> Result<DispatchOutcome> {
        self.shared.dispatch(event, payload, halt).await
    }

    fn listen(&self, pattern: &str, listener: Arc<dyn EventListener>) {
        self.shared.bus.listen(pattern, listener);
    }

    fn forget(&self, pattern: &str) {
        self.shared.bus.forget(pattern);
    }

    fn has_listeners(&self, event_name: &str) -> bool {
        self.shared.bus.has_listeners(event_name)
    }
}

// 任一生命周期通知按名称符合资格即为误配置
fn lifecycle_deferrable(policy: &EligibilityPolicy) -> bool {
    [
        TransactionBeginning::NAME,
        TransactionCommitted::NAME,
        TransactionRolledBack::NAME,
    ]
    .into_iter()
    .any(|name| policy.is_eligible_name(name))
}

enum Route {
    Deferred,
    Forward(EventRef, Payload),
}

struct Shared {
    bus: Arc<dyn EventBus>,
    stack: Mutex<TransactionStack>,
    policy: RwLock<EligibilityPolicy>,
}

impl Shared {
    fn register_listeners(this: &Arc<Self>) {
        for (name, kind) in [
            (TransactionBeginning::NAME, Lifecycle::Begin),
            (TransactionCommitted::NAME, Lifecycle::Commit),
            (TransactionRolledBack::NAME, Lifecycle::Rollback),
        ] {
            let listener = LifecycleListener {
                kind,
                shared: Arc::downgrade(this),
            };
            this.bus.listen(name, Arc::new(listener));
        }
    }

    fn lock_stack(&self) -> MutexGuard<'_, TransactionStack> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_policy(&self) -> std::sync::RwLockReadGuard<'_, EligibilityPolicy> {
        self.policy.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_policy(&self) -> std::sync::RwLockWriteGuard<'_, EligibilityPolicy> {
        self.policy.write().unwrap_or_else(PoisonError::into_inner)
    }

    async fn dispatch(
        &self,
        event: EventRef,
        payload: Payload,
        halt: bool,
    ) -> Result<DispatchOutcome> {
        if halt {
            return self.bus.dispatch(event, payload, true).await;
        }

        match self.route(event, payload)? {
            Route::Deferred => Ok(DispatchOutcome::Deferred),
            Route::Forward(event, payload) => {
                trace!(event = %event, "dispatching immediately");
                self.bus.dispatch(event, payload, false).await
            }
        }
    }

    // 事务开启且事件符合资格时追加到栈顶帧，否则原样交还
    fn route(&self, event: EventRef, payload: Payload) -> Result<Route> {
        if !self.read_policy().is_eligible(&event) {
            return Ok(Route::Forward(event, payload));
        }

        let mut stack = self.lock_stack();
        if !stack.is_open() {
            return Ok(Route::Forward(event, payload));
        }

        let name = event.name().to_string();
        stack.enqueue(QueuedDispatch::new(event, payload))?;
        debug!(
            event = %name,
            depth = stack.depth(),
            pending = stack.pending(),
            "event deferred until commit"
        );
        Ok(Route::Deferred)
    }

    fn begin(&self) {
        let mut stack = self.lock_stack();
        let frame = stack.begin();
        debug!(%frame, depth = stack.depth(), "transaction began");
    }

    async fn commit(&self) -> Result<()> {
        let popped = self.lock_stack().commit();
        let Some(frame) = popped else {
            trace!("commit without open transaction ignored");
            return Ok(());
        };

        let depth = self.lock_stack().depth();
        debug!(
            frame = %frame.id(),
            events = frame.len(),
            depth,
            "flushing committed transaction"
        );

        // 经由本调度器重放：父事务仍开启时，符合资格的事件落入父帧
        for record in frame.into_records() {
            self.dispatch(record.event, record.payload, false).await?;
        }
        Ok(())
    }

    fn rollback(&self) {
        let mut stack = self.lock_stack();
        match stack.rollback() {
            Some(frame) => debug!(
                frame = %frame.id(),
                discarded = frame.len(),
                depth = stack.depth(),
                "discarding rolled back transaction"
            ),
            None => trace!("rollback without open transaction ignored"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Lifecycle {
    Begin,
    Commit,
    Rollback,
}

// 挂在底层总线上的生命周期监听器；持有弱引用，调度器释放后自动失效
struct LifecycleListener {
    kind: Lifecycle,
    shared: Weak<Shared>,
}

#[async_trait]
impl EventListener for LifecycleListener {
    fn listener_name(&self) -> &str {
        match self.kind {
            Lifecycle::Begin => "tx_events::on_begin",
            Lifecycle::Commit => "tx_events::on_commit",
            Lifecycle::Rollback => "tx_events::on_rollback",
        }
    }

    async fn handle(&self, _event: &EventRef, _payload: &Payload) -> anyhow::Result<Option<Value>> {
        let Some(shared) = self.shared.upgrade() else {
            return Ok(None);
        };

        match self.kind {
            Lifecycle::Begin => shared.begin(),
            Lifecycle::Commit => shared.commit().await?,
            Lifecycle::Rollback => shared.rollback(),
        }
        Ok(None)
    }
}
