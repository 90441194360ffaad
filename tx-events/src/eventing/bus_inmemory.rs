//! 内存版事件总线（InMemoryEventBus）
//!
//! 进程内同步语义的参考实现，满足 `EventBus` 协议：
//! - 确切名称的监听器保存在 `DashMap` 中，通配监听器按注册顺序保存在列表中；
//! - 分发时先调用确切名称监听器，再调用匹配的通配监听器，均按注册顺序；
//! - 任一监听器返回错误即中止本次分发并向上传播；已是 `EventError` 的错误不再二次包裹。
//!
//! 典型用途：测试环境、示例，以及作为 `TransactionalDispatcher` 包裹的底层总线。

use super::{DispatchOutcome, EventBus, EventListener};
use crate::error::{EventError, EventResult as Result};
use crate::event::{EventRef, Payload};
use crate::pattern::EventPattern;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;

type ListenerList = Vec<Arc<dyn EventListener>>;

/// 简单的内存事件总线实现
#[derive(Default)]
pub struct InMemoryEventBus {
    listeners: DashMap<String, ListenerList>,
    wildcards: RwLock<Vec<(EventPattern, Arc<dyn EventListener>)>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    // 拷贝出监听器快照，避免在 await 期间持有锁
    fn listeners_for(&self, event_name: &str) -> ListenerList {
        let mut merged: ListenerList = self
            .listeners
            .get(event_name)
            .map(|list| list.clone())
            .unwrap_or_default();

        let wildcards = self.wildcards.read().unwrap_or_else(PoisonError::into_inner);
        merged.extend(
            wildcards
                .iter()
                .filter(|(pattern, _)| pattern.matches(event_name))
                .map(|(_, listener)| listener.clone()),
        );
        merged
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn dispatch(
        &self,
        event: EventRef,
        payload: Payload,
        halt: bool,
    ) -> Result<DispatchOutcome> {
        let listeners = self.listeners_for(event.name());
        trace!(event = %event, listeners = listeners.len(), halt, "dispatching");

        let mut responses = Vec::new();
        for listener in listeners {
            let response = listener
                .handle(&event, &payload)
                .await
                .map_err(|source| match source.downcast::<EventError>() {
                    // 监听器内部分发（如提交时重放）产生的错误原样上抛
                    Ok(inner) => inner,
                    Err(source) => {
                        EventError::listener(listener.listener_name(), event.name(), source)
                    }
                })?;

            match response.filter(|v| !v.is_null()) {
                Some(value) if halt => return Ok(DispatchOutcome::Halted(Some(value))),
                Some(value) => responses.push(value),
                None => {}
            }
        }

        if halt {
            Ok(DispatchOutcome::Halted(None))
        } else {
            Ok(DispatchOutcome::Delivered(responses))
        }
    }

    fn listen(&self, pattern: &str, listener: Arc<dyn EventListener>) {
        let pattern = EventPattern::new(pattern);
        if pattern.is_wildcard() {
            self.wildcards
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .push((pattern, listener));
        } else {
            self.listeners
                .entry(pattern.as_str().to_string())
                .or_default()
                .push(listener);
        }
    }

    fn forget(&self, pattern: &str) {
        if pattern.contains(crate::pattern::WILDCARD) {
            self.wildcards
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(p, _)| p.as_str() != pattern);
        } else {
            self.listeners.remove(pattern);
        }
    }

    fn has_listeners(&self, event_name: &str) -> bool {
        let exact = self
            .listeners
            .get(event_name)
            .map(|list| !list.is_empty())
            .unwrap_or(false);

        exact
            || self
                .wildcards
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .any(|(pattern, _)| pattern.matches(event_name))
    }
}
