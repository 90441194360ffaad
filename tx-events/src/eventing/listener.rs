//! 事件监听器（EventListener）
//!
//! 监听器由总线在分发时调用，可以返回一个响应值；返回错误会中止本次分发。
//!
use crate::event::{EventRef, Payload};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// 事件监听器：处理一次分发
#[async_trait]
pub trait EventListener: Send + Sync {
    /// 监听器名称（用于错误与日志）
    fn listener_name(&self) -> &str;
    /// 处理事件；`Ok(None)` 表示无响应
    async fn handle(&self, event: &EventRef, payload: &Payload) -> anyhow::Result<Option<Value>>;
}

/// 以同步闭包实现的监听器
pub struct FnListener<F> {
    name: String,
    f: F,
}

impl<F> FnListener<F>
where
    F: Fn(&EventRef, &Payload) -> anyhow::Result<Option<Value>> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnListener<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnListener").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F> EventListener for FnListener<F>
where
    F: Fn(&EventRef, &Payload) -> anyhow::Result<Option<Value>> + Send + Sync,
{
    fn listener_name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, event: &EventRef, payload: &Payload) -> anyhow::Result<Option<Value>> {
        (self.f)(event, payload)
    }
}
