//! 事件总线（EventBus）协议
//!
//! 与框架默认事件分发器同形的接口：按名称/通配模式注册监听器、分发事件。
//! `TransactionalDispatcher` 同样实现该协议，因此可以对调用方透明地替换底层总线。
//!
use super::EventListener;
use crate::error::EventResult as Result;
use crate::event::{EventRef, Payload};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// 一次分发的结果
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchOutcome {
    /// 立即分发：收集所有非空响应
    Delivered(Vec<Value>),
    /// halt 模式：第一个非空响应
    Halted(Option<Value>),
    /// 已延迟到外层事务提交，尚无监听器被调用
    Deferred,
}

impl DispatchOutcome {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred)
    }

    /// 展开为响应列表（Deferred 视为空）
    pub fn into_responses(self) -> Vec<Value> {
        match self {
            Self::Delivered(responses) => responses,
            Self::Halted(response) => response.into_iter().collect(),
            Self::Deferred => Vec::new(),
        }
    }
}

/// 事件总线：负责注册监听器与分发事件
#[async_trait]
pub trait EventBus: Send + Sync {
    /// 分发事件
    ///
    /// - `halt` 为 `true` 时在首个非空响应处停止传播，并将其同步返回给调用方
    async fn dispatch(
        &self,
        event: EventRef,
        payload: Payload,
        halt: bool,
    ) -> Result<DispatchOutcome>;

    /// 注册监听器；`pattern` 可以是确切名称，也可以包含通配符 `*`
    fn listen(&self, pattern: &str, listener: Arc<dyn EventListener>);

    /// 移除某个名称/模式下的全部监听器
    fn forget(&self, pattern: &str);

    /// 给定事件名称是否存在监听器
    fn has_listeners(&self, event_name: &str) -> bool;
}
