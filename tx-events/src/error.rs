//! 事务事件层统一错误定义
//!
//! 仅覆盖调度器自身可能产生的错误：使用错误、下游监听器失败与配置加载失败。
//! 事务生命周期错配（无对应开启事务的提交/回滚通知）不属于错误，调度器内部静默忽略。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EventError {
    // --- 使用错误 ---
    #[error("no open transaction to enqueue into")]
    NoOpenTransaction,

    // --- 下游监听器 ---
    #[error("event listener error: listener={listener}, event={event}: {source}")]
    Listener {
        listener: String,
        event: String,
        #[source]
        source: anyhow::Error,
    },

    // --- 配置 ---
    #[error("config error: {reason}")]
    Config { reason: String },
}

impl EventError {
    pub fn listener(
        listener: impl Into<String>,
        event: impl Into<String>,
        source: anyhow::Error,
    ) -> Self {
        Self::Listener {
            listener: listener.into(),
            event: event.into(),
            source,
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type EventResult<T> = Result<T, EventError>;

impl From<toml::de::Error> for EventError {
    fn from(err: toml::de::Error) -> Self {
        EventError::config(err.to_string())
    }
}

impl From<std::io::Error> for EventError {
    fn from(err: std::io::Error) -> Self {
        EventError::config(err.to_string())
    }
}
