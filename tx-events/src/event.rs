//! 事件标识（Event）与事件引用（EventRef）
//!
//! 调度时的事件既可以是一个字符串名称，也可以是一个具体的事件值：
//! - 字符串名称直接作为标识参与模式匹配；
//! - 事件值以其类型的完整路径（`std::any::type_name`）作为默认标识，可覆写；
//! - 事件值可通过 `transactional()` 自声明为事务性事件，绕过 include/exclude 规则。
//!
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 事件载荷（`Value::Null` 表示空载荷）
pub type Payload = Value;

/// 具体事件值需要满足的能力边界
pub trait Event: AsAny + fmt::Debug + Send + Sync + 'static {
    /// 事件标识，默认取具体类型的完整路径（形如 `app::events::OrderPlaced`）
    fn event_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// 事务性标记：返回 `true` 时总是参与事务延迟，与 include/exclude 规则无关
    fn transactional(&self) -> bool {
        false
    }
}

/// 调度入参中的事件：名称或具体事件值
#[derive(Clone)]
pub enum EventRef {
    Named(String),
    Object(Arc<dyn Event>),
}

impl EventRef {
    pub fn object<E: Event>(event: E) -> Self {
        Self::Object(Arc::new(event))
    }

    /// 解析为字符串标识
    pub fn name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Object(event) => event.event_name(),
        }
    }

    /// 仅具体事件值可以携带事务性标记
    pub fn is_transactional(&self) -> bool {
        match self {
            Self::Named(_) => false,
            Self::Object(event) => event.transactional(),
        }
    }

    /// 以具体类型取回事件值
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        match self {
            Self::Named(_) => None,
            Self::Object(event) => (**event).as_any().downcast_ref::<E>(),
        }
    }
}

impl fmt::Debug for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Object(event) => f.debug_tuple("Object").field(event).finish(),
        }
    }
}

impl fmt::Display for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for EventRef {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for EventRef {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Arc<dyn Event>> for EventRef {
    fn from(event: Arc<dyn Event>) -> Self {
        Self::Object(event)
    }
}

/// `dyn Event` 到 `dyn Any` 的上转，供 downcast 使用
#[doc(hidden)]
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
