//! 事件名称模式匹配
//!
//! 两种匹配方式，按模式中是否含有通配符 `*` 区分：
//! - 前缀：`app::events` 匹配 `app::events::OrderPlaced`，用于整体命名空间；
//! - 通配：`app::events::*` 按 glob 语义匹配整个名称，`*` 可匹配任意（含空）子串。
//!
//! 大小写敏感，不做任何归一化；空模式不匹配任何名称。

/// 通配符
pub const WILDCARD: char = '*';

/// 事件名称模式
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventPattern(String);

impl EventPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn is_wildcard(&self) -> bool {
        self.0.contains(WILDCARD)
    }

    /// 判断模式是否匹配事件名称
    pub fn matches(&self, event_name: &str) -> bool {
        matches(&self.0, event_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventPattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl From<String> for EventPattern {
    fn from(pattern: String) -> Self {
        Self(pattern)
    }
}

/// 判断 `pattern` 是否匹配 `event_name`
pub fn matches(pattern: &str, event_name: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }

    match pattern.split_once(WILDCARD) {
        Some((head, tail)) => glob_match(head, tail, event_name),
        None => event_name.starts_with(pattern),
    }
}

// head 为首个 `*` 之前的字面量，tail 为其后的剩余模式
fn glob_match(head: &str, tail: &str, event_name: &str) -> bool {
    let Some(mut rest) = event_name.strip_prefix(head) else {
        return false;
    };

    let (middle, last) = tail.rsplit_once(WILDCARD).unwrap_or(("", tail));

    // 中间片段按最左匹配依次消费
    for part in middle.split(WILDCARD).filter(|p| !p.is_empty()) {
        match rest.find(part) {
            Some(idx) => rest = &rest[idx + part.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}
