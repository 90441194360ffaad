//! 事务延迟资格判定（EligibilityPolicy）
//!
//! 判定顺序：
//! 1. 事件自声明为事务性 → 总是参与延迟；
//! 2. 命中任一 exclude 模式 → 不参与（exclude 优先，首次命中即返回）；
//! 3. 命中任一 include 模式 → 参与；
//! 4. 默认不参与：延迟是按命名空间显式开启的。
//!
use crate::event::EventRef;
use crate::pattern::EventPattern;

/// include/exclude 规则集
#[derive(Clone, Debug, Default)]
pub struct EligibilityPolicy {
    include: Vec<EventPattern>,
    exclude: Vec<EventPattern>,
}

impl EligibilityPolicy {
    pub fn new<I, E, P, Q>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = P>,
        E: IntoIterator<Item = Q>,
        P: Into<EventPattern>,
        Q: Into<EventPattern>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    /// 整体替换 include 列表
    pub fn set_include<P: Into<EventPattern>>(&mut self, patterns: impl IntoIterator<Item = P>) {
        self.include = patterns.into_iter().map(Into::into).collect();
    }

    /// 整体替换 exclude 列表
    pub fn set_exclude<P: Into<EventPattern>>(&mut self, patterns: impl IntoIterator<Item = P>) {
        self.exclude = patterns.into_iter().map(Into::into).collect();
    }

    pub fn include(&self) -> &[EventPattern] {
        &self.include
    }

    pub fn exclude(&self) -> &[EventPattern] {
        &self.exclude
    }

    /// 事件是否应在事务开启时被延迟
    pub fn is_eligible(&self, event: &EventRef) -> bool {
        if event.is_transactional() {
            return true;
        }

        self.is_eligible_name(event.name())
    }

    /// 仅按名称判定（不考虑事务性标记）
    pub fn is_eligible_name(&self, name: &str) -> bool {
        if self.exclude.iter().any(|p| p.matches(name)) {
            return false;
        }

        self.include.iter().any(|p| p.matches(name))
    }
}
