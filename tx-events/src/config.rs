//! 事务事件配置
//!
//! 启动时读取一次的 include/exclude 模式列表，支持从 TOML 加载：
//!
//! ```toml
//! include = ["app::events"]
//! exclude = ["tx_events::lifecycle", "app::events::Audit*"]
//! ```
//!
//! 缺失的键取默认值。注意整体替换 `exclude` 时应保留 `LIFECYCLE_NAMESPACE`，
//! 否则事务内开启的嵌套事务通知可能被当作普通事件延迟。
//!
//! 模式匹配的是 `Event::event_name()`。派生事件的默认名称来自
//! `std::any::type_name`，以 crate 名开头（如 `my_shop::app::events::OrderPlaced`），
//! 因此默认的 `app::events` 前缀并不会命中它。可以二选一：
//!
//! ```ignore
//! // 1. 为事件显式指定名称
//! #[derive(Debug, Event)]
//! #[event(name = "app::events::OrderPlaced")]
//! pub struct OrderPlaced;
//! ```
//!
//! ```toml
//! # 2. 按完整类型路径配置
//! include = ["my_shop::app::events"]
//! ```
//!
use crate::error::EventResult as Result;
use crate::lifecycle::LIFECYCLE_NAMESPACE;
use crate::policy::EligibilityPolicy;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionalEventsConfig {
    /// 需要事务延迟的事件名称/命名空间
    #[builder(default = default_include())]
    pub include: Vec<String>,
    /// 排除在事务延迟之外的事件名称/命名空间，优先于 include
    #[builder(default = default_exclude())]
    pub exclude: Vec<String>,
}

impl Default for TransactionalEventsConfig {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: default_exclude(),
        }
    }
}

fn default_include() -> Vec<String> {
    vec!["app::events".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec![LIFECYCLE_NAMESPACE.to_string()]
}

impl TransactionalEventsConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// 转换为资格判定规则集
    pub fn policy(&self) -> EligibilityPolicy {
        EligibilityPolicy::new(self.include.iter().cloned(), self.exclude.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventError;

    #[test]
    fn defaults_defer_app_events_and_skip_lifecycle() {
        let cfg = TransactionalEventsConfig::default();
        assert_eq!(cfg.include, vec!["app::events"]);
        assert_eq!(cfg.exclude, vec!["tx_events::lifecycle"]);

        let policy = cfg.policy();
        assert!(policy.is_eligible_name("app::events::OrderPlaced"));
        assert!(!policy.is_eligible_name("tx_events::lifecycle::TransactionBeginning"));
    }

    #[test]
    fn default_include_needs_explicit_event_name() {
        use crate::event::{Event, EventRef};

        #[derive(Debug)]
        struct OrderPlaced;
        impl Event for OrderPlaced {}

        #[derive(Debug)]
        struct NamedOrderPlaced;
        impl Event for NamedOrderPlaced {
            fn event_name(&self) -> &str {
                "app::events::OrderPlaced"
            }
        }

        let policy = TransactionalEventsConfig::default().policy();
        assert!(OrderPlaced.event_name().starts_with("tx_events::"));
        assert!(!policy.is_eligible(&EventRef::object(OrderPlaced)));
        assert!(policy.is_eligible(&EventRef::object(NamedOrderPlaced)));
    }

    #[test]
    fn builder_matches_defaults() {
        assert_eq!(
            TransactionalEventsConfig::builder().build(),
            TransactionalEventsConfig::default()
        );
        let cfg = TransactionalEventsConfig::builder()
            .include(vec!["billing".to_string()])
            .build();
        assert_eq!(cfg.include, vec!["billing"]);
        assert_eq!(cfg.exclude, default_exclude());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = TransactionalEventsConfig::from_toml_str(
            r#"
            include = ["app::events", "order.*"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.include, vec!["app::events", "order.*"]);
        assert_eq!(cfg.exclude, default_exclude());

        let empty = TransactionalEventsConfig::from_toml_str("").unwrap();
        assert_eq!(empty, TransactionalEventsConfig::default());
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = TransactionalEventsConfig::from_toml_str("include = 3").unwrap_err();
        assert!(matches!(err, EventError::Config { .. }));

        let missing =
            TransactionalEventsConfig::from_path("/nonexistent/tx-events.toml").unwrap_err();
        assert!(matches!(missing, EventError::Config { .. }));
    }
}
