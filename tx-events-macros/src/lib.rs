use proc_macro::TokenStream;

mod event;

/// 事件派生宏
/// - 为结构体/枚举实现 `::tx_events::Event`
/// - 默认事件名称为类型完整路径（`std::any::type_name`）
/// - 支持：`#[event(name = "...")]` 覆写事件名称
/// - 支持：`#[event(transactional)]` / `#[event(transactional = true)]` 声明为事务性事件，
///   不受 include/exclude 规则影响，事务开启时总是延迟到提交
#[proc_macro_derive(Event, attributes(event))]
pub fn derive_event(input: TokenStream) -> TokenStream {
    event::expand(input)
}
