use std::fmt::Debug;
use tx_events::Event;

#[derive(Debug, Event)]
#[event(transactional)]
struct Changed<T: Debug + Send + Sync + 'static> {
    value: T,
}

fn main() {
    let ev = Changed { value: 1u32 };
    assert!(ev.transactional());
    assert_eq!(ev.value, 1);
    assert!(ev.event_name().ends_with("Changed<u32>"));
}
