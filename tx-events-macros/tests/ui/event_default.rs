use tx_events::{Event, EventRef};

#[derive(Debug, Event)]
struct OrderPlaced {
    order_id: String,
}

fn main() {
    let ev = OrderPlaced {
        order_id: "o-1".into(),
    };
    assert!(ev.event_name().ends_with("::OrderPlaced"));
    assert!(!ev.transactional());
    assert!(!EventRef::object(ev).is_transactional());
}
