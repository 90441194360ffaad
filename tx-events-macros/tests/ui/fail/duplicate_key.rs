use tx_events::Event;

#[derive(Debug, Event)]
#[event(name = "a", name = "b")]
struct OrderPlaced;

fn main() {}
