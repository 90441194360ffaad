use tx_events::Event;

#[derive(Debug, Event)]
#[event(version = 2)]
struct OrderPlaced;

fn main() {}
