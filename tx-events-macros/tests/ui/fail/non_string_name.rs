use tx_events::Event;

#[derive(Debug, Event)]
#[event(name = 42)]
struct OrderPlaced;

fn main() {}
