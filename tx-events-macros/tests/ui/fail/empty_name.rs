use tx_events::Event;

#[derive(Debug, Event)]
#[event(name = "")]
struct OrderPlaced;

fn main() {}
