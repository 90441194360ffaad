use tx_events::Event;

#[derive(Debug, Event)]
#[event(name = "billing.invoice_paid", transactional)]
struct InvoicePaid;

#[derive(Debug, Event)]
#[event(name = "billing.refunded")]
#[event(transactional = false)]
enum Refund {
    Full,
    Partial { cents: u64 },
}

fn main() {
    assert_eq!(InvoicePaid.event_name(), "billing.invoice_paid");
    assert!(InvoicePaid.transactional());

    let r = Refund::Partial { cents: 10 };
    assert_eq!(r.event_name(), "billing.refunded");
    assert!(!Refund::Full.transactional());
}
