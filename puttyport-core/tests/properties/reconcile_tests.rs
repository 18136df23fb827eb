//! Property tests for classification against a store

use proptest::prelude::*;
use puttyport_core::import::forwards_match;
use puttyport_core::models::{
    ForwardDestination, ForwardKind, HostRecord, PortForwardDescriptor, PortForwardRecord,
    SessionDescriptor,
};
use puttyport_core::{Classification, classify};
use uuid::Uuid;

fn forward_strategy() -> impl Strategy<Value = PortForwardDescriptor> {
    (
        prop_oneof![
            Just(ForwardKind::Local),
            Just(ForwardKind::Remote),
            Just(ForwardKind::Dynamic)
        ],
        1u16..=65535,
        "[a-z]{1,8}",
        1u16..=65535,
        prop_oneof![Just("localhost"), Just("0.0.0.0"), Just("::1")],
    )
        .prop_map(|(kind, source, host, port, bind)| {
            let destination = kind
                .requires_destination()
                .then_some(ForwardDestination { host, port });
            PortForwardDescriptor::new(kind, source, destination, bind)
        })
}

proptest! {
    /// Property: forward comparison ignores order and bind address
    #[test]
    fn forwards_match_is_order_insensitive(
        forwards in prop::collection::vec(forward_strategy(), 0..8),
    ) {
        let host_id = Uuid::new_v4();
        let stored: Vec<_> = forwards
            .iter()
            .map(|f| PortForwardRecord::from_descriptor(&f.with_bind_address("10.0.0.1"), host_id))
            .collect();
        let mut shuffled = forwards.clone();
        shuffled.reverse();
        prop_assert!(forwards_match(&stored, &shuffled));
    }

    /// Property: a freshly stored session classifies as unchanged
    #[test]
    fn stored_session_is_unchanged(
        name in "[a-zA-Z][a-zA-Z0-9]{0,20}",
        host in "[a-z]{1,10}\\.example\\.com",
        port in 1u16..=65535,
        forwards in prop::collection::vec(forward_strategy(), 0..5),
    ) {
        let mut session = SessionDescriptor::new(name, host);
        session.port = port;
        let record = HostRecord::from_session(&session);
        let stored: Vec<_> = forwards
            .iter()
            .map(|f| PortForwardRecord::from_descriptor(f, record.id))
            .collect();
        let result = classify(std::slice::from_ref(&record), &stored, &session, &forwards);
        prop_assert_eq!(result, Classification::Unchanged { existing_id: record.id });
    }

    /// Property: an extra forward always turns unchanged into updated
    #[test]
    fn extra_forward_is_update(
        forwards in prop::collection::vec(forward_strategy(), 0..5),
        extra in forward_strategy(),
    ) {
        let session = SessionDescriptor::new("web", "web.example.com");
        let record = HostRecord::from_session(&session);
        let stored: Vec<_> = forwards
            .iter()
            .map(|f| PortForwardRecord::from_descriptor(f, record.id))
            .collect();
        let mut incoming = forwards.clone();
        incoming.push(extra);
        let is_updated = matches!(
            classify(std::slice::from_ref(&record), &stored, &session, &incoming),
            Classification::Updated { .. }
        );
        prop_assert!(is_updated);
    }
}
