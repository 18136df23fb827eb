//! Property tests for port forward parsing

use proptest::prelude::*;
use puttyport_core::import::forward::{AddressFamily, normalize_bind_address, parse_port_forward};
use puttyport_core::import::parse_port_forwards;
use puttyport_core::models::ForwardKind;

// Strategy for generating forward kinds with a destination
fn fixed_kind_strategy() -> impl Strategy<Value = ForwardKind> {
    prop_oneof![Just(ForwardKind::Local), Just(ForwardKind::Remote)]
}

// Strategy for generating destination hosts
fn dest_host_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9-]{0,15}(\\.[a-z]{2,6})?",
        "10\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
    ]
}

fn valid_port() -> impl Strategy<Value = u16> {
    1u16..=65535
}

proptest! {
    /// Property: parsing arbitrary text never panics
    #[test]
    fn parse_never_panics(entry in "\\PC{0,64}") {
        let _ = parse_port_forward(&entry);
        let _ = parse_port_forwards(&entry);
    }

    /// Property: a well-formed local or remote entry yields its parts
    #[test]
    fn fixed_forward_fields_survive(
        kind in fixed_kind_strategy(),
        source in valid_port(),
        host in dest_host_strategy(),
        dest_port in valid_port(),
    ) {
        let entry = format!("{}{source}={host}:{dest_port}", kind.letter());
        let forward = parse_port_forward(&entry).unwrap();
        prop_assert_eq!(forward.kind, kind);
        prop_assert_eq!(forward.source_port, source);
        prop_assert_eq!(forward.destination_host(), Some(host.as_str()));
        prop_assert_eq!(forward.destination_port(), dest_port);
        prop_assert_eq!(forward.bind_address.as_str(), "localhost");
        prop_assert!(forward.host_id.is_none());
    }

    /// Property: a dynamic entry has no destination
    #[test]
    fn dynamic_forward_has_no_destination(source in valid_port()) {
        let forward = parse_port_forward(&format!("D{source}")).unwrap();
        prop_assert_eq!(forward.kind, ForwardKind::Dynamic);
        prop_assert!(forward.destination.is_none());
        prop_assert_eq!(forward.destination_port(), 0);
    }

    /// Property: port zero and ports above 65535 are rejected
    #[test]
    fn out_of_range_source_rejected(port in prop_oneof![Just(0u32), 65536u32..1_000_000]) {
        let local = format!("L{port}=localhost:80");
        let dynamic = format!("D{port}");
        prop_assert!(parse_port_forward(&local).is_err());
        prop_assert!(parse_port_forward(&dynamic).is_err());
    }

    /// Property: every good entry in a list is kept, in order
    #[test]
    fn list_keeps_good_entries(ports in prop::collection::vec(valid_port(), 0..10)) {
        let spec = ports
            .iter()
            .map(|p| format!("D{p}"))
            .chain(std::iter::once("Xjunk".to_string()))
            .collect::<Vec<_>>()
            .join(",");
        let parsed: Vec<u16> = parse_port_forwards(&spec).iter().map(|f| f.source_port).collect();
        prop_assert_eq!(parsed, ports);
    }

    /// Property: explicit bind addresses other than loopback or wildcard are kept
    #[test]
    fn custom_bind_address_kept(
        a in 1u8..=223, b in 0u8..=255, c in 0u8..=255, d in 1u8..=254,
    ) {
        let address = format!("{a}.{b}.{c}.{d}");
        prop_assume!(address != "127.0.0.1");
        prop_assert_eq!(
            normalize_bind_address(Some(&address), AddressFamily::Ipv4),
            address
        );
    }
}
