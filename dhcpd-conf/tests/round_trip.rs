use dhcpd_conf::{
    build_fqdn, build_reservation_block, extract_all_reservations, find_reservation_block,
    Reservation,
};
use pretty_assertions::assert_eq;

const TRIPLES: &[(&str, &str, &str)] = &[
    ("mac-m1-001", "3c:22:fb:10:00:01", "10.20.0.11"),
    ("mac-m1-002.macfarm.example.com", "3c:22:fb:10:00:02", "10.20.0.12"),
    ("builder", "00:00:00:00:00:00", "0.0.0.0"),
];

#[test]
fn appended_block_is_located_at_exactly_its_span() {
    let base = "authoritative;\n\nhost other {\n  fixed-address 10.0.0.9;\n}\n";
    for (host, mac, ip) in TRIPLES {
        let block = build_reservation_block(host, mac, ip, "macfarm.example.com");
        let text = format!("{base}{block}");
        let fqdn = build_fqdn(host, "macfarm.example.com");

        let span = find_reservation_block(&text, &fqdn).expect("block should be found");
        assert_eq!(span, base.len()..text.len());
        assert_eq!(&text[span], block);
    }
}

#[test]
fn export_of_a_built_block_yields_the_triple() {
    for (host, mac, ip) in TRIPLES {
        let block = build_reservation_block(host, mac, ip, "macfarm.example.com");
        assert_eq!(
            extract_all_reservations(&block),
            vec![Reservation {
                fqdn: build_fqdn(host, "macfarm.example.com"),
                mac: mac.to_string(),
                ip: ip.to_string(),
            }]
        );
    }
}
