use std::path::PathBuf;

use dhcpd_conf::{read_file, ConfigDocument, Reservation};
use pretty_assertions::assert_eq;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn parses_hosts_and_leaves_subnet_as_raw_text() {
    let text = read_file(&fixture("fixtures/dhcpd-base.conf")).expect("fixture should read");
    let doc = ConfigDocument::parse(&text);

    let names: Vec<&str> = doc.blocks().iter().map(|b| b.fqdn.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "mac-m1-001.macfarm.example.com",
            "mac-m1-002.macfarm.example.com",
            "mac-m2-001.macfarm.example.com",
        ]
    );
    assert_eq!(doc.to_string(), text);
}

#[test]
fn extracts_reservations_with_normalized_macs() {
    let text = read_file(&fixture("fixtures/dhcpd-base.conf")).expect("fixture should read");
    let doc = ConfigDocument::parse(&text);

    let last = doc.reservations().pop().expect("three reservations");
    assert_eq!(
        last,
        Reservation {
            fqdn: "mac-m2-001.macfarm.example.com".to_string(),
            mac: "3c:22:fb:20:00:01".to_string(),
            ip: "10.20.0.21".to_string(),
        }
    );

    let block = doc
        .block_for_host("mac-m2-001.macfarm.example.com")
        .expect("block should exist");
    assert_eq!(
        block.extras,
        vec![
            "# rack B shelf 4".to_string(),
            "option host-name \"mac-m2-001\";".to_string(),
        ]
    );
}
