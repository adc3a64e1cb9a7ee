#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("path should be valid utf-8")
}

fn copy_base(dir: &Path) -> PathBuf {
    let config = dir.join("dhcpd.conf");
    fs::copy(fixture("fixtures/dhcpd-base.conf"), &config).expect("copy fixture");
    config
}

fn remove(config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dhcp-reservations"));
    cmd.env_remove("DHCPD_CONF_PATH")
        .env_remove("DHCPD_DOMAIN")
        .env_remove("DHCP_RESERVATIONS_SETTINGS")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg("--config-file")
        .arg(path_as_str(config))
        .arg("--domain")
        .arg("macfarm.example.com")
        .arg("remove")
        .arg("--skip-validation");
    cmd
}

#[test]
fn remove_deletes_only_the_named_block() {
    let dir = tempdir().expect("tempdir");
    let config = copy_base(dir.path());
    let original = fs::read_to_string(&config).expect("read");

    remove(&config)
        .args(["--hostname", "mac-m1-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mac-m1-001: reservation removed"));

    let updated = fs::read_to_string(&config).expect("read");
    let block = "host mac-m1-001.macfarm.example.com {\n  hardware ethernet 3c:22:fb:10:00:01;\n  fixed-address 10.20.0.11;\n}\n\n";
    assert_eq!(updated, original.replacen(block, "", 1));
}

#[test]
fn removing_twice_is_harmless() {
    let dir = tempdir().expect("tempdir");
    let config = copy_base(dir.path());

    remove(&config)
        .args(["--hostname", "mac-m2-001", "--no-backup"])
        .assert()
        .success();
    let once = fs::read_to_string(&config).expect("read");

    remove(&config)
        .args(["--hostname", "mac-m2-001", "--no-backup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no reservation found"))
        .stdout(predicate::str::contains(
            "Summary: 1 successful, 0 failed (0 skipped), total 1",
        ));

    assert_eq!(fs::read_to_string(&config).expect("read"), once);
    assert!(!once.contains("mac-m2-001"));
}

#[test]
fn batch_remove_uses_first_column() {
    let dir = tempdir().expect("tempdir");
    let config = copy_base(dir.path());
    let batch = dir.path().join("gone.csv");
    fs::write(&batch, "hostname\nmac-m1-002\nmac-m9-999\n,\n").expect("write batch");

    remove(&config)
        .arg("--file")
        .arg(path_as_str(&batch))
        .assert()
        .failure()
        .stdout(predicate::str::contains("line 2: mac-m1-002: reservation removed"))
        .stdout(predicate::str::contains("line 4: : failed: hostname is empty"))
        .stdout(predicate::str::contains(
            "Summary: 2 successful, 1 failed (0 skipped), total 3",
        ));

    let updated = fs::read_to_string(&config).expect("read");
    assert!(!updated.contains("mac-m1-002"));
    assert!(updated.contains("mac-m1-001"));
}

#[test]
fn missing_batch_file_is_reported() {
    let dir = tempdir().expect("tempdir");
    let config = copy_base(dir.path());

    remove(&config)
        .arg("--file")
        .arg(path_as_str(&dir.path().join("absent.csv")))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read batch file"));
}
