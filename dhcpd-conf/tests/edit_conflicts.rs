use dhcpd_conf::{
    extract_all_reservations, AlwaysAccept, AlwaysDecline, ConfirmFn, ConflictPolicy, EditError,
    Outcome, ReservationEditor, ReservationRecord,
};
use pretty_assertions::assert_eq;

const SINGLE_LINE: &str =
    "host a.example.com { hardware ethernet aa:bb:cc:dd:ee:ff; fixed-address 10.0.0.1; }\n";

fn record(host: &str, mac: &str, ip: &str) -> ReservationRecord {
    ReservationRecord::new(host, mac, ip).expect("valid record")
}

#[test]
fn non_interactive_conflict_fails_and_leaves_text_alone() {
    let mut editor = ReservationEditor::new(
        SINGLE_LINE.to_string(),
        "example.com",
        ConflictPolicy::Fail,
        AlwaysAccept,
    );

    let outcome = editor.add(&record("b", "aa:bb:cc:dd:ee:ff", "10.0.0.2"));
    match outcome {
        Outcome::Failed(EditError::Conflict { mac, existing }) => {
            assert_eq!(mac, "aa:bb:cc:dd:ee:ff");
            assert_eq!(existing.fqdn, "a.example.com");
        }
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(editor.text(), SINGLE_LINE);
}

#[test]
fn declined_conflict_is_skipped() {
    let mut editor = ReservationEditor::new(
        SINGLE_LINE.to_string(),
        "example.com",
        ConflictPolicy::Prompt,
        AlwaysDecline,
    );

    let outcome = editor.add(&record("b", "aa:bb:cc:dd:ee:ff", "10.0.0.2"));
    assert_eq!(
        outcome,
        Outcome::Skipped {
            reason: "user declined".to_string()
        }
    );
    assert!(!outcome.is_success());
    assert_eq!(editor.text(), SINGLE_LINE);
}

#[test]
fn accepted_conflict_replaces_every_stale_block() {
    let start = "\
host a.example.com {
  hardware ethernet aa:bb:cc:dd:ee:ff;
  fixed-address 10.0.0.1;
}
host c.example.com {
  hardware ethernet AA:BB:CC:DD:EE:FF;
  fixed-address 10.0.0.3;
}
host keep.example.com {
  hardware ethernet aa:bb:cc:dd:ee:00;
  fixed-address 10.0.0.4;
}
";
    let mut asked = 0;
    let mut editor = ReservationEditor::new(
        start.to_string(),
        "example.com",
        ConflictPolicy::Prompt,
        ConfirmFn(|_: &str| {
            asked += 1;
            true
        }),
    );

    let outcome = editor.add(&record("b", "aa:bb:cc:dd:ee:ff", "10.0.0.2"));
    assert_eq!(outcome, Outcome::Added);

    let names: Vec<String> = extract_all_reservations(editor.text())
        .into_iter()
        .map(|r| r.fqdn)
        .collect();
    assert_eq!(names, vec!["keep.example.com", "b.example.com"]);
    drop(editor);
    assert_eq!(asked, 2);
}

#[test]
fn duplicate_batch_rows_conflict_with_each_other() {
    let mut editor = ReservationEditor::new(String::new(), "example.com", ConflictPolicy::Fail, AlwaysDecline);

    assert_eq!(editor.add(&record("a", "aa:bb:cc:dd:ee:01", "10.0.0.1")), Outcome::Added);
    assert_eq!(editor.add(&record("a", "aa:bb:cc:dd:ee:01", "10.0.0.1")), Outcome::Unchanged);
    assert!(matches!(
        editor.add(&record("b", "aa:bb:cc:dd:ee:01", "10.0.0.2")),
        Outcome::Failed(EditError::Conflict { .. })
    ));
}
