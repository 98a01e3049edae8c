use credwatch::types::{ChangeEvent, decode_change};

#[test]
fn insert_event_carries_the_new_row() {
    let payload = r#"{"data":{"type":"INSERT","record":{"email":"x","password":"y"}}}"#;
    let event = decode_change(payload).expect("insert event must decode");

    match &event {
        ChangeEvent::Insert { row, .. } => {
            assert_eq!(row.email, "x");
            assert_eq!(row.password, "y");
        }
        other => panic!("expected insert, got {other:?}"),
    }

    let line = event.describe();
    assert!(line.contains("updated record"));
    assert!(line.contains("email=x"));
    assert!(!line.contains("deleted"));
}

#[test]
fn update_event_carries_the_post_change_row() {
    let payload = r#"{"data":{"type":"UPDATE","record":{"email":"a@b.com","password":"q"},"old_record":{"email":"a@b.com","password":"p"}}}"#;
    let event = decode_change(payload).expect("update event must decode");

    match &event {
        ChangeEvent::Update { row, .. } => assert_eq!(row.password, "q"),
        other => panic!("expected update, got {other:?}"),
    }
    // The post-change snapshot wins over the old one.
    assert!(event.describe().contains("password=q"));
}

#[test]
fn delete_event_reports_the_old_record() {
    let payload = r#"{"data":{"type":"DELETE","old_record":{"email":"x"}}}"#;
    let event = decode_change(payload).expect("delete event must decode");

    match &event {
        ChangeEvent::Delete { old_row, .. } => {
            assert_eq!(old_row.email, "x");
            assert_eq!(old_row.password, None);
        }
        other => panic!("expected delete, got {other:?}"),
    }

    let line = event.describe();
    assert!(line.contains("record deleted"));
    assert!(line.contains("email=x"));
    assert!(!line.contains("updated record"));
}

#[test]
fn commit_timestamp_is_decoded_when_present() {
    let payload = r#"{"data":{"type":"INSERT","record":{"email":"x","password":"y"},"commit_timestamp":"2026-01-02T03:04:05Z"}}"#;
    match decode_change(payload).expect("event must decode") {
        ChangeEvent::Insert { at, .. } => assert!(at.is_some()),
        other => panic!("expected insert, got {other:?}"),
    }
}

#[test]
fn unknown_event_type_is_a_decode_error() {
    let payload = r#"{"data":{"type":"TRUNCATE"}}"#;
    assert!(decode_change(payload).is_err());
}

#[test]
fn insert_without_record_is_a_decode_error() {
    let payload = r#"{"data":{"type":"INSERT"}}"#;
    assert!(decode_change(payload).is_err());
}

#[test]
fn delete_without_old_record_is_a_decode_error() {
    let payload = r#"{"data":{"type":"DELETE","record":{"email":"x","password":"y"}}}"#;
    assert!(decode_change(payload).is_err());
}

#[test]
fn garbage_payload_is_a_decode_error() {
    assert!(decode_change("not json").is_err());
}
