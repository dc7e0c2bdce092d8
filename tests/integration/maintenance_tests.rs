//! Integration tests for the hub status and factory reset operations.

use bluesnote::app::events::AppEvent;
use bluesnote::app::maintenance::{factory_reset, query_status};
use bluesnote::notecard::{Session, TransportError};
use serde_json::json;

use crate::mock_hw::{MockNotecard, RecordingSink};

const STATUS_REPLY: &str = r#"{"status":"connected (session open) {connected}","connected":true}"#;

#[test]
fn status_forwards_raw_reply() {
    let mut session: Session<_> = Session::new(MockNotecard::new().reply("hub.status", STATUS_REPLY));
    let mut sink = RecordingSink::new();

    assert!(query_status(&mut session, &mut sink));
    assert_eq!(sink.events, vec![AppEvent::HubStatus(STATUS_REPLY.into())]);
    assert_eq!(
        sink.events[0].to_string(),
        format!("+EVT:{}", STATUS_REPLY)
    );
    assert_eq!(
        session.transport().request("hub.status").unwrap(),
        &json!({ "req": "hub.status" })
    );
}

#[test]
fn status_failure_emits_nothing() {
    let mut session: Session<_> =
        Session::new(MockNotecard::new().fail("hub.status", TransportError::Timeout));
    let mut sink = RecordingSink::new();

    assert!(!query_status(&mut session, &mut sink));
    assert!(sink.events.is_empty());
}

#[test]
fn status_error_reply_emits_nothing() {
    let mut session: Session<_> =
        Session::new(MockNotecard::new().reply("hub.status", r#"{"err":"no session"}"#));
    let mut sink = RecordingSink::new();

    assert!(!query_status(&mut session, &mut sink));
    assert!(sink.events.is_empty());
}

#[test]
fn factory_reset_sends_delete_and_connected() {
    let mut session: Session<_> = Session::new(MockNotecard::new());

    assert!(factory_reset(&mut session));
    assert_eq!(
        session.transport().sent,
        vec![json!({ "req": "hub.status", "delete": true, "connected": true })]
    );
}

#[test]
fn factory_reset_transport_failure_is_logged_only() {
    let mut session: Session<_> =
        Session::new(MockNotecard::new().fail("hub.status", TransportError::Bus));

    assert!(!factory_reset(&mut session));
    assert_eq!(session.transport().count("hub.status"), 1);
    // The session stays usable afterwards.
    let mut sink = RecordingSink::new();
    assert!(!query_status(&mut session, &mut sink));
    assert_eq!(session.transport().count("hub.status"), 2);
}
