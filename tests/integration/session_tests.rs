//! Integration tests for the session client: request encoding on the
//! wire, capture, and response-capacity handling.

use bluesnote::error::Error;
use bluesnote::notecard::{ResponseBuffer, Session, TransportError};
use serde_json::json;

use crate::mock_hw::MockNotecard;

const VERSION_REPLY: &str = r#"{"version":"notecard-7.2.2","sku":"NOTE-WBNAW","body":{"ver_major":7},"temp":21,"gps":true}"#;

#[test]
fn typed_fields_reach_the_wire() {
    let mut session: Session<_> = Session::new(MockNotecard::new());
    let mut req = session.open("hub.set").unwrap();
    req.add_string("product", "com.blues.test:p")
        .add_int("seconds", -5)
        .add_bool("heartbeat", false);
    req.send().unwrap();

    assert_eq!(
        session.transport().sent,
        vec![json!({
            "req": "hub.set",
            "product": "com.blues.test:p",
            "seconds": -5,
            "heartbeat": false,
        })]
    );
}

#[test]
fn later_field_with_same_key_wins() {
    let mut session: Session<_> = Session::new(MockNotecard::new());
    let mut req = session.open("card.wireless").unwrap();
    req.add_string("mode", "off").add_string("mode", "auto");
    req.send().unwrap();

    assert_eq!(session.transport().request("card.wireless").unwrap()["mode"], "auto");
}

#[test]
fn captured_reply_getters() {
    let mut session: Session<_> = Session::new(MockNotecard::new().reply("card.version", VERSION_REPLY));
    let reply = session.open("card.version").unwrap().send_capture().unwrap();

    assert_eq!(reply.get_str("version").unwrap(), "notecard-7.2.2");
    assert_eq!(reply.get_int("temp").unwrap(), 21);
    assert!(reply.get_bool("gps").unwrap());
    assert_eq!(reply.get_int("sku"), Err(Error::FieldMissingOrWrongType));
    assert_eq!(reply.get_str("missing"), Err(Error::FieldMissingOrWrongType));
    assert!(reply.has("body"));
    assert_eq!(reply.get_string::<4>("sku"), Err(Error::FieldTooLong));
    assert_eq!(reply.as_str(), VERSION_REPLY);
}

#[test]
fn capture_into_too_small_buffer_hides_everything() {
    let mut session: Session<_> = Session::new(MockNotecard::new().reply("card.version", VERSION_REPLY));
    let mut out = ResponseBuffer::<32>::new();

    let err = session
        .open("card.version")
        .unwrap()
        .send_capture_into(&mut out)
        .unwrap_err();

    assert_eq!(err, Error::ResponseOverflow);
    assert!(out.is_empty());
    assert!(!out.has("version"));
    assert_eq!(out.get_str("version"), Err(Error::FieldMissingOrWrongType));
}

#[test]
fn capture_into_large_enough_buffer() {
    let mut session: Session<_> = Session::new(MockNotecard::new().reply("card.version", VERSION_REPLY));
    let mut out = ResponseBuffer::<256>::new();

    session
        .open("card.version")
        .unwrap()
        .send_capture_into(&mut out)
        .unwrap();

    assert_eq!(out.get_str("sku").unwrap(), "NOTE-WBNAW");
    assert!(session.last_response().is_empty());
}

#[test]
fn reply_larger_than_session_buffer_overflows() {
    let mut session: Session<MockNotecard, 16> =
        Session::new(MockNotecard::new().reply("card.version", VERSION_REPLY));

    let err = session.open("card.version").unwrap().send_capture().unwrap_err();

    assert_eq!(err, Error::ResponseOverflow);
    assert!(session.last_response().is_empty());
}

#[test]
fn malformed_reply_is_rejected() {
    let mut session: Session<_> = Session::new(MockNotecard::new().reply("card.version", "not json"));

    let err = session.open("card.version").unwrap().send_capture().unwrap_err();

    assert_eq!(err, Error::MalformedResponse);
    assert!(session.last_response().is_empty());
}

#[test]
fn session_recovers_after_transport_failure() {
    let mut session: Session<_> = Session::new(
        MockNotecard::new()
            .fail("hub.set", TransportError::Timeout)
            .reply("card.version", VERSION_REPLY),
    );

    assert_eq!(
        session.open("hub.set").unwrap().send(),
        Err(Error::Transport(TransportError::Timeout))
    );
    let reply = session.open("card.version").unwrap().send_capture().unwrap();
    assert_eq!(reply.get_str("version").unwrap(), "notecard-7.2.2");
}

#[test]
fn connect_opens_a_closed_transport() {
    let mut session: Session<_> = Session::new(MockNotecard::closed());
    assert!(!session.is_connected());
    assert_eq!(session.open("hub.status").err(), Some(Error::RequestOpen));

    session.connect().unwrap();
    assert!(session.is_connected());
    session.open("hub.status").unwrap().send().unwrap();
}
