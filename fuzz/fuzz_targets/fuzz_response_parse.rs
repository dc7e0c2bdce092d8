//! Fuzz target: Notecard reply handling (`Session::send_capture` + getters)
//!
//! Feeds arbitrary bytes back as the Notecard's reply line and exercises
//! every typed getter on whatever parses.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - A failed capture leaves the buffer empty unless the reply carried `err`
//! - A successful capture never exceeds the buffer capacity
//!
//! cargo fuzz run fuzz_response_parse

#![no_main]

use bluesnote::notecard::{ResponseBuffer, Session, Transport, TransportError};
use libfuzzer_sys::fuzz_target;

const CAPACITY: usize = 256;

struct Replay<'a> {
    reply: &'a [u8],
}

impl Transport for Replay<'_> {
    fn open(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn is_open(&self) -> bool {
        true
    }

    fn exchange(&mut self, _request: &[u8], response: &mut [u8]) -> Result<usize, TransportError> {
        if self.reply.len() > response.len() {
            return Err(TransportError::Overflow);
        }
        response[..self.reply.len()].copy_from_slice(self.reply);
        Ok(self.reply.len())
    }
}

fn probe<const N: usize>(reply: &ResponseBuffer<N>) {
    assert!(reply.len() <= reply.capacity());
    let _ = reply.as_str();
    let _ = reply.error();
    for key in ["version", "sku", "device", "err", "status", "connected"] {
        let _ = reply.has(key);
        let _ = reply.get_str(key);
        let _ = reply.get_string::<16>(key);
        let _ = reply.get_int(key);
        let _ = reply.get_bool(key);
    }
}

fuzz_target!(|data: &[u8]| {
    let mut session: Session<Replay<'_>, CAPACITY> = Session::new(Replay { reply: data });
    if session.connect().is_err() {
        return;
    }

    let Ok(mut req) = session.open("card.version") else {
        return;
    };
    req.add_string("fuzz", "1");
    match req.send_capture() {
        Ok(reply) => probe(reply),
        Err(_) => {
            let last = session.last_response();
            assert!(last.is_empty() || last.is_error());
            probe(last);
        }
    }

    // Same bytes into a caller buffer smaller than the session's.
    let mut small = ResponseBuffer::<32>::new();
    if let Ok(req) = session.open("hub.status") {
        if req.send_capture_into(&mut small).is_err() {
            assert!(small.is_empty() || small.is_error());
        }
    }
    probe(&small);
});
