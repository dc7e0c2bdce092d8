//! AT console event sink.
//!
//! Writes host-visible events as CRLF-terminated AT lines
//! (`+EVT:V=...`, `:EVT NO PUID`, ...) to any `std::io::Write`:
//! the UART console on the device, a `Vec<u8>` in tests.

use std::io::Write;

use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

pub struct AtEventSink<W: Write> {
    out: W,
}

impl<W: Write> AtEventSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for AtEventSink<W> {
    fn emit(&mut self, event: &AppEvent) {
        if !event.is_host_visible() {
            return;
        }
        let written = write!(self.out, "{}\r\n", event).and_then(|()| self.out.flush());
        if let Err(e) = written {
            warn!("AT console write failed: {}", e);
        }
    }
}
