//! Notecard request/response session.
//!
//! [`Session`] owns the transport, the request being built and the
//! response buffer. [`Session::open`] hands out a [`PendingRequest`] that
//! mutably borrows the session, so exactly one request can be in flight:
//! a second `open` while the first is pending does not compile.
//!
//! ```text
//!  open("hub.set") ──▶ add_* ... ──▶ send()          (fire-and-check)
//!                                └─▶ send_capture()  (parsed reply kept)
//! ```
//!
//! Dropping a `PendingRequest` without sending it discards its fields;
//! the next `open` starts from an empty request.

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::notecard::request::{Request, Value};
use crate::notecard::response::{RESPONSE_CAPACITY, ResponseBuffer};
use crate::notecard::transport::Transport;

pub struct Session<T: Transport, const N: usize = RESPONSE_CAPACITY> {
    transport: T,
    request: Request,
    response: ResponseBuffer<N>,
}

impl<T: Transport, const N: usize> Session<T, N> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            request: Request::default(),
            response: ResponseBuffer::new(),
        }
    }

    /// Open the underlying transport. Requests fail until this succeeds.
    pub fn connect(&mut self) -> Result<()> {
        self.transport.open()?;
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_open()
    }

    /// Start a new request named `name`, discarding any unsent fields.
    pub fn open(&mut self, name: &str) -> Result<PendingRequest<'_, T, N>> {
        if !self.transport.is_open() {
            warn!("{}: transport not open", name);
            return Err(Error::RequestOpen);
        }
        self.request.reset(name);
        Ok(PendingRequest { session: self })
    }

    /// The reply kept by the last successful [`PendingRequest::send_capture`].
    pub fn last_response(&self) -> &ResponseBuffer<N> {
        &self.response
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Serialize the current request and exchange it for a raw reply.
    fn transact(&mut self) -> Result<()> {
        let line = self.request.to_line()?;
        debug!(
            "notecard >> {}",
            String::from_utf8_lossy(&line).trim_end()
        );
        let transport = &mut self.transport;
        self.response.fill(|buf| transport.exchange(&line, buf))?;
        debug!("notecard << {}", self.response.as_str());
        Ok(())
    }
}

/// A request under construction. Nothing touches the bus until it is sent.
#[must_use = "a request does nothing until it is sent"]
pub struct PendingRequest<'s, T: Transport, const N: usize> {
    session: &'s mut Session<T, N>,
}

impl<'s, T: Transport, const N: usize> PendingRequest<'s, T, N> {
    pub fn add_string(&mut self, key: &str, value: &str) -> &mut Self {
        self.session.request.set(key, Value::Str(value.to_owned()));
        self
    }

    pub fn add_int(&mut self, key: &str, value: i32) -> &mut Self {
        self.session.request.set(key, Value::Int(value));
        self
    }

    pub fn add_bool(&mut self, key: &str, value: bool) -> &mut Self {
        self.session.request.set(key, Value::Bool(value));
        self
    }

    pub fn request(&self) -> &Request {
        &self.session.request
    }

    /// Send and succeed iff the Notecard acknowledges without `err`.
    /// The reply body is discarded.
    pub fn send(self) -> Result<()> {
        let session = self.session;
        session.transact()?;
        let ack = session.response.check_ack();
        session.response.clear();
        ack
    }

    /// Send and keep the parsed reply in the session buffer.
    pub fn send_capture(self) -> Result<&'s ResponseBuffer<N>> {
        let session = self.session;
        session.transact()?;
        session.response.parse()?;
        if session.response.is_error() {
            warn!("{}: {}", session.request.name(), session.response.as_str());
            return Err(Error::PeripheralReported);
        }
        let session: &'s Session<T, N> = session;
        Ok(&session.response)
    }

    /// Send and copy the reply into a caller-owned buffer.
    ///
    /// Fails with [`Error::ResponseOverflow`], leaving `out` empty, when
    /// the reply does not fit.
    pub fn send_capture_into<const M: usize>(self, out: &mut ResponseBuffer<M>) -> Result<()> {
        out.clear();
        let session = self.session;
        session.transact()?;
        let copied = out.copy_from(&session.response);
        session.response.clear();
        copied?;
        if out.is_error() {
            warn!("{}: {}", session.request.name(), out.as_str());
            return Err(Error::PeripheralReported);
        }
        Ok(())
    }
}
