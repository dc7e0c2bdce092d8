//! Capacity-bounded Notecard response buffer with typed field getters.
//!
//! The buffer holds the raw reply line exactly as received (terminator
//! included, which counts against the capacity) and, once parsed, the
//! flat JSON object it carries. A reply that does not fit is rejected with
//! [`Error::ResponseOverflow`] and leaves the buffer empty: getters never
//! observe a truncated payload.

use log::warn;

use crate::error::{Error, Result};
use crate::notecard::transport::TransportError;

/// Response ceiling of the reference deployment.
pub const RESPONSE_CAPACITY: usize = 4096;

/// Field the Notecard uses to report a failed request.
const ERROR_KEY: &str = "err";

type Fields = serde_json::Map<String, serde_json::Value>;

pub struct ResponseBuffer<const N: usize = RESPONSE_CAPACITY> {
    raw: heapless::Vec<u8, N>,
    fields: Option<Fields>,
}

impl<const N: usize> ResponseBuffer<N> {
    pub fn new() -> Self {
        Self {
            raw: heapless::Vec::new(),
            fields: None,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Raw reply length in bytes, terminator included.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn clear(&mut self) {
        self.raw.clear();
        self.fields = None;
    }

    /// The reply text without its line terminator.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.payload()).unwrap_or_default()
    }

    /// The `err` string of the last parsed reply, if any.
    pub fn error(&self) -> Option<&str> {
        self.get_str(ERROR_KEY).ok()
    }

    /// Whether the last parsed reply carries `err`, whatever its type.
    pub fn is_error(&self) -> bool {
        self.has(ERROR_KEY)
    }

    /// Whether the last parsed reply contains `name` at all.
    pub fn has(&self, name: &str) -> bool {
        self.fields.as_ref().is_some_and(|f| f.contains_key(name))
    }

    pub fn get_str(&self, name: &str) -> Result<&str> {
        self.field(name)?
            .as_str()
            .ok_or(Error::FieldMissingOrWrongType)
    }

    /// Copy a string field into a fixed-capacity string.
    ///
    /// Fails with [`Error::FieldTooLong`] rather than truncating.
    pub fn get_string<const L: usize>(&self, name: &str) -> Result<heapless::String<L>> {
        let value = self.get_str(name)?;
        let mut out = heapless::String::new();
        out.push_str(value).map_err(|()| Error::FieldTooLong)?;
        Ok(out)
    }

    pub fn get_int(&self, name: &str) -> Result<i32> {
        self.field(name)?
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or(Error::FieldMissingOrWrongType)
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.field(name)?
            .as_bool()
            .ok_or(Error::FieldMissingOrWrongType)
    }

    // ── Crate-internal fill / parse ───────────────────────────

    /// Let `receive` write a reply straight into the backing storage.
    pub(crate) fn fill<F>(&mut self, receive: F) -> Result<()>
    where
        F: FnOnce(&mut [u8]) -> core::result::Result<usize, TransportError>,
    {
        self.clear();
        // Cannot fail: N is the backing capacity.
        let _ = self.raw.resize_default(N);
        match receive(&mut self.raw[..]) {
            Ok(len) if len <= N => {
                self.raw.truncate(len);
                Ok(())
            }
            Ok(_) => {
                self.raw.clear();
                Err(Error::ResponseOverflow)
            }
            Err(e) => {
                self.raw.clear();
                Err(e.into())
            }
        }
    }

    /// Replace the contents with a copy of `other`'s raw reply and parse it.
    pub(crate) fn copy_from<const M: usize>(&mut self, other: &ResponseBuffer<M>) -> Result<()> {
        self.clear();
        if self.raw.extend_from_slice(&other.raw).is_err() {
            self.raw.clear();
            return Err(Error::ResponseOverflow);
        }
        self.parse()
    }

    /// Parse the raw reply into fields. On failure the buffer is emptied.
    pub(crate) fn parse(&mut self) -> Result<()> {
        match serde_json::from_slice::<Fields>(self.payload()) {
            Ok(fields) => {
                self.fields = Some(fields);
                Ok(())
            }
            Err(_) => {
                self.clear();
                Err(Error::MalformedResponse)
            }
        }
    }

    /// Check a reply for an `err` member without keeping the parsed fields.
    pub(crate) fn check_ack(&self) -> Result<()> {
        let fields: Fields =
            serde_json::from_slice(self.payload()).map_err(|_| Error::MalformedResponse)?;
        match fields.get(ERROR_KEY) {
            Some(err) => {
                warn!("notecard: {}", err);
                Err(Error::PeripheralReported)
            }
            None => Ok(()),
        }
    }

    fn payload(&self) -> &[u8] {
        let mut end = self.raw.len();
        while end > 0 && matches!(self.raw[end - 1], b'\n' | b'\r') {
            end -= 1;
        }
        &self.raw[..end]
    }

    fn field(&self, name: &str) -> Result<&serde_json::Value> {
        self.fields
            .as_ref()
            .and_then(|f| f.get(name))
            .ok_or(Error::FieldMissingOrWrongType)
    }
}

impl<const N: usize> Default for ResponseBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for ResponseBuffer<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResponseBuffer")
            .field("capacity", &N)
            .field("payload", &self.as_str())
            .finish()
    }
}
