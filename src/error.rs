//! Unified error types for the Notecard client.
//!
//! A single `Error` enum that every layer of the session converts into,
//! keeping the provisioning orchestrator's failure handling uniform.
//! All variants are `Copy` so they can be carried inside outcomes and
//! events without allocation.

use core::fmt;

use crate::notecard::transport::TransportError;

// ---------------------------------------------------------------------------
// Top-level session error
// ---------------------------------------------------------------------------

/// Every fallible Notecard operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The bus exchange failed (timeout, framing, bus fault).
    Transport(TransportError),
    /// A new request could not be started (transport not open).
    RequestOpen,
    /// The reply did not fit the capture buffer.
    ResponseOverflow,
    /// A typed getter found no field of the requested name and type.
    FieldMissingOrWrongType,
    /// The reply carried an `err` field.
    PeripheralReported,
    /// The reply was not a JSON object.
    MalformedResponse,
    /// A string field is longer than the destination capacity.
    FieldTooLong,
    /// The request could not be serialized.
    Encode,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::RequestOpen => write!(f, "request could not be opened"),
            Self::ResponseOverflow => write!(f, "response exceeds buffer capacity"),
            Self::FieldMissingOrWrongType => write!(f, "field missing or of wrong type"),
            Self::PeripheralReported => write!(f, "notecard reported an error"),
            Self::MalformedResponse => write!(f, "malformed response"),
            Self::FieldTooLong => write!(f, "field value too long"),
            Self::Encode => write!(f, "request encoding failed"),
        }
    }
}

impl std::error::Error for Error {}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Overflow => Self::ResponseOverflow,
            other => Self::Transport(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
