//! Transport abstraction: a blocking request/response exchange.
//!
//! Concrete implementations:
//! - Notecard serial-over-I2C ([`NotecardI2c`](crate::drivers::notecard_i2c::NotecardI2c))
//! - Mock transports in host tests
//!
//! The [`Session`](super::session::Session) is generic over `Transport`,
//! so swapping the bus requires zero changes to request handling.
//! Implementations never retry; retry policy belongs to the caller.

use core::fmt;

/// Errors raised by a [`Transport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// `exchange` was called before a successful `open`.
    NotOpen,
    /// The configured bus clock exceeds what the peripheral tolerates.
    ClockTooFast,
    /// The underlying bus reported a fault (NACK, arbitration loss, ...).
    Bus,
    /// No complete response arrived within the timeout.
    Timeout,
    /// The peripheral returned an inconsistent frame.
    Framing,
    /// The response did not fit the receive buffer.
    Overflow,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOpen => write!(f, "transport not open"),
            Self::ClockTooFast => write!(f, "bus clock above peripheral limit"),
            Self::Bus => write!(f, "bus fault"),
            Self::Timeout => write!(f, "timed out waiting for response"),
            Self::Framing => write!(f, "malformed frame"),
            Self::Overflow => write!(f, "response exceeds receive buffer"),
        }
    }
}

/// Byte-oriented request/response channel to the Notecard.
pub trait Transport {
    /// Initialise the link. Must succeed before [`exchange`](Self::exchange).
    fn open(&mut self) -> Result<(), TransportError>;

    /// Whether [`open`](Self::open) has completed successfully.
    fn is_open(&self) -> bool;

    /// Send `request` (one newline-terminated JSON line) and block until a
    /// complete newline-terminated reply has been written into `response`.
    ///
    /// Returns the number of reply bytes, including the terminator.
    fn exchange(&mut self, request: &[u8], response: &mut [u8]) -> Result<usize, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn open(&mut self) -> Result<(), TransportError> {
        (**self).open()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn exchange(&mut self, request: &[u8], response: &mut [u8]) -> Result<usize, TransportError> {
        (**self).exchange(request, response)
    }
}
