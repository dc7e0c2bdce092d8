//! Notecard session layer.
//!
//! ```text
//!  Request ──▶ Session ──▶ Transport ──▶ I2C bus ──▶ Notecard
//!                 ▲                                     │
//!                 └──── ResponseBuffer ◀────────────────┘
//! ```
//!
//! Everything here is synchronous and blocking. No layer retries.

pub mod request;
pub mod response;
pub mod session;
pub mod transport;

pub use request::{Request, Value};
pub use response::{RESPONSE_CAPACITY, ResponseBuffer};
pub use session::{PendingRequest, Session};
pub use transport::{Transport, TransportError};
