//! Application core: provisioning and maintenance logic, zero direct I/O.
//!
//! All interaction with the Notecard goes through a
//! [`Session`](crate::notecard::Session); settings and host-visible events
//! go through the **port traits** defined in [`ports`], keeping this layer
//! fully testable without real peripherals.

pub mod events;
pub mod maintenance;
pub mod ports;
pub mod provisioning;
