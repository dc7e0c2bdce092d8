//! Peripheral drivers.

pub mod notecard_i2c;
