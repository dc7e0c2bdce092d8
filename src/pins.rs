//! GPIO assignments for the Notecard carrier on the WisBlock base board.
//!
//! Single source of truth; the entry point references these rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// I²C bus to the Notecard (address 0x17)
// ---------------------------------------------------------------------------

pub const NOTECARD_SDA_GPIO: i32 = 4;
pub const NOTECARD_SCL_GPIO: i32 = 5;
