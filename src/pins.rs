//! GPIO pin assignments for the ZoneTherm relay board.
//!
//! Single source of truth — the relay driver references this module rather
//! than hard-coding pin numbers. Change a pin here and it propagates
//! everywhere.

/// Digital output: heater relay coil (active HIGH).
pub const RELAY_HEATER_GPIO: i32 = 26;

/// Digital output: fan relay coil (active HIGH).
pub const RELAY_FAN_GPIO: i32 = 25;
