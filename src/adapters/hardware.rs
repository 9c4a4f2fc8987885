//! Relay board adapter — bridges the physical relays to [`RelayPort`].
//!
//! Owns both relay drivers. This is the only module in the system that
//! touches actuator hardware. On non-espidf targets the underlying drivers
//! use cfg-gated simulation stubs.

use crate::app::ports::RelayPort;
use crate::drivers::relay::RelayDriver;
use crate::error::ActuatorError;
use crate::pins;

/// Concrete adapter for the two-channel relay board.
pub struct RelayBoardAdapter {
    heater: RelayDriver,
    fan: RelayDriver,
}

impl RelayBoardAdapter {
    pub fn new() -> Self {
        Self {
            heater: RelayDriver::new(pins::RELAY_HEATER_GPIO, "heater"),
            fan: RelayDriver::new(pins::RELAY_FAN_GPIO, "fan"),
        }
    }

    /// Configure both pins and drive them to the safe-off level.
    pub fn init(&mut self) -> Result<(), ActuatorError> {
        self.heater.init()?;
        self.fan.init()?;
        Ok(())
    }
}

impl RelayPort for RelayBoardAdapter {
    fn set_heater(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.heater.set(on)
    }

    fn set_fan(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.fan.set(on)
    }
}
