//! Relay coil driver (one binary GPIO output).
//!
//! Drives a single relay coil active-HIGH and mirrors the last level it
//! actually wrote. The gateway, not this driver, decides whether a write is
//! redundant — this is a dumb actuator.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: configures the pin and writes real GPIO levels.
//! On host/test: tracks state in-memory only.

use log::debug;

use crate::error::ActuatorError;

pub struct RelayDriver {
    gpio: i32,
    label: &'static str,
    on: bool,
}

impl RelayDriver {
    pub fn new(gpio: i32, label: &'static str) -> Self {
        Self {
            gpio,
            label,
            on: false,
        }
    }

    /// Configure the pin as an output and drive it low (relay open).
    pub fn init(&mut self) -> Result<(), ActuatorError> {
        self.platform_init()?;
        self.platform_write(false)?;
        self.on = false;
        debug!("relay '{}' initialised on GPIO{} (off)", self.label, self.gpio);
        Ok(())
    }

    /// Write the coil level. The mirror is updated only on success.
    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.platform_write(on)?;
        self.on = on;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_init(&self) -> Result<(), ActuatorError> {
        use esp_idf_sys::{gpio_mode_t_GPIO_MODE_OUTPUT, gpio_reset_pin, gpio_set_direction, ESP_OK};
        unsafe {
            if gpio_reset_pin(self.gpio) != ESP_OK {
                return Err(ActuatorError::PinConfigFailed);
            }
            if gpio_set_direction(self.gpio, gpio_mode_t_GPIO_MODE_OUTPUT) != ESP_OK {
                return Err(ActuatorError::PinConfigFailed);
            }
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_init(&self) -> Result<(), ActuatorError> {
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_write(&self, on: bool) -> Result<(), ActuatorError> {
        use esp_idf_sys::{gpio_set_level, ESP_OK};
        let level = u32::from(on);
        if unsafe { gpio_set_level(self.gpio, level) } != ESP_OK {
            return Err(ActuatorError::GpioWriteFailed);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_write(&self, on: bool) -> Result<(), ActuatorError> {
        debug!("relay '{}' (sim) -> {}", self.label, if on { "ON" } else { "OFF" });
        Ok(())
    }
}
