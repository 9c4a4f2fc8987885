//! System configuration parameters
//!
//! All tunable parameters for the ZoneTherm controller. The zone prefix
//! selects the MQTT topic namespace; everything else tunes the control
//! and session behaviour.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Zone ---
    /// MQTT topic namespace prefix (e.g. "roomA" → "roomA/heater/status").
    pub zone: heapless::String<16>,

    // --- Control ---
    /// Half-width of the setpoint deadband (°F). 0.0 reproduces the
    /// exact-equality control law; widen to suppress relay chatter
    /// near the setpoint.
    pub deadband_f: f32,

    // --- Broker ---
    /// MQTT broker URI (e.g. "mqtts://host:8883").
    pub broker_uri: heapless::String<64>,
    /// Broker credentials. Empty strings mean anonymous access.
    pub username: heapless::String<32>,
    pub password: heapless::String<32>,

    // --- Session ---
    /// MQTT keep-alive interval (seconds)
    pub keepalive_secs: u16,
    /// Warn if subscription acks are still outstanding after this long
    /// (seconds). Non-fatal — the orchestrator keeps waiting.
    pub sub_ack_warn_secs: u16,

    // --- Timing ---
    /// Liveness tick interval (milliseconds)
    pub tick_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut zone = heapless::String::new();
        // 16-byte capacity always fits the literal.
        let _ = zone.push_str("roomA");

        let mut broker_uri = heapless::String::new();
        let _ = broker_uri.push_str("mqtts://broker.hivemq.com:8883");

        Self {
            zone,
            broker_uri,
            username: heapless::String::new(),
            password: heapless::String::new(),
            deadband_f: 0.0,
            keepalive_secs: 10,
            sub_ack_warn_secs: 30,
            tick_interval_ms: 1000, // 1 Hz
            telemetry_interval_secs: 60,
        }
    }
}

impl SystemConfig {
    /// Ticks between telemetry reports, derived from the two intervals.
    pub fn telemetry_interval_ticks(&self) -> u64 {
        u64::from(self.telemetry_interval_secs) * 1000 / u64::from(self.tick_interval_ms).max(1)
    }

    /// Ticks after which a stuck session handshake draws a warning.
    pub fn sub_ack_warn_ticks(&self) -> u64 {
        u64::from(self.sub_ack_warn_secs) * 1000 / u64::from(self.tick_interval_ms).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert_eq!(c.zone.as_str(), "roomA");
        assert!(c.deadband_f >= 0.0);
        assert!(c.keepalive_secs > 0);
        assert!(c.tick_interval_ms > 0);
        assert!(c.telemetry_interval_secs > 0);
    }

    #[test]
    fn default_deadband_preserves_exact_equality_law() {
        let c = SystemConfig::default();
        assert_eq!(c.deadband_f, 0.0);
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.zone, c2.zone);
        assert!((c.deadband_f - c2.deadband_f).abs() < 0.001);
        assert_eq!(c.keepalive_secs, c2.keepalive_secs);
    }

    #[test]
    fn interval_ticks_exact_for_odd_tick_rates() {
        let mut c = SystemConfig::default();
        c.tick_interval_ms = 250;
        c.telemetry_interval_secs = 60;
        assert_eq!(c.telemetry_interval_ticks(), 240);

        c.tick_interval_ms = 3;
        c.telemetry_interval_secs = u32::MAX;
        assert_eq!(
            c.telemetry_interval_ticks(),
            u64::from(u32::MAX) * 1000 / 3
        );

        c.tick_interval_ms = 1000;
        c.sub_ack_warn_secs = 30;
        assert_eq!(c.sub_ack_warn_ticks(), 30);
    }

    #[test]
    fn timing_ratios_make_sense() {
        let c = SystemConfig::default();
        assert!(
            c.tick_interval_ms < c.telemetry_interval_secs * 1000,
            "liveness tick should be faster than telemetry"
        );
        assert!(c.telemetry_interval_ticks() >= 1);
        assert!(c.sub_ack_warn_ticks() >= 1);
    }
}
