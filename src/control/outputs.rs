//! Actuation gateway — applies desired relay levels idempotently.
//!
//! Owns the mirrored actuator state (`heater_on`, `fan_on`), which always
//! reflects the last *successfully applied* physical level. For each relay
//! independently: no change means no write and no publish; a change means
//! GPIO write first, then a retained "on"/"off" status publish — observers
//! never see a status claim that precedes the real state.
//!
//! A failed GPIO write leaves the mirrored state untouched, so the next
//! decision cycle retries the same transition.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, QosLevel, RelayPort, TransportPort};
use crate::control::policy::RelayCommand;
use crate::topics::{TopicSet, PAYLOAD_OFF, PAYLOAD_ON};

/// Which actuator a gateway operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayId {
    Heater,
    Fan,
}

/// Idempotent bridge between desired relay configuration and the physical
/// outputs. Both relays start mirrored off, matching the hardware's
/// power-on safe default.
#[derive(Debug, Default)]
pub struct OutputGateway {
    heater_on: bool,
    fan_on: bool,
}

impl OutputGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heater_on(&self) -> bool {
        self.heater_on
    }

    pub fn fan_on(&self) -> bool {
        self.fan_on
    }

    /// Apply a desired configuration. Heater is driven before fan, matching
    /// the publish order observers expect during a cold-start heat-up.
    pub fn apply(
        &mut self,
        desired: RelayCommand,
        relays: &mut impl RelayPort,
        transport: &mut impl TransportPort,
        topics: &TopicSet,
        sink: &mut impl EventSink,
    ) {
        self.drive(RelayId::Heater, desired.heater_on, relays, transport, topics, sink);
        self.drive(RelayId::Fan, desired.fan_on, relays, transport, topics, sink);
    }

    fn drive(
        &mut self,
        relay: RelayId,
        on: bool,
        relays: &mut impl RelayPort,
        transport: &mut impl TransportPort,
        topics: &TopicSet,
        sink: &mut impl EventSink,
    ) {
        let current = match relay {
            RelayId::Heater => self.heater_on,
            RelayId::Fan => self.fan_on,
        };
        if current == on {
            return;
        }

        let written = match relay {
            RelayId::Heater => relays.set_heater(on),
            RelayId::Fan => relays.set_fan(on),
        };
        if let Err(e) = written {
            warn!("{:?} write failed: {e} — retrying next cycle", relay);
            return;
        }

        let (mirror, status_topic) = match relay {
            RelayId::Heater => (&mut self.heater_on, topics.heater_status.as_str()),
            RelayId::Fan => (&mut self.fan_on, topics.fan_status.as_str()),
        };
        *mirror = on;
        info!("{:?} -> {}", relay, if on { "ON" } else { "OFF" });

        let payload = if on { PAYLOAD_ON } else { PAYLOAD_OFF };
        if let Err(e) = transport.publish(status_topic, payload, QosLevel::AtLeastOnce, true) {
            // Retained status will catch up on the next real transition.
            warn!("{:?} status publish failed: {e}", relay);
        }

        sink.emit(&AppEvent::RelayChanged { relay, on });
    }
}
