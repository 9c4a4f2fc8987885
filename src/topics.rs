//! MQTT topic surface for one climate zone.
//!
//! Single source of truth — every module references this table rather than
//! hard-coding topic strings. Change the zone prefix in the config and it
//! propagates everywhere.
//!
//! | Topic                       | Direction | Retained | Payload              |
//! |-----------------------------|-----------|----------|----------------------|
//! | `{zone}/device/status`      | publish   | yes      | "online" / "offline" |
//! | `{zone}/temperature/status` | subscribe | —        | `{"temp_f": n}`      |
//! | `{zone}/temperature/target` | subscribe | —        | `{"temp_f": n}`      |
//! | `{zone}/person/status`      | subscribe | —        | `{"status": b}`      |
//! | `{zone}/heater/status`      | publish   | yes      | "on" / "off"         |
//! | `{zone}/fan/status`         | publish   | yes      | "on" / "off"         |

/// Maximum length of a fully-qualified topic (zone prefix + suffix).
pub const TOPIC_MAX: usize = 64;

pub type Topic = heapless::String<TOPIC_MAX>;

/// Presence payload published on session establishment (retained).
pub const PAYLOAD_ONLINE: &[u8] = b"online";
/// Presence payload published on graceful shutdown and via last will.
pub const PAYLOAD_OFFLINE: &[u8] = b"offline";
/// Relay status payloads.
pub const PAYLOAD_ON: &[u8] = b"on";
pub const PAYLOAD_OFF: &[u8] = b"off";

/// Which subscribed topic a message arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicRoute {
    AmbientTemperature,
    TargetTemperature,
    Occupancy,
}

/// Fully-qualified topic strings for one zone, built once at startup.
#[derive(Debug, Clone)]
pub struct TopicSet {
    pub presence: Topic,
    pub ambient_temperature: Topic,
    pub target_temperature: Topic,
    pub occupancy: Topic,
    pub heater_status: Topic,
    pub fan_status: Topic,
}

impl TopicSet {
    /// Build the topic table for `zone` (e.g. "roomA").
    pub fn new(zone: &str) -> Self {
        Self {
            presence: join(zone, "device/status"),
            ambient_temperature: join(zone, "temperature/status"),
            target_temperature: join(zone, "temperature/target"),
            occupancy: join(zone, "person/status"),
            heater_status: join(zone, "heater/status"),
            fan_status: join(zone, "fan/status"),
        }
    }

    /// The three topics the controller subscribes to, in subscription order.
    pub fn subscriptions(&self) -> [&str; 3] {
        [
            self.occupancy.as_str(),
            self.ambient_temperature.as_str(),
            self.target_temperature.as_str(),
        ]
    }

    /// Map an inbound topic to its route, or `None` if it isn't ours.
    pub fn route(&self, topic: &str) -> Option<TopicRoute> {
        if topic == self.ambient_temperature.as_str() {
            Some(TopicRoute::AmbientTemperature)
        } else if topic == self.target_temperature.as_str() {
            Some(TopicRoute::TargetTemperature)
        } else if topic == self.occupancy.as_str() {
            Some(TopicRoute::Occupancy)
        } else {
            None
        }
    }
}

fn join(zone: &str, suffix: &str) -> Topic {
    let mut t = Topic::new();
    // Truncation cannot occur: zone is capped at 16 bytes by SystemConfig
    // and the longest suffix is 18 bytes.
    let _ = t.push_str(zone);
    let _ = t.push('/');
    let _ = t.push_str(suffix);
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_fully_qualified_topics() {
        let t = TopicSet::new("roomA");
        assert_eq!(t.presence.as_str(), "roomA/device/status");
        assert_eq!(t.ambient_temperature.as_str(), "roomA/temperature/status");
        assert_eq!(t.target_temperature.as_str(), "roomA/temperature/target");
        assert_eq!(t.occupancy.as_str(), "roomA/person/status");
        assert_eq!(t.heater_status.as_str(), "roomA/heater/status");
        assert_eq!(t.fan_status.as_str(), "roomA/fan/status");
    }

    #[test]
    fn routes_subscribed_topics() {
        let t = TopicSet::new("roomA");
        assert_eq!(
            t.route("roomA/temperature/status"),
            Some(TopicRoute::AmbientTemperature)
        );
        assert_eq!(
            t.route("roomA/temperature/target"),
            Some(TopicRoute::TargetTemperature)
        );
        assert_eq!(t.route("roomA/person/status"), Some(TopicRoute::Occupancy));
    }

    #[test]
    fn unknown_topics_do_not_route() {
        let t = TopicSet::new("roomA");
        assert_eq!(t.route("roomA/heater/status"), None);
        assert_eq!(t.route("roomB/temperature/status"), None);
        assert_eq!(t.route(""), None);
    }

    #[test]
    fn subscription_list_has_three_entries() {
        let t = TopicSet::new("roomA");
        let subs = t.subscriptions();
        assert_eq!(subs.len(), 3);
        for s in subs {
            assert!(t.route(s).is_some());
        }
    }
}
