//! Fact decoder — maps a (topic, payload) pair to zero or one [`Fact`].
//!
//! Payloads are small JSON documents published by the upstream sensors:
//! `{"temp_f": 65.0}` on the temperature topics, `{"status": true}` on the
//! occupancy topic. Decoding is deliberately lenient: a malformed document,
//! a missing field, or a mistyped field yields no fact and the message is
//! dropped with a debug log. A broken upstream publisher must never halt
//! control.

use log::debug;
use serde::Deserialize;

use crate::topics::{TopicRoute, TopicSet};

/// A decoded inbound fact. Each variant maps to exactly one
/// [`ControlState`](crate::control::state::ControlState) field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fact {
    AmbientTemperature(f32),
    TargetTemperature(f32),
    Occupancy(bool),
}

#[derive(Deserialize)]
struct TemperaturePayload {
    temp_f: f32,
}

#[derive(Deserialize)]
struct OccupancyPayload {
    status: bool,
}

/// Decode one inbound message. Returns `None` for unroutable topics and
/// undecodable payloads.
pub fn decode(topics: &TopicSet, topic: &str, payload: &[u8]) -> Option<Fact> {
    let route = topics.route(topic)?;

    let fact = match route {
        TopicRoute::AmbientTemperature => serde_json::from_slice::<TemperaturePayload>(payload)
            .ok()
            .map(|p| Fact::AmbientTemperature(p.temp_f)),
        TopicRoute::TargetTemperature => serde_json::from_slice::<TemperaturePayload>(payload)
            .ok()
            .map(|p| Fact::TargetTemperature(p.temp_f)),
        TopicRoute::Occupancy => serde_json::from_slice::<OccupancyPayload>(payload)
            .ok()
            .map(|p| Fact::Occupancy(p.status)),
    };

    if fact.is_none() {
        debug!(
            "decode: dropped undecodable payload on '{}' ({} bytes)",
            topic,
            payload.len()
        );
    }
    fact
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics() -> TopicSet {
        TopicSet::new("roomA")
    }

    #[test]
    fn decodes_ambient_temperature() {
        let f = decode(&topics(), "roomA/temperature/status", br#"{"temp_f": 65.5}"#);
        assert_eq!(f, Some(Fact::AmbientTemperature(65.5)));
    }

    #[test]
    fn decodes_target_temperature() {
        let f = decode(&topics(), "roomA/temperature/target", br#"{"temp_f": 70}"#);
        assert_eq!(f, Some(Fact::TargetTemperature(70.0)));
    }

    #[test]
    fn decodes_occupancy_both_ways() {
        let t = decode(&topics(), "roomA/person/status", br#"{"status": true}"#);
        assert_eq!(t, Some(Fact::Occupancy(true)));
        let f = decode(&topics(), "roomA/person/status", br#"{"status": false}"#);
        assert_eq!(f, Some(Fact::Occupancy(false)));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let f = decode(
            &topics(),
            "roomA/temperature/status",
            br#"{"temp_f": 68.0, "unit": "F", "seq": 12}"#,
        );
        assert_eq!(f, Some(Fact::AmbientTemperature(68.0)));
    }

    #[test]
    fn malformed_json_is_dropped() {
        assert_eq!(decode(&topics(), "roomA/temperature/status", b"{"), None);
        assert_eq!(decode(&topics(), "roomA/person/status", b""), None);
        assert_eq!(decode(&topics(), "roomA/person/status", b"not json"), None);
    }

    #[test]
    fn mistyped_field_is_dropped() {
        // A string where a number belongs.
        assert_eq!(
            decode(&topics(), "roomA/temperature/status", br#"{"temp_f": "warm"}"#),
            None
        );
        assert_eq!(
            decode(&topics(), "roomA/person/status", br#"{"status": 1}"#),
            None
        );
    }

    #[test]
    fn missing_field_is_dropped() {
        assert_eq!(
            decode(&topics(), "roomA/temperature/status", br#"{"temp_c": 20.0}"#),
            None
        );
        assert_eq!(decode(&topics(), "roomA/person/status", br#"{}"#), None);
    }

    #[test]
    fn unroutable_topic_yields_nothing() {
        assert_eq!(
            decode(&topics(), "roomB/temperature/status", br#"{"temp_f": 65}"#),
            None
        );
        assert_eq!(
            decode(&topics(), "roomA/heater/status", br#""on""#),
            None
        );
    }
}
