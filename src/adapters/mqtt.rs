//! MQTT link adapter.
//!
//! Implements [`TransportPort`] over the ESP-IDF MQTT client and forwards
//! every broker callback into the serialized [`events`](crate::events)
//! queue as a [`LinkEvent`]. The broker task never touches control state
//! directly — the queue is the only crossing point.
//!
//! The last-will contract is registered here at connect time: if the
//! session drops without a graceful disconnect, the broker publishes a
//! retained `"offline"` to the presence topic on our behalf.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real `EspMqttClient`.
//! - **all other targets**: a loopback stub that records operations and
//!   hands out message ids, for host-side runs.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::{QosLevel, TransportPort};
use crate::config::SystemConfig;
use crate::error::CommsError;
#[cfg(target_os = "espidf")]
use crate::error::Error;
use crate::events::MessageId;
use crate::topics::TopicSet;

#[cfg(target_os = "espidf")]
use crate::topics::PAYLOAD_OFFLINE;

pub struct MqttLink {
    #[cfg(target_os = "espidf")]
    client: esp_idf_svc::mqtt::client::EspMqttClient<'static>,
    #[cfg(not(target_os = "espidf"))]
    sim: SimLink,
}

impl MqttLink {
    /// Connect to the configured broker, registering the presence last
    /// will. Link events start flowing into the queue as soon as the
    /// session comes up.
    pub fn connect(config: &SystemConfig, topics: &TopicSet) -> crate::Result<Self> {
        Self::platform_connect(config, topics)
    }

    /// Best-effort graceful disconnect. The presence "offline" publish is
    /// the service's job and must already have happened.
    pub fn disconnect(self) {
        info!("MQTT: disconnecting");
        // Dropping the client tears the session down.
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(config: &SystemConfig, topics: &TopicSet) -> crate::Result<Self> {
        use esp_idf_svc::mqtt::client::{
            EspMqttClient, LwtConfiguration, MqttClientConfiguration, QoS,
        };

        let conf = MqttClientConfiguration {
            client_id: Some("zonetherm"),
            keep_alive_interval: Some(core::time::Duration::from_secs(
                config.keepalive_secs as u64,
            )),
            username: (!config.username.is_empty()).then(|| config.username.as_str()),
            password: (!config.password.is_empty()).then(|| config.password.as_str()),
            lwt: Some(LwtConfiguration {
                topic: topics.presence.as_str(),
                payload: PAYLOAD_OFFLINE,
                qos: QoS::AtLeastOnce,
                retain: true,
            }),
            ..Default::default()
        };

        let client = EspMqttClient::new(config.broker_uri.as_str(), &conf, |event| {
            espidf::forward(event.payload());
        })
        .map_err(|e| {
            warn!("MQTT: client init failed: {e}");
            Error::Comms(CommsError::MqttConnectFailed)
        })?;

        info!("MQTT: connecting to {}", config.broker_uri);
        Ok(Self { client })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(config: &SystemConfig, _topics: &TopicSet) -> crate::Result<Self> {
        info!("MQTT(sim): loopback link for {}", config.broker_uri);
        Ok(Self {
            sim: SimLink::new(),
        })
    }
}

impl TransportPort for MqttLink {
    #[cfg(target_os = "espidf")]
    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QosLevel,
        retain: bool,
    ) -> Result<MessageId, CommsError> {
        // enqueue() hands the message to the client task without blocking
        // the control thread.
        self.client
            .enqueue(topic, espidf::qos(qos), retain, payload)
            .map_err(|e| {
                warn!("MQTT: publish to '{topic}' failed: {e}");
                CommsError::MqttPublishFailed
            })
    }

    #[cfg(target_os = "espidf")]
    fn subscribe(&mut self, topic: &str, qos: QosLevel) -> Result<MessageId, CommsError> {
        self.client.subscribe(topic, espidf::qos(qos)).map_err(|e| {
            warn!("MQTT: subscribe to '{topic}' failed: {e}");
            CommsError::MqttSubscribeFailed
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        _qos: QosLevel,
        retain: bool,
    ) -> Result<MessageId, CommsError> {
        self.sim.record(SimOp::Publish {
            topic: topic.to_string(),
            payload: payload.to_vec(),
            retain,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn subscribe(&mut self, topic: &str, _qos: QosLevel) -> Result<MessageId, CommsError> {
        self.sim.record(SimOp::Subscribe {
            topic: topic.to_string(),
        })
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF callback plumbing
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod espidf {
    use esp_idf_svc::mqtt::client::{EventPayload, QoS};
    use log::{debug, warn};

    use crate::app::ports::QosLevel;
    use crate::error::CommsError;
    use crate::events::{push_event, LinkEvent, Payload};
    use crate::topics::Topic;

    pub fn qos(level: QosLevel) -> QoS {
        match level {
            QosLevel::AtMostOnce => QoS::AtMostOnce,
            QosLevel::AtLeastOnce => QoS::AtLeastOnce,
            QosLevel::ExactlyOnce => QoS::ExactlyOnce,
        }
    }

    /// Translate one broker callback into a link event. Runs on the MQTT
    /// client task — must not touch control state, only the queue.
    pub fn forward(payload: EventPayload<'_>) {
        let event = match payload {
            EventPayload::Connected(_) => Some(LinkEvent::Up),
            EventPayload::Disconnected => Some(LinkEvent::Down),
            EventPayload::Subscribed(id) => Some(LinkEvent::SubAck(id)),
            EventPayload::Published(id) => Some(LinkEvent::PubAck(id)),
            EventPayload::Received {
                topic: Some(topic),
                data,
                ..
            } => inbound(topic, data),
            EventPayload::Error(e) => {
                warn!("MQTT: client error: {e}");
                None
            }
            other => {
                debug!("MQTT: ignoring event {:?}", other);
                None
            }
        };

        if let Some(event) = event {
            if !push_event(event) {
                warn!("MQTT: {}", CommsError::EventQueueFull);
            }
        }
    }

    fn inbound(topic: &str, data: &[u8]) -> Option<LinkEvent> {
        let Ok(topic) = Topic::try_from(topic) else {
            warn!("MQTT: inbound topic too long, dropped");
            return None;
        };
        let Ok(payload) = Payload::from_slice(data) else {
            warn!("MQTT: inbound payload on '{topic}' too large, dropped");
            return None;
        };
        Some(LinkEvent::Message { topic, payload })
    }
}

// ───────────────────────────────────────────────────────────────
// Host-side loopback stub
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, PartialEq)]
pub enum SimOp {
    Publish {
        topic: String,
        payload: Vec<u8>,
        retain: bool,
    },
    Subscribe {
        topic: String,
    },
}

#[cfg(not(target_os = "espidf"))]
struct SimLink {
    next_id: MessageId,
    log: Vec<SimOp>,
}

#[cfg(not(target_os = "espidf"))]
impl SimLink {
    fn new() -> Self {
        Self {
            next_id: 1,
            log: Vec::new(),
        }
    }

    fn record(&mut self, op: SimOp) -> Result<MessageId, CommsError> {
        let id = self.next_id;
        self.next_id += 1;
        self.log.push(op);
        Ok(id)
    }
}

#[cfg(not(target_os = "espidf"))]
impl MqttLink {
    /// Operations recorded by the loopback stub, oldest first.
    pub fn sim_log(&self) -> &[SimOp] {
        &self.sim.log
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::topics::TopicSet;

    #[test]
    fn sim_link_assigns_monotonic_ids() {
        let config = SystemConfig::default();
        let topics = TopicSet::new("roomA");
        let mut link = MqttLink::connect(&config, &topics).unwrap();

        let a = link
            .subscribe("roomA/person/status", QosLevel::AtLeastOnce)
            .unwrap();
        let b = link
            .publish("roomA/device/status", b"online", QosLevel::AtLeastOnce, true)
            .unwrap();
        assert!(b > a);
        assert_eq!(link.sim_log().len(), 2);
        assert_eq!(
            link.sim_log()[1],
            SimOp::Publish {
                topic: "roomA/device/status".into(),
                payload: b"online".to_vec(),
                retain: true,
            }
        );
    }
}
