//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements       | Connects to               |
//! |------------|------------------|---------------------------|
//! | `hardware` | RelayPort        | ESP32 GPIO relay board    |
//! | `log_sink` | EventSink        | Serial log output         |
//! | `mqtt`     | TransportPort    | ESP-IDF MQTT client       |
//! | `wifi`     | ConnectivityPort | ESP-IDF WiFi STA          |

pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod wifi;
