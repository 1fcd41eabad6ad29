/// The Things Network v3 uplink envelope, as delivered by the broker bridge.
///
/// Only the parts this service consumes are modeled; the rest of the
/// envelope (gateway metadata, settings, signal quality) passes through
/// serde untouched.
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Debug, Clone, Deserialize)]
pub struct UplinkEnvelope {
    pub end_device_ids: EndDeviceIds,
    #[serde(default)]
    pub received_at: Option<String>,
    pub uplink_message: UplinkMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndDeviceIds {
    pub device_id: String,
    pub application_ids: ApplicationIds,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationIds {
    pub application_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UplinkMessage {
    #[serde(default)]
    pub f_port: Option<u8>,
    /// Raw frame bytes, base64 encoded by the network server.
    #[serde(default)]
    pub frm_payload: Option<String>,
}

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("uplink message carries no frame payload")]
    MissingPayload,
    #[error("invalid base64 frame payload: {0}")]
    Payload(#[from] base64::DecodeError),
}

impl UplinkEnvelope {
    /// Raw frame bytes of this uplink.
    pub fn frame_bytes(&self) -> Result<Vec<u8>, EnvelopeError> {
        let encoded = self
            .uplink_message
            .frm_payload
            .as_deref()
            .ok_or(EnvelopeError::MissingPayload)?;
        Ok(general_purpose::STANDARD.decode(encoded)?)
    }

    /// LoRaWAN port of this uplink. Join accepts and status messages come
    /// without one; those decode as port 0.
    pub fn port(&self) -> u8 {
        self.uplink_message.f_port.unwrap_or(0)
    }

    /// Timestamp to record the reading under: the network server's
    /// `received_at` when it parses, otherwise the moment of processing.
    pub fn recorded_at(&self) -> OffsetDateTime {
        self.received_at
            .as_deref()
            .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
            .unwrap_or_else(OffsetDateTime::now_utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(frm_payload: &str) -> String {
        format!(
            r#"{{
              "end_device_ids": {{
                "device_id": "cube-cell-1",
                "application_ids": {{ "application_id": "beehive-sensors" }}
              }},
              "received_at": "2021-06-14T04:00:05.979512945Z",
              "uplink_message": {{
                "f_port": 1,
                {frm_payload}
                "rx_metadata": [{{ "gateway_ids": {{ "gateway_id": "eui-b827ebfffe39d98c" }} }}]
              }}
            }}"#
        )
    }

    #[test]
    fn extracts_frame_bytes_and_port() {
        let frame: [u8; 19] = [
            0x00, 0x88, 0x01, 0x25, 0x00, 0x8E, 0x12, 0xAC, 0x08, 0x0E, 0x08, 0x14, 0x08, 0x9E,
            0x07, 0xC9, 0x07, 0x91, 0x07,
        ];
        let encoded = general_purpose::STANDARD.encode(frame);
        let json = sample(&format!(r#""frm_payload": "{}","#, encoded));

        let envelope: UplinkEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(envelope.end_device_ids.device_id, "cube-cell-1");
        assert_eq!(
            envelope.end_device_ids.application_ids.application_id,
            "beehive-sensors"
        );
        assert_eq!(envelope.port(), 1);
        assert_eq!(envelope.frame_bytes().unwrap(), frame);
    }

    #[test]
    fn payload_free_uplink_is_reported_not_guessed() {
        let envelope: UplinkEnvelope = serde_json::from_str(&sample("")).unwrap();
        assert!(matches!(
            envelope.frame_bytes(),
            Err(EnvelopeError::MissingPayload)
        ));
    }

    #[test]
    fn broken_base64_is_reported() {
        let json = sample(r#""frm_payload": "not base64!!","#);
        let envelope: UplinkEnvelope = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            envelope.frame_bytes(),
            Err(EnvelopeError::Payload(_))
        ));
    }

    #[test]
    fn recorded_at_prefers_the_network_timestamp() {
        let envelope: UplinkEnvelope = serde_json::from_str(&sample("")).unwrap();
        let recorded = envelope.recorded_at();
        assert_eq!(recorded.year(), 2021);
        assert_eq!(recorded.month() as u8, 6);
        assert_eq!(recorded.day(), 14);
    }

    #[test]
    fn missing_port_defaults_to_zero() {
        let json = r#"{
          "end_device_ids": {
            "device_id": "test-987",
            "application_ids": { "application_id": "beehive-sensors" }
          },
          "uplink_message": {}
        }"#;
        let envelope: UplinkEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.port(), 0);
        assert!(envelope.received_at.is_none());
    }
}
