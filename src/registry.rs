/// Device registry mapping device ids to their dashboard targets.
use std::fs;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ThingSpeakTarget {
    pub channel_id: u64,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    pub dev_id: String,
    /// Devices without a channel are recorded but not forwarded.
    #[serde(default)]
    pub thingspeak: Option<ThingSpeakTarget>,
}

/// Lookup seam the uplink handler depends on, so tests can inject a fixed
/// table instead of a deployment file.
pub trait DeviceRegistry {
    fn find_device(&self, dev_id: &str) -> Option<&DeviceConfig>;
}

/// Registry backed by a static JSON device table.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    devices: Vec<DeviceConfig>,
}

impl StaticRegistry {
    pub fn new(devices: Vec<DeviceConfig>) -> Self {
        StaticRegistry { devices }
    }

    /// Load the device table from a `devices.json` deployment file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read device table {}: {}", path, e))?;
        let devices: Vec<DeviceConfig> = serde_json::from_str(&raw)
            .map_err(|e| format!("Invalid device table {}: {}", path, e))?;
        Ok(StaticRegistry { devices })
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl DeviceRegistry for StaticRegistry {
    fn find_device(&self, dev_id: &str) -> Option<&DeviceConfig> {
        self.devices.iter().find(|device| device.dev_id == dev_id)
    }
}
