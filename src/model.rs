use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A single observation of a nearby Bluetooth device, possibly the merge of
/// several observations made by different adapters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceRecord {
    /// Adapter-assigned identifier, unique per adapter only
    pub id: String,
    /// The `id` as first received, before any merge
    pub source_id: String,
    pub address: String,
    pub name: String,
    pub friendly_name: String,
    /// Signal strength in dBm, absent when the adapter has no radio measurement
    pub rssi: Option<i16>,

    pub manufacturer_data: BTreeMap<u16, Vec<u8>>,
    pub service_uuids: BTreeSet<String>,
    pub service_data: BTreeMap<String, Vec<u8>>,
    pub tx_power: Option<i16>,
    pub appearance: Option<u16>,
    pub is_connectable: Option<bool>,

    /// Detection modality, becomes a composite such as `BLE+Classic` after merges
    pub device_type: String,
    pub company_name: String,

    // Classic inquiry details
    pub device_class: Option<u32>,
    pub major_device_class: String,
    pub minor_device_class: String,
    pub service_classes: Vec<String>,

    pub detected_by: String,
    /// Every `detected_by` value absorbed into this record, first-seen order
    pub detection_sources: Vec<String>,
    /// Every original identifier that now maps to this record, first-seen order
    pub merged_from: Vec<String>,

    pub connected_info: Option<ConnectionInfo>,
    pub services: Option<Vec<GattService>>,
    pub characteristics: Option<Vec<GattCharacteristic>>,

    /// Adapter-specific debug text
    pub raw_info: String,
    pub detection_note: String,
}

impl DeviceRecord {
    pub fn new(id: impl Into<String>, address: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            source_id: id.clone(),
            id,
            address: address.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_rssi(mut self, rssi: i16) -> Self {
        self.rssi = Some(rssi);
        self
    }

    pub fn with_detected_by(mut self, adapter: impl Into<String>) -> Self {
        self.detected_by = adapter.into();
        self
    }

    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = device_type.into();
        self
    }

    /// RSSI used for ordering; unmeasured records rank below any real reading.
    pub fn rssi_or(&self, sentinel: i16) -> i16 {
        self.rssi.unwrap_or(sentinel)
    }

    /// Number of distinct adapters that contributed to this record
    pub fn source_count(&self) -> usize {
        let mut sources: BTreeSet<&str> =
            self.detection_sources.iter().map(String::as_str).collect();
        if !self.detected_by.is_empty() {
            sources.insert(self.detected_by.as_str());
        }
        sources.len()
    }
}

/// Details gathered by connecting to a device, only when the caller opts in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionInfo {
    pub connected: bool,
    pub mtu_size: Option<u16>,
    pub error: Option<String>,
}

/// A primary service read from a connected device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GattService {
    pub uuid: String,
    pub description: String,
    pub handle: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GattCharacteristic {
    pub uuid: String,
    pub description: String,
    pub handle: u16,
    /// Property flags such as `read` and `notify`
    pub properties: Vec<String>,
    /// Only attempted for readable characteristics
    pub value: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_error: Option<String>,
}

/// Catalog entry for a registered MAC address prefix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    pub company: &'static str,
    pub device_type: &'static str,
    pub model: &'static str,
    pub friendly_name: &'static str,
}
