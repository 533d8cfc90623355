//! Output formatting: ranking, compact summaries, JSON and the terminal table.

use crate::constants::MISSING_RSSI_SENTINEL;
use crate::engine::AdapterOutcome;
use crate::model::DeviceRecord;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Strongest signal first; records without a measurement sort last.
/// Equal signals keep their relative order.
pub fn rank_by_rssi(mut devices: Vec<DeviceRecord>) -> Vec<DeviceRecord> {
    devices.sort_by_key(|device| Reverse(device.rssi.unwrap_or(i16::MIN)));
    devices
}

/// Compact view of a device for API-style responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub id: String,
    pub name: String,
    pub address: String,
    pub rssi: Option<i16>,
    pub manufacturer_data: BTreeMap<u16, Vec<u8>>,
}

impl From<&DeviceRecord> for DeviceSummary {
    fn from(device: &DeviceRecord) -> Self {
        let name = [&device.friendly_name, &device.name]
            .into_iter()
            .find(|n| !n.is_empty())
            .unwrap_or(&device.address)
            .clone();
        Self {
            id: device.id.clone(),
            name,
            address: device.address.clone(),
            rssi: device.rssi,
            manufacturer_data: device.manufacturer_data.clone(),
        }
    }
}

/// Full scan result as serialized for callers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub devices: Vec<DeviceRecord>,
}

impl ScanReport {
    pub fn new(devices: Vec<DeviceRecord>) -> Self {
        Self {
            devices: rank_by_rssi(devices),
        }
    }

    pub fn summaries(&self) -> Vec<DeviceSummary> {
        self.devices.iter().map(DeviceSummary::from).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `[1, 2, 255]` as `"01 02 ff"`
pub fn bytes_to_hex_string(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn signal_label(rssi: Option<i16>) -> String {
    match rssi {
        Some(rssi) if rssi > MISSING_RSSI_SENTINEL => format!("{} dBm", rssi),
        Some(rssi) => format!("{} dBm (weak)", rssi),
        None => "—".to_string(),
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "—"
    } else {
        value
    }
}

/// Terminal table of reconciled devices
pub fn render_table(devices: &[DeviceRecord]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .apply_modifier(UTF8_ROUND_CORNERS);

    table.set_header(vec!["Name", "Address", "RSSI", "Company", "Type", "Sources"]);

    for device in devices {
        let name = if device.friendly_name.is_empty() {
            &device.name
        } else {
            &device.friendly_name
        };
        let mut sources = device.detection_sources.clone();
        if sources.is_empty() && !device.detected_by.is_empty() {
            sources.push(device.detected_by.clone());
        }

        let name_cell = if device.source_count() > 1 {
            Cell::new(or_dash(name)).add_attribute(Attribute::Bold)
        } else {
            Cell::new(or_dash(name))
        };

        table.add_row(vec![
            name_cell,
            Cell::new(or_dash(&device.address)),
            Cell::new(signal_label(device.rssi)),
            Cell::new(or_dash(&device.company_name)),
            Cell::new(or_dash(&device.device_type)),
            Cell::new(or_dash(&sources.join(", "))),
        ]);
    }

    table.to_string()
}

/// Per-adapter results table, shown under the device table
pub fn render_outcomes(outcomes: &[AdapterOutcome]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(vec!["Adapter", "Records", "Status"]);

    for outcome in outcomes {
        table.add_row(vec![
            Cell::new(&outcome.adapter),
            Cell::new(outcome.records),
            Cell::new(outcome.error.as_deref().unwrap_or("ok")),
        ]);
    }

    table.to_string()
}
