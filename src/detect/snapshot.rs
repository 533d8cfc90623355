//! Plain copies of what the Bluetooth stack knows about a device.
//!
//! The BlueZ adapters read device properties and GATT tables over D-Bus into
//! these structs; turning them into [`DeviceRecord`]s happens here, without a
//! Bluetooth stack in the way.

use super::apply_device_class;
use crate::constants::{CONNECTION_BUDGET, CONNECTION_BUDGET_THRESHOLD, GATT_DESCRIPTIONS};
use crate::ident;
use crate::model::{ConnectionInfo, DeviceRecord, GattCharacteristic, GattService};
use std::collections::{BTreeMap, BTreeSet};

const BLUETOOTH_BASE_UUID_SUFFIX: &str = "-0000-1000-8000-00805f9b34fb";

/// Device properties as cached by the stack at the end of a scan window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceSnapshot {
    pub address: String,
    pub name: Option<String>,
    pub alias: Option<String>,
    pub rssi: Option<i16>,
    pub tx_power: Option<i16>,
    pub manufacturer_data: BTreeMap<u16, Vec<u8>>,
    pub service_data: BTreeMap<String, Vec<u8>>,
    pub service_uuids: BTreeSet<String>,
    pub class: Option<u32>,
    pub appearance: Option<u16>,
    pub paired: bool,
    pub connected: bool,
}

impl DeviceSnapshot {
    /// Advertised name, else an alias the stack did not derive from the address
    pub fn reported_name(&self) -> String {
        let candidate = self
            .name
            .as_deref()
            .or(self.alias.as_deref())
            .map(str::trim)
            .unwrap_or_default();
        if candidate.is_empty() || ident::same_address(candidate, &self.address) {
            String::new()
        } else {
            candidate.to_string()
        }
    }

    pub fn into_record(self, adapter: &str, device_type: &str) -> DeviceRecord {
        let address = ident::normalize(&self.address);
        let name = self.reported_name();
        let mut record = DeviceRecord::new(address.clone(), address, name)
            .with_detected_by(adapter)
            .with_device_type(device_type);

        record.rssi = self.rssi;
        record.tx_power = self.tx_power;
        record.appearance = self.appearance;
        record.manufacturer_data = self.manufacturer_data;
        record.service_uuids = self
            .service_uuids
            .into_iter()
            .map(|uuid| uuid.to_lowercase())
            .collect();
        record.service_data = self
            .service_data
            .into_iter()
            .map(|(uuid, data)| (uuid.to_lowercase(), data))
            .collect();
        if let Some(cod) = self.class {
            apply_device_class(&mut record, cod);
        }
        record.raw_info = format!(
            "Paired: {}, Connected: {}",
            yes_no(self.paired),
            yes_no(self.connected)
        );
        record
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// GATT table and link parameters read from a connected device
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GattReport {
    pub mtu_size: Option<u16>,
    pub services: Vec<GattService>,
    pub characteristics: Vec<GattCharacteristic>,
}

/// Store the result of a connection attempt on `record`.
/// A failed attempt keeps the error and leaves the GATT lists unset.
pub fn apply_connection(record: &mut DeviceRecord, outcome: Result<GattReport, String>) {
    match outcome {
        Ok(report) => {
            record.connected_info = Some(ConnectionInfo {
                connected: true,
                mtu_size: report.mtu_size,
                error: None,
            });
            record.services = Some(report.services);
            record.characteristics = Some(report.characteristics);
        }
        Err(error) => {
            record.connected_info = Some(ConnectionInfo {
                connected: false,
                mtu_size: None,
                error: Some(error),
            });
        }
    }
}

/// How many of `discovered` devices to connect to
pub fn connection_budget(discovered: usize) -> usize {
    if discovered > CONNECTION_BUDGET_THRESHOLD {
        CONNECTION_BUDGET
    } else {
        discovered
    }
}

/// Assigned name for a service or characteristic UUID, "Unknown" otherwise
pub fn gatt_description(uuid: &str) -> String {
    short_uuid(uuid)
        .and_then(|short| GATT_DESCRIPTIONS.iter().find(|(id, _)| *id == short))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// The 16-bit alias of a UUID built on the Bluetooth base UUID
fn short_uuid(uuid: &str) -> Option<u16> {
    let uuid = uuid.to_lowercase();
    let head = uuid.strip_suffix(BLUETOOTH_BASE_UUID_SUFFIX)?;
    let short = head.strip_prefix("0000")?;
    u16::from_str_radix(short, 16).ok()
}
