//! BlueZ adapters over D-Bus.
//!
//! `BluezAdapter` runs LE discovery for the scan window and reports every
//! device heard advertising; `PairedDevicesAdapter` reports the devices BlueZ
//! already knows. Both connect to devices for their GATT table when asked to.

use super::snapshot::{self, DeviceSnapshot, GattReport};
use super::{AdapterClass, AdapterContext, ScanAdapter};
use crate::constants::CONNECT_TIMEOUT;
use crate::errors::AdapterError;
use crate::model::{DeviceRecord, GattCharacteristic, GattService};
use async_trait::async_trait;
use bluer::gatt::remote::Characteristic;
use bluer::gatt::CharacteristicFlags;
use bluer::{Adapter, AdapterEvent, Address, Device, DiscoveryFilter, DiscoveryTransport, Session};
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, warn};

const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const RESOLVE_POLL: Duration = Duration::from_millis(100);

impl From<bluer::Error> for AdapterError {
    fn from(e: bluer::Error) -> Self {
        AdapterError::Stack(e.to_string())
    }
}

/// LE advertisement scan on the default controller
#[derive(Debug, Default, Clone)]
pub struct BluezAdapter;

impl BluezAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScanAdapter for BluezAdapter {
    fn name(&self) -> &'static str {
        "bluez"
    }

    fn class(&self) -> AdapterClass {
        AdapterClass::Ble
    }

    async fn scan(&self, ctx: &AdapterContext) -> Result<Vec<DeviceRecord>, AdapterError> {
        let (_session, adapter) = open_default_adapter().await?;
        adapter
            .set_discovery_filter(DiscoveryFilter {
                transport: DiscoveryTransport::Le,
                ..Default::default()
            })
            .await?;

        let heard = listen(&adapter, ctx.duration).await?;
        debug!("LE discovery on {} heard {} devices", adapter.name(), heard.len());

        let mut found = Vec::with_capacity(heard.len());
        for address in heard {
            let Some((device, snapshot)) = read_device(&adapter, address).await else {
                continue;
            };
            // Cached devices are announced too; only a fresh reading means it advertised
            if snapshot.rssi.is_none() {
                continue;
            }
            let record = snapshot.into_record(self.name(), "BLE");
            if ctx.accepts(&record.name) {
                found.push((device, record));
            }
        }

        if ctx.connect_for_details {
            attach_details(&mut found).await;
        }
        Ok(found.into_iter().map(|(_, record)| record).collect())
    }
}

/// Devices BlueZ already knows about, paired or previously seen
#[derive(Debug, Default, Clone)]
pub struct PairedDevicesAdapter;

impl PairedDevicesAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScanAdapter for PairedDevicesAdapter {
    fn name(&self) -> &'static str {
        "bluez_paired"
    }

    fn class(&self) -> AdapterClass {
        AdapterClass::Classic
    }

    async fn scan(&self, ctx: &AdapterContext) -> Result<Vec<DeviceRecord>, AdapterError> {
        let (_session, adapter) = open_default_adapter().await?;
        let addresses = adapter.device_addresses().await?;

        let mut found = Vec::with_capacity(addresses.len());
        for address in addresses {
            let Some((device, snapshot)) = read_device(&adapter, address).await else {
                continue;
            };
            let record = snapshot.into_record(self.name(), "Classic");
            if ctx.accepts(&record.name) {
                found.push((device, record));
            }
        }

        if ctx.connect_for_details {
            attach_details(&mut found).await;
        }
        Ok(found.into_iter().map(|(_, record)| record).collect())
    }
}

/// The session must outlive every object obtained from it
async fn open_default_adapter() -> Result<(Session, Adapter), AdapterError> {
    let session = Session::new()
        .await
        .map_err(|e| AdapterError::Unavailable(format!("BlueZ is not reachable: {}", e)))?;
    let adapter = session
        .default_adapter()
        .await
        .map_err(|e| AdapterError::Unavailable(format!("no Bluetooth controller: {}", e)))?;
    adapter.set_powered(true).await?;
    Ok((session, adapter))
}

/// Addresses announced during the window, first-seen order.
/// Discovery stops when the event stream is dropped.
async fn listen(adapter: &Adapter, window: Duration) -> Result<Vec<Address>, AdapterError> {
    let mut events = Box::pin(adapter.discover_devices().await?);
    let window = tokio::time::sleep(window);
    tokio::pin!(window);

    let mut heard = Vec::new();
    loop {
        tokio::select! {
            _ = &mut window => break,
            event = events.next() => match event {
                Some(AdapterEvent::DeviceAdded(address)) => {
                    if !heard.contains(&address) {
                        heard.push(address);
                    }
                }
                Some(_) => {}
                None => break,
            },
        }
    }
    Ok(heard)
}

/// A device can vanish between its announcement and this read
async fn read_device(adapter: &Adapter, address: Address) -> Option<(Device, DeviceSnapshot)> {
    let device = match adapter.device(address) {
        Ok(device) => device,
        Err(e) => {
            debug!("Skipping {}: {}", address, e);
            return None;
        }
    };
    match snapshot_of(&device).await {
        Ok(snapshot) => Some((device, snapshot)),
        Err(e) => {
            debug!("Skipping {}: {}", address, e);
            None
        }
    }
}

async fn snapshot_of(device: &Device) -> bluer::Result<DeviceSnapshot> {
    Ok(DeviceSnapshot {
        address: device.address().to_string(),
        name: device.name().await?,
        alias: Some(device.alias().await?),
        rssi: device.rssi().await?,
        tx_power: device.tx_power().await?,
        manufacturer_data: device
            .manufacturer_data()
            .await?
            .unwrap_or_default()
            .into_iter()
            .collect(),
        service_data: device
            .service_data()
            .await?
            .unwrap_or_default()
            .into_iter()
            .map(|(uuid, data)| (uuid.to_string(), data))
            .collect(),
        service_uuids: device
            .uuids()
            .await?
            .unwrap_or_default()
            .into_iter()
            .map(|uuid| uuid.to_string())
            .collect(),
        class: device.class().await?,
        appearance: device.appearance().await?,
        paired: device.is_paired().await?,
        connected: device.is_connected().await?,
    })
}

/// Connect to as many devices as the budget allows and store what was read
async fn attach_details(found: &mut [(Device, DeviceRecord)]) {
    let budget = snapshot::connection_budget(found.len());
    for (device, record) in found.iter_mut().take(budget) {
        debug!("Connecting to {} for details", record.address);
        let outcome = read_details(device).await;
        if let Err(e) = &outcome {
            warn!("No details for {}: {}", record.address, e);
        }
        snapshot::apply_connection(record, outcome);
    }
}

/// Connect, wait for service resolution and read the GATT table.
/// Devices that were connected beforehand stay connected.
async fn read_details(device: &Device) -> Result<GattReport, String> {
    let was_connected = device.is_connected().await.unwrap_or(false);

    let outcome = tokio::time::timeout(CONNECT_TIMEOUT, async {
        if !was_connected {
            device.connect().await?;
        }
        while !device.is_services_resolved().await? {
            tokio::time::sleep(RESOLVE_POLL).await;
        }
        read_gatt(device).await
    })
    .await;

    if !was_connected {
        match tokio::time::timeout(DISCONNECT_TIMEOUT, device.disconnect()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("Disconnecting {} failed: {}", device.address(), e),
            Err(_) => debug!("Disconnecting {} timed out", device.address()),
        }
    }

    match outcome {
        Ok(Ok(report)) => Ok(report),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!(
            "connection timed out after {}s",
            CONNECT_TIMEOUT.as_secs()
        )),
    }
}

async fn read_gatt(device: &Device) -> bluer::Result<GattReport> {
    let mut report = GattReport::default();
    for service in device.services().await? {
        let uuid = service.uuid().await?.to_string();
        report.services.push(GattService {
            description: snapshot::gatt_description(&uuid),
            handle: service.id(),
            uuid,
        });

        for characteristic in service.characteristics().await? {
            if report.mtu_size.is_none() {
                report.mtu_size = characteristic
                    .mtu()
                    .await
                    .ok()
                    .and_then(|mtu| u16::try_from(mtu).ok());
            }
            report
                .characteristics
                .push(read_characteristic(&characteristic).await?);
        }
    }
    Ok(report)
}

/// BlueZ names GATT objects after their attribute handle
async fn read_characteristic(characteristic: &Characteristic) -> bluer::Result<GattCharacteristic> {
    let uuid = characteristic.uuid().await?.to_string();
    let flags = characteristic.flags().await?;

    let (value, value_error) = if flags.read {
        match characteristic.read().await {
            Ok(value) => (Some(value), None),
            Err(e) => (None, Some(e.to_string())),
        }
    } else {
        (None, None)
    };

    Ok(GattCharacteristic {
        description: snapshot::gatt_description(&uuid),
        handle: characteristic.id(),
        properties: property_labels(&flags),
        uuid,
        value,
        value_error,
    })
}

fn property_labels(flags: &CharacteristicFlags) -> Vec<String> {
    [
        (flags.broadcast, "broadcast"),
        (flags.read, "read"),
        (flags.write_without_response, "write-without-response"),
        (flags.write, "write"),
        (flags.notify, "notify"),
        (flags.indicate, "indicate"),
        (flags.authenticated_signed_writes, "authenticated-signed-writes"),
        (flags.extended_properties, "extended-properties"),
    ]
    .into_iter()
    .filter(|(set, _)| *set)
    .map(|(_, label)| label.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_labels_follow_flags() {
        let flags = CharacteristicFlags {
            read: true,
            notify: true,
            ..Default::default()
        };
        assert_eq!(property_labels(&flags), vec!["read", "notify"]);
        assert!(property_labels(&CharacteristicFlags::default()).is_empty());
    }
}
