use crate::config::{normalize_filter, ScanConfig};
use crate::constants::{MAJOR_DEVICE_CLASSES, SERVICE_CLASSES};
use crate::errors::AdapterError;
use crate::model::DeviceRecord;
use async_trait::async_trait;
use std::fmt;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

#[cfg(target_os = "linux")]
pub mod bluez;
pub mod pnp;
pub mod replay;
pub mod snapshot;

#[cfg(target_os = "linux")]
pub use bluez::{BluezAdapter, PairedDevicesAdapter};
pub use pnp::PnpAdapter;
pub use replay::ReplayAdapter;

/// Kind of radio or enumeration an adapter relies on.
///
/// The declaration order is the order sequential scans run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AdapterClass {
    Ble,
    Classic,
    Platform,
}

impl fmt::Display for AdapterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AdapterClass::Ble => "BLE",
            AdapterClass::Classic => "Classic",
            AdapterClass::Platform => "Platform",
        };
        f.write_str(label)
    }
}

/// Parameters every adapter receives for one scan
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterContext {
    pub duration: Duration,
    pub filter_name: Option<String>,
    pub connect_for_details: bool,
}

impl AdapterContext {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            duration: config.duration,
            filter_name: normalize_filter(config.filter_name.as_deref()),
            connect_for_details: config.connect_for_details,
        }
    }

    /// Case-insensitive substring match on the raw name; no filter keeps everything
    pub fn accepts(&self, name: &str) -> bool {
        match &self.filter_name {
            Some(filter) => name.to_lowercase().contains(&filter.to_lowercase()),
            None => true,
        }
    }

    pub fn retain_matching(&self, mut records: Vec<DeviceRecord>) -> Vec<DeviceRecord> {
        records.retain(|record| self.accepts(&record.name));
        records
    }
}

/// A source of device observations.
///
/// Each adapter reports devices in its own identifier namespace; the engine
/// takes care of stamping, enrichment and reconciliation.
#[async_trait]
pub trait ScanAdapter: Send + Sync {
    /// Short label stored in `detected_by`
    fn name(&self) -> &'static str;

    fn class(&self) -> AdapterClass;

    /// Listen for `ctx.duration` and return every device seen
    async fn scan(&self, ctx: &AdapterContext) -> Result<Vec<DeviceRecord>, AdapterError>;
}

/// Adapters that make sense on the running operating system
pub fn platform_adapters() -> Vec<Arc<dyn ScanAdapter>> {
    let mut adapters: Vec<Arc<dyn ScanAdapter>> = Vec::new();
    #[cfg(target_os = "linux")]
    {
        adapters.push(Arc::new(BluezAdapter::new()));
        adapters.push(Arc::new(PairedDevicesAdapter::new()));
    }
    if cfg!(target_os = "windows") {
        adapters.push(Arc::new(PnpAdapter::new()));
    }
    adapters
}

/// Decoded Class of Device field of a classic inquiry result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceClass {
    pub major: String,
    pub minor: String,
    pub service_classes: Vec<String>,
}

/// Split a 24-bit Class of Device into its major, minor and service parts
pub fn decode_device_class(cod: u32) -> DeviceClass {
    let major_value = (cod & 0x1F00) >> 8;
    let minor_value = cod & 0xFF;
    let service_value = (cod & 0xFF_E000) >> 13;

    let major = MAJOR_DEVICE_CLASSES
        .iter()
        .find(|(value, _)| *value == major_value)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| format!("Unknown ({})", major_value));

    let service_classes = (0..11)
        .filter(|bit| service_value & (1 << bit) != 0)
        .map(|bit| {
            SERVICE_CLASSES
                .iter()
                .find(|(value, _)| *value == bit)
                .map(|(_, label)| label.to_string())
                .unwrap_or_else(|| format!("Unknown ({})", bit))
        })
        .collect();

    DeviceClass {
        major,
        minor: format!("0x{:02x}", minor_value),
        service_classes,
    }
}

/// Store the raw and decoded Class of Device on a record
pub fn apply_device_class(record: &mut DeviceRecord, cod: u32) {
    let class = decode_device_class(cod);
    record.device_class = Some(cod);
    record.major_device_class = class.major;
    record.minor_device_class = class.minor;
    record.service_classes = class.service_classes;
}

/// Run a platform tool and return its stdout.
///
/// A missing executable means the platform lacks the capability. The child is
/// killed if the returned future is dropped, so the engine's timeouts and
/// cancellation reach the process.
pub(crate) async fn run_tool(program: &str, args: &[&str]) -> Result<String, AdapterError> {
    debug!("Running {} {}", program, args.join(" "));
    let output = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => AdapterError::Unavailable(format!("{} is not installed", program)),
            _ => AdapterError::Process(format!("failed to run `{}`: {}", program, e)),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AdapterError::Process(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_headset_class() {
        // Audio/Video major, headset minor, Audio + Rendering services
        let class = decode_device_class(0x240404);
        assert_eq!(class.major, "Audio/Video");
        assert_eq!(class.minor, "0x04");
        assert_eq!(class.service_classes, vec!["Rendering", "Audio"]);
    }

    #[test]
    fn unknown_major_class_is_labelled() {
        let class = decode_device_class(0x000C00);
        assert_eq!(class.major, "Unknown (12)");
        assert!(class.service_classes.is_empty());
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let ctx = AdapterContext {
            duration: Duration::from_secs(1),
            filter_name: Some("buds".to_string()),
            connect_for_details: false,
        };
        assert!(ctx.accepts("Galaxy Buds Pro"));
        assert!(!ctx.accepts("Keyboard"));

        let open = AdapterContext::from_config(&ScanConfig::default());
        assert!(open.accepts(""));
    }

    #[test]
    fn sentinel_filter_set_directly_on_config_is_ignored() {
        let config = ScanConfig {
            filter_name: Some("null".to_string()),
            ..ScanConfig::default()
        };
        let ctx = AdapterContext::from_config(&config);
        assert_eq!(ctx.filter_name, None);
        assert!(ctx.accepts("Galaxy Buds"));
    }

    #[test]
    fn sequential_order_follows_class_declaration() {
        let mut classes = vec![AdapterClass::Platform, AdapterClass::Ble, AdapterClass::Classic];
        classes.sort();
        assert_eq!(
            classes,
            vec![AdapterClass::Ble, AdapterClass::Classic, AdapterClass::Platform]
        );
    }
}
