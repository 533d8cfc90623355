use super::{run_tool, AdapterClass, AdapterContext, ScanAdapter};
use crate::errors::AdapterError;
use crate::model::DeviceRecord;
use async_trait::async_trait;
use tracing::debug;

/// PnP enumeration reports no radio measurement, so every device gets this
pub const PNP_SYNTHETIC_RSSI: i16 = -60;

const SCRIPT: &str = r#"
$OutputEncoding = [Console]::OutputEncoding = [System.Text.Encoding]::UTF8
Get-PnpDevice -Class Bluetooth | Where-Object { $_.Status -eq 'OK' } | ForEach-Object {
    Write-Output ("Device: " + $_.FriendlyName + " | ID: " + $_.DeviceID + " | Status: " + $_.Status)
}
"#;

/// Devices Windows has enumerated under the Bluetooth device class
#[derive(Debug, Default, Clone)]
pub struct PnpAdapter;

impl PnpAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScanAdapter for PnpAdapter {
    fn name(&self) -> &'static str {
        "windows_pnp"
    }

    fn class(&self) -> AdapterClass {
        AdapterClass::Platform
    }

    async fn scan(&self, ctx: &AdapterContext) -> Result<Vec<DeviceRecord>, AdapterError> {
        let stdout = run_tool("powershell", &["-NoProfile", "-Command", SCRIPT]).await?;
        let records = parse_pnp_output(&stdout);
        debug!("Get-PnpDevice reported {} devices", records.len());
        Ok(ctx.retain_matching(records))
    }
}

/// Parse `Device: <name> | ID: <id> | Status: <status>` lines
pub fn parse_pnp_output(output: &str) -> Vec<DeviceRecord> {
    output.lines().filter_map(parse_pnp_line).collect()
}

fn parse_pnp_line(line: &str) -> Option<DeviceRecord> {
    let rest = line.trim().strip_prefix("Device:")?;
    let (name, rest) = rest.split_once(" | ID:")?;
    let (device_id, status) = rest.rsplit_once(" | Status:")?;
    let (name, device_id, status) = (name.trim(), device_id.trim(), status.trim());
    if device_id.is_empty() {
        return None;
    }

    let id = format!("WIN-PNP-{}", device_id.replace(['&', '\\'], "-"));
    let address: String = id.chars().take(17).collect();

    let mut record = DeviceRecord::new(id, address, name)
        .with_rssi(PNP_SYNTHETIC_RSSI)
        .with_detected_by("windows_pnp")
        .with_device_type("Windows-PnP");
    record.friendly_name = name.to_string();
    record.company_name = "Unknown (Windows)".to_string();
    record.raw_info = format!("ID: {}, Status: {}", device_id, status);
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pnp_lines() {
        let output = "\
Device: Freebox Player | ID: BTHENUM\\{0000110B}_LOCALMFG&0002\\7&1A2B | Status: OK
garbage line
Device: Generic Bluetooth Radio | ID: USB\\VID_8087&PID_0029\\5&3A | Status: OK
";
        let records = parse_pnp_output(output);
        assert_eq!(records.len(), 2);

        let player = &records[0];
        assert_eq!(player.id, "WIN-PNP-BTHENUM-{0000110B}_LOCALMFG-0002-7-1A2B");
        assert_eq!(player.address, "WIN-PNP-BTHENUM-{");
        assert_eq!(player.name, "Freebox Player");
        assert_eq!(player.friendly_name, "Freebox Player");
        assert_eq!(player.rssi, Some(-60));
        assert_eq!(player.company_name, "Unknown (Windows)");
        assert_eq!(player.device_type, "Windows-PnP");
        assert_eq!(
            player.raw_info,
            "ID: BTHENUM\\{0000110B}_LOCALMFG&0002\\7&1A2B, Status: OK"
        );
    }

    #[test]
    fn skips_lines_without_an_id() {
        assert!(parse_pnp_output("Device: Mouse | ID:  | Status: OK").is_empty());
    }
}
