use super::{AdapterClass, AdapterContext, ScanAdapter};
use crate::errors::AdapterError;
use crate::model::DeviceRecord;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Replays a capture: a JSON array of device records saved from an earlier scan
#[derive(Debug, Clone)]
pub struct ReplayAdapter {
    path: PathBuf,
    class: AdapterClass,
}

impl ReplayAdapter {
    pub fn new(path: impl Into<PathBuf>, class: AdapterClass) -> Self {
        Self {
            path: path.into(),
            class,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ScanAdapter for ReplayAdapter {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn class(&self) -> AdapterClass {
        self.class
    }

    async fn scan(&self, ctx: &AdapterContext) -> Result<Vec<DeviceRecord>, AdapterError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let records: Vec<DeviceRecord> = serde_json::from_str(&contents)?;
        debug!("Replaying {} records from {}", records.len(), self.path.display());
        Ok(ctx.retain_matching(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ctx(filter: Option<&str>) -> AdapterContext {
        AdapterContext {
            duration: Duration::from_secs(1),
            filter_name: filter.map(str::to_string),
            connect_for_details: false,
        }
    }

    #[tokio::test]
    async fn replays_capture_with_filter() {
        let path = std::env::temp_dir().join(format!("bluescout-replay-{}.json", std::process::id()));
        let capture = r#"[
            {"id": "a", "address": "00:11:22:33:44:55", "name": "Galaxy Buds", "rssi": -50,
             "manufacturer_data": {"117": [1, 2]}},
            {"id": "b", "address": "00:11:22:33:44:66", "name": "Keyboard"}
        ]"#;
        tokio::fs::write(&path, capture).await.unwrap();

        let adapter = ReplayAdapter::new(&path, AdapterClass::Ble);
        let all = adapter.scan(&ctx(None)).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].manufacturer_data.get(&117), Some(&vec![1, 2]));
        assert_eq!(all[1].rssi, None);

        let buds = adapter.scan(&ctx(Some("BUDS"))).await.unwrap();
        assert_eq!(buds.len(), 1);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_capture_is_an_io_error() {
        let adapter = ReplayAdapter::new("/nonexistent/capture.json", AdapterClass::Platform);
        let err = adapter.scan(&ctx(None)).await.unwrap_err();
        assert!(matches!(err, AdapterError::Io(_)));
    }
}
