#![allow(dead_code)]

use async_trait::async_trait;
use bluescout::config::ScanConfig;
use bluescout::detect::{AdapterClass, AdapterContext, ScanAdapter};
use bluescout::errors::AdapterError;
use bluescout::model::DeviceRecord;
use std::sync::Arc;
use std::time::Duration;

/// Create a test device record with minimal fields
pub fn create_test_record(id: &str, address: &str, name: &str) -> DeviceRecord {
    DeviceRecord::new(id, address, name)
}

/// Create a test device record with a signal strength
pub fn create_test_record_with_rssi(id: &str, address: &str, name: &str, rssi: Option<i16>) -> DeviceRecord {
    let mut record = DeviceRecord::new(id, address, name);
    record.rssi = rssi;
    record
}

/// Short scan with every adapter class enabled
pub fn test_config() -> ScanConfig {
    ScanConfig::default().with_duration_secs(1.0).unwrap()
}

pub fn shared<A: ScanAdapter + 'static>(adapter: A) -> Arc<dyn ScanAdapter> {
    Arc::new(adapter)
}

/// Adapter that returns a fixed list of records
pub struct MockAdapter {
    name: &'static str,
    class: AdapterClass,
    records: Vec<DeviceRecord>,
}

impl MockAdapter {
    pub fn new(name: &'static str, class: AdapterClass, records: Vec<DeviceRecord>) -> Self {
        Self { name, class, records }
    }
}

#[async_trait]
impl ScanAdapter for MockAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn class(&self) -> AdapterClass {
        self.class
    }

    async fn scan(&self, ctx: &AdapterContext) -> Result<Vec<DeviceRecord>, AdapterError> {
        Ok(ctx.retain_matching(self.records.clone()))
    }
}

/// Adapter whose platform capability is missing
pub struct FailingAdapter {
    name: &'static str,
    class: AdapterClass,
}

impl FailingAdapter {
    pub fn new(name: &'static str, class: AdapterClass) -> Self {
        Self { name, class }
    }
}

#[async_trait]
impl ScanAdapter for FailingAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn class(&self) -> AdapterClass {
        self.class
    }

    async fn scan(&self, _ctx: &AdapterContext) -> Result<Vec<DeviceRecord>, AdapterError> {
        Err(AdapterError::Unavailable(format!("{} is not installed", self.name)))
    }
}

/// Adapter that takes `delay` before reporting its records
pub struct SlowAdapter {
    name: &'static str,
    class: AdapterClass,
    delay: Duration,
    records: Vec<DeviceRecord>,
}

impl SlowAdapter {
    pub fn new(name: &'static str, class: AdapterClass, delay: Duration, records: Vec<DeviceRecord>) -> Self {
        Self {
            name,
            class,
            delay,
            records,
        }
    }
}

#[async_trait]
impl ScanAdapter for SlowAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn class(&self) -> AdapterClass {
        self.class
    }

    async fn scan(&self, _ctx: &AdapterContext) -> Result<Vec<DeviceRecord>, AdapterError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.records.clone())
    }
}

/// Adapter that crashes mid-scan
pub struct PanickingAdapter;

#[async_trait]
impl ScanAdapter for PanickingAdapter {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn class(&self) -> AdapterClass {
        AdapterClass::Platform
    }

    async fn scan(&self, _ctx: &AdapterContext) -> Result<Vec<DeviceRecord>, AdapterError> {
        panic!("driver crashed");
    }
}
