use crate::config::ScanConfig;
use crate::db::{catalog, oui};
use crate::detect::{platform_adapters, AdapterClass, AdapterContext, ScanAdapter};
use crate::errors::{AdapterError, BluetoothScanError, Result};
use crate::ident;
use crate::model::DeviceRecord;
use crate::names;
use crate::reconcile::Reconciler;
use crate::report::rank_by_rssi;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// What one adapter contributed to a scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdapterOutcome {
    pub adapter: String,
    pub records: usize,
    pub error: Option<String>,
}

impl AdapterOutcome {
    fn succeeded(adapter: &str, records: usize) -> Self {
        Self {
            adapter: adapter.to_string(),
            records,
            error: None,
        }
    }

    fn failed(adapter: &str, error: &AdapterError) -> Self {
        Self {
            adapter: adapter.to_string(),
            records: 0,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Reconciled devices together with per-adapter bookkeeping
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Canonical records, strongest signal first
    pub devices: Vec<DeviceRecord>,
    pub outcomes: Vec<AdapterOutcome>,
    pub elapsed: Duration,
}

/// Aborts the spawned adapter tasks when the scan is dropped or cancelled
struct TaskGuard<T>(Vec<JoinHandle<T>>);

impl<T> Drop for TaskGuard<T> {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Scan orchestrator: runs the adapters and reconciles what they report
pub struct ScanEngine {
    adapters: Vec<Arc<dyn ScanAdapter>>,
}

impl ScanEngine {
    pub fn new(adapters: Vec<Arc<dyn ScanAdapter>>) -> Self {
        Self { adapters }
    }

    /// Engine with the adapters available on the running OS
    pub fn with_platform_adapters() -> Self {
        Self::new(platform_adapters())
    }

    pub fn adapters(&self) -> &[Arc<dyn ScanAdapter>] {
        &self.adapters
    }

    /// Adapters whose class is switched on, in sequential run order
    fn enabled_adapters(&self, config: &ScanConfig) -> Vec<Arc<dyn ScanAdapter>> {
        let mut enabled: Vec<Arc<dyn ScanAdapter>> = self
            .adapters
            .iter()
            .filter(|adapter| match adapter.class() {
                AdapterClass::Ble => config.include_ble,
                AdapterClass::Classic => config.include_classic,
                AdapterClass::Platform => config.include_platform,
            })
            .cloned()
            .collect();
        enabled.sort_by_key(|adapter| adapter.class());
        enabled
    }

    /// Run a scan and return the reconciled devices, strongest signal first
    pub async fn scan(&self, config: &ScanConfig) -> Result<Vec<DeviceRecord>> {
        Ok(self.scan_detailed(config).await?.devices)
    }

    pub async fn scan_detailed(&self, config: &ScanConfig) -> Result<ScanOutcome> {
        self.scan_detailed_until(config, std::future::pending()).await
    }

    /// Like [`scan`](Self::scan), but gives up as soon as `cancel` resolves.
    ///
    /// Cancellation aborts every running adapter and returns
    /// [`BluetoothScanError::Cancelled`]; nothing collected so far is returned.
    pub async fn scan_until<F>(&self, config: &ScanConfig, cancel: F) -> Result<Vec<DeviceRecord>>
    where
        F: Future<Output = ()>,
    {
        Ok(self.scan_detailed_until(config, cancel).await?.devices)
    }

    pub async fn scan_detailed_until<F>(&self, config: &ScanConfig, cancel: F) -> Result<ScanOutcome>
    where
        F: Future<Output = ()>,
    {
        config.validate()?;
        let started = Instant::now();
        let adapters = self.enabled_adapters(config);
        debug!(
            "Starting scan: duration={:?} filter={:?} ble={} classic={} platform={} dedup={} parallel={} connect={} adapters={}",
            config.duration,
            config.filter_name,
            config.include_ble,
            config.include_classic,
            config.include_platform,
            config.deduplicate,
            config.parallel,
            config.connect_for_details,
            adapters.len()
        );
        if adapters.is_empty() {
            warn!("No adapters enabled for this scan");
        }

        let ctx = Arc::new(AdapterContext::from_config(config));
        let mut reconciler = Reconciler::from_config(config);
        let mut outcomes = Vec::with_capacity(adapters.len());

        let collect = async {
            if config.parallel {
                collect_parallel(&adapters, &ctx, config, &mut reconciler, &mut outcomes).await;
            } else {
                collect_sequential(&adapters, &ctx, config, &mut reconciler, &mut outcomes).await;
            }
        };

        tokio::select! {
            biased;
            _ = cancel => {
                warn!("Scan cancelled");
                return Err(BluetoothScanError::Cancelled);
            }
            _ = collect => {}
        }

        let canonical = reconciler.len();
        let devices = tokio::task::spawn_blocking(move || rank_by_rssi(reconciler.finish()))
            .await
            .map_err(|e| BluetoothScanError::ScanFailed(format!("reconciliation failed: {}", e)))?;

        let elapsed = started.elapsed();
        info!(
            "Scan finished in {:.1?}: {} devices ({} before final pass) from {}/{} adapters",
            elapsed,
            devices.len(),
            canonical,
            outcomes.iter().filter(|o| o.is_success()).count(),
            outcomes.len()
        );

        Ok(ScanOutcome {
            devices,
            outcomes,
            elapsed,
        })
    }
}

type AdapterResult = std::result::Result<Vec<DeviceRecord>, AdapterError>;

async fn run_adapter(adapter: &dyn ScanAdapter, ctx: &AdapterContext, limit: Duration) -> AdapterResult {
    debug!("Adapter {} started", adapter.name());
    match tokio::time::timeout(limit, adapter.scan(ctx)).await {
        Ok(result) => result,
        Err(_) => Err(AdapterError::Timeout {
            adapter: adapter.name().to_string(),
            seconds: limit.as_secs_f64(),
        }),
    }
}

/// Every adapter at once; results are folded in completion order
async fn collect_parallel(
    adapters: &[Arc<dyn ScanAdapter>],
    ctx: &Arc<AdapterContext>,
    config: &ScanConfig,
    reconciler: &mut Reconciler,
    outcomes: &mut Vec<AdapterOutcome>,
) {
    let (tx, mut rx) = mpsc::channel(adapters.len().max(1));
    let limit = config.adapter_timeout();
    let mut tasks = TaskGuard(Vec::with_capacity(adapters.len()));

    for (slot, adapter) in adapters.iter().enumerate() {
        let adapter = adapter.clone();
        let ctx = ctx.clone();
        let tx = tx.clone();
        tasks.0.push(tokio::spawn(async move {
            let result = run_adapter(adapter.as_ref(), &ctx, limit).await;
            let _ = tx.send((slot, result)).await;
        }));
    }
    drop(tx);

    let mut pending = vec![true; adapters.len()];
    let deadline = tokio::time::sleep(config.effective_overall_timeout(adapters.len()));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some((slot, result)) => {
                    pending[slot] = false;
                    fold(adapters[slot].as_ref(), result, reconciler, outcomes);
                }
                None => break,
            },
            _ = &mut deadline => {
                warn!("Overall scan timeout reached, aborting remaining adapters");
                let waited = config.effective_overall_timeout(adapters.len());
                expire_pending(adapters, &tasks, &mut pending, &mut rx, waited, reconciler, outcomes);
                return;
            }
        }
    }

    // Tasks that ended without reporting panicked before sending
    for (slot, adapter) in adapters.iter().enumerate().filter(|(slot, _)| pending[*slot]) {
        let crashed = match (&mut tasks.0[slot]).await {
            Err(e) if e.is_panic() => AdapterError::Panicked(adapter.name().to_string()),
            _ => AdapterError::Process(format!("{} stopped without reporting", adapter.name())),
        };
        fold(adapter.as_ref(), Err(crashed), reconciler, outcomes);
    }
}

/// Fold results that are already queued, then abort and time out the rest
fn expire_pending(
    adapters: &[Arc<dyn ScanAdapter>],
    tasks: &TaskGuard<()>,
    pending: &mut [bool],
    rx: &mut mpsc::Receiver<(usize, AdapterResult)>,
    waited: Duration,
    reconciler: &mut Reconciler,
    outcomes: &mut Vec<AdapterOutcome>,
) {
    while let Ok((slot, result)) = rx.try_recv() {
        pending[slot] = false;
        fold(adapters[slot].as_ref(), result, reconciler, outcomes);
    }

    for (slot, adapter) in adapters.iter().enumerate() {
        if !pending[slot] {
            continue;
        }
        tasks.0[slot].abort();
        pending[slot] = false;
        let timeout = AdapterError::Timeout {
            adapter: adapter.name().to_string(),
            seconds: waited.as_secs_f64(),
        };
        fold(adapter.as_ref(), Err(timeout), reconciler, outcomes);
    }
}

/// One adapter after another, BLE first, then classic, then platform
async fn collect_sequential(
    adapters: &[Arc<dyn ScanAdapter>],
    ctx: &Arc<AdapterContext>,
    config: &ScanConfig,
    reconciler: &mut Reconciler,
    outcomes: &mut Vec<AdapterOutcome>,
) {
    let overall = config.effective_overall_timeout(adapters.len());
    let started = Instant::now();

    for adapter in adapters {
        let remaining = overall.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            let timeout = AdapterError::Timeout {
                adapter: adapter.name().to_string(),
                seconds: 0.0,
            };
            fold(adapter.as_ref(), Err(timeout), reconciler, outcomes);
            continue;
        }

        let limit = config.adapter_timeout().min(remaining);
        let task_adapter = adapter.clone();
        let task_ctx = ctx.clone();
        let mut task = TaskGuard(vec![tokio::spawn(async move {
            run_adapter(task_adapter.as_ref(), &task_ctx, limit).await
        })]);

        let result = match (&mut task.0[0]).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => Err(AdapterError::Panicked(adapter.name().to_string())),
            Err(e) => Err(AdapterError::Process(e.to_string())),
        };
        fold(adapter.as_ref(), result, reconciler, outcomes);
    }
}

/// Stamp and enrich an adapter's records, then hand them to the reconciler
fn fold(
    adapter: &dyn ScanAdapter,
    result: AdapterResult,
    reconciler: &mut Reconciler,
    outcomes: &mut Vec<AdapterOutcome>,
) {
    match result {
        Ok(records) => {
            debug!("Adapter {} finished with {} records", adapter.name(), records.len());
            outcomes.push(AdapterOutcome::succeeded(adapter.name(), records.len()));
            for record in records {
                reconciler.insert(stamp(record, adapter.name()));
            }
        }
        Err(e @ AdapterError::Timeout { .. }) => {
            warn!("Adapter {} failed: {}", adapter.name(), e);
            outcomes.push(AdapterOutcome::failed(adapter.name(), &e));
        }
        Err(e) => {
            error!("Adapter {} failed: {}", adapter.name(), e);
            outcomes.push(AdapterOutcome::failed(adapter.name(), &e));
        }
    }
}

/// Record provenance and fill in catalog-derived labels.
///
/// `source_id` always takes the id the adapter reported. The company comes
/// from the MAC-prefix catalog, then the manufacturer IDs in the
/// advertisement, then the OUI vendor table.
pub fn stamp(mut record: DeviceRecord, adapter: &str) -> DeviceRecord {
    record.address = ident::normalize(&record.address);
    if record.id.is_empty() {
        record.id = record.address.clone();
    }
    record.source_id = record.id.clone();
    if record.detected_by.is_empty() {
        record.detected_by = adapter.to_string();
    }

    if record.company_name.is_empty() {
        let company = catalog::device_info(&record.address)
            .map(|info| info.company.to_string())
            .or_else(|| {
                record
                    .manufacturer_data
                    .keys()
                    .find_map(|&id| catalog::company_name(id))
                    .map(str::to_string)
            })
            .or_else(|| oui::lookup_vendor(&record.address));
        if let Some(company) = company {
            record.company_name = company;
        }
    }

    if record.friendly_name.is_empty() {
        record.friendly_name =
            names::friendly_name(&record.name, &record.address, &record.manufacturer_data);
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchPolicy;
    use async_trait::async_trait;

    struct Idle(&'static str);

    #[async_trait]
    impl ScanAdapter for Idle {
        fn name(&self) -> &'static str {
            self.0
        }

        fn class(&self) -> AdapterClass {
            AdapterClass::Ble
        }

        async fn scan(&self, _ctx: &AdapterContext) -> AdapterResult {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn queued_results_are_kept_when_the_deadline_fires() {
        let adapters: Vec<Arc<dyn ScanAdapter>> = vec![Arc::new(Idle("done")), Arc::new(Idle("stuck"))];
        let tasks = TaskGuard(vec![
            tokio::spawn(async {}),
            tokio::spawn(std::future::pending::<()>()),
        ]);
        let (tx, mut rx) = mpsc::channel(2);
        tx.send((0, Ok(vec![DeviceRecord::new("d1", "00:11:22:33:44:55", "Buds")])))
            .await
            .unwrap();

        let mut pending = vec![true, true];
        let mut reconciler = Reconciler::new(true, true, MatchPolicy::default());
        let mut outcomes = Vec::new();
        expire_pending(
            &adapters,
            &tasks,
            &mut pending,
            &mut rx,
            Duration::from_secs(3),
            &mut reconciler,
            &mut outcomes,
        );

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0], AdapterOutcome::succeeded("done", 1));
        assert_eq!(outcomes[1].adapter, "stuck");
        assert!(outcomes[1].error.as_deref().is_some_and(|e| e.contains("timed out")));
        assert_eq!(reconciler.len(), 1);
        assert_eq!(pending, vec![false, false]);
    }

    #[test]
    fn stamp_records_provenance() {
        let record = DeviceRecord::new("dev-1", "aa-bb-cc-dd-ee-ff", "Unknown");
        let stamped = stamp(record, "bluez");
        assert_eq!(stamped.address, "AA:BB:CC:DD:EE:FF");
        assert_eq!(stamped.source_id, "dev-1");
        assert_eq!(stamped.detected_by, "bluez");
        assert_eq!(stamped.friendly_name, "BT Device DD:EE:FF");
    }

    #[test]
    fn stamp_keeps_adapter_labels() {
        let mut record = DeviceRecord::new("", "04:15:52:00:00:01", "")
            .with_detected_by("windows_pnp");
        record.company_name = "Unknown (Windows)".to_string();
        let stamped = stamp(record, "replay");
        assert_eq!(stamped.id, "04:15:52:00:00:01");
        assert_eq!(stamped.detected_by, "windows_pnp");
        assert_eq!(stamped.company_name, "Unknown (Windows)");
    }

    #[test]
    fn stamp_uses_manufacturer_catalog() {
        let mut record = DeviceRecord::new("x", "WIN-PNP-1", "");
        record.manufacturer_data.insert(0x004C, vec![0x10]);
        let stamped = stamp(record, "replay");
        assert_eq!(stamped.company_name, "Apple, Inc.");
    }
}
