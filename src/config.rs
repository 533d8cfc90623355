use crate::constants::{ADAPTER_GRACE, DETAILS_ALLOWANCE, NAME_MATCH_THRESHOLD, NO_FILTER_SENTINELS};
use crate::errors::{BluetoothScanError, Result};
use std::time::Duration;
use tracing::warn;

/// Configuration settings for a scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// How long each adapter listens; also its own timeout budget
    pub duration: Duration,

    /// Case-insensitive substring filter on device names
    pub filter_name: Option<String>,

    /// Run BLE advertisement adapters
    pub include_ble: bool,

    /// Run classic inquiry adapters
    pub include_classic: bool,

    /// Run OS-specific enumeration adapters
    pub include_platform: bool,

    /// Merge records that describe the same physical device
    pub deduplicate: bool,

    /// Start every adapter at once instead of one after another
    pub parallel: bool,

    /// Ask adapters to connect to devices for GATT details
    pub connect_for_details: bool,

    /// Let the stronger signal win when merging two records
    pub prioritize_rssi: bool,

    /// Bound on the whole scan; derived from `duration` when unset
    pub overall_timeout: Option<Duration>,

    /// Identity heuristic tuning
    pub policy: MatchPolicy,
}

/// Tunable parts of the identity heuristic
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPolicy {
    /// Minimum shared-character ratio for two names to match
    pub name_threshold: f64,

    /// A shared significant GATT service is enough to call two records the same device
    pub significant_services: bool,

    /// A shared manufacturer ID is enough to call two records the same device
    pub shared_manufacturer: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            name_threshold: NAME_MATCH_THRESHOLD,
            significant_services: true,
            shared_manufacturer: true,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(5),
            filter_name: None,
            include_ble: true,
            include_classic: true,
            include_platform: true,
            deduplicate: true,
            parallel: true,
            connect_for_details: false,
            prioritize_rssi: true,
            overall_timeout: None,
            policy: MatchPolicy::default(),
        }
    }
}

impl ScanConfig {
    /// Short parallel scan without connections
    pub fn fast() -> Self {
        Self {
            duration: Duration::from_secs(3),
            parallel: true,
            connect_for_details: false,
            ..Self::default()
        }
    }

    /// Longer scan with every adapter, deduplication and connections
    pub fn thorough() -> Self {
        Self {
            duration: Duration::from_secs(10),
            include_ble: true,
            include_classic: true,
            include_platform: true,
            deduplicate: true,
            connect_for_details: true,
            ..Self::default()
        }
    }

    /// Defaults overridden by `BLUESCOUT_*` environment variables.
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = env_value::<f64>("BLUESCOUT_SCAN_DURATION") {
            match Duration::try_from_secs_f64(secs) {
                Ok(duration) => config.duration = duration,
                Err(_) => warn!("Ignoring BLUESCOUT_SCAN_DURATION={}", secs),
            }
        }
        if let Some(flag) = env_flag("BLUESCOUT_INCLUDE_CLASSIC") {
            config.include_classic = flag;
        }
        if let Some(flag) = env_flag("BLUESCOUT_PARALLEL") {
            config.parallel = flag;
        }
        if let Some(flag) = env_flag("BLUESCOUT_DEDUPLICATE") {
            config.deduplicate = flag;
        }
        config
    }

    /// Set the scan duration from seconds
    pub fn with_duration_secs(mut self, secs: f64) -> Result<Self> {
        self.duration = parse_duration(secs)?;
        Ok(self)
    }

    /// Set the name filter; sentinel values such as "null" clear it
    pub fn with_filter(mut self, filter: Option<&str>) -> Self {
        self.filter_name = normalize_filter(filter);
        self
    }

    pub fn with_deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_overall_timeout(mut self, timeout: Duration) -> Self {
        self.overall_timeout = Some(timeout);
        self
    }

    /// Precondition checks run before any adapter is started
    pub fn validate(&self) -> Result<()> {
        if self.duration.is_zero() {
            return Err(BluetoothScanError::InvalidParameter(
                "Scan duration must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.policy.name_threshold) {
            return Err(BluetoothScanError::InvalidParameter(format!(
                "Name match threshold must be within [0, 1], got {}",
                self.policy.name_threshold
            )));
        }
        if matches!(self.overall_timeout, Some(t) if t.is_zero()) {
            return Err(BluetoothScanError::InvalidParameter(
                "Overall timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Time a single adapter may take before it counts as failed.
    /// Saturates at `Duration::MAX` for absurdly long scans.
    pub fn adapter_timeout(&self) -> Duration {
        let timeout = self.duration.saturating_add(ADAPTER_GRACE);
        if self.connect_for_details {
            timeout.saturating_add(DETAILS_ALLOWANCE)
        } else {
            timeout
        }
    }

    /// Bound on the whole scan for `adapters` enabled adapters
    pub fn effective_overall_timeout(&self, adapters: usize) -> Duration {
        if let Some(timeout) = self.overall_timeout {
            return timeout;
        }
        if self.parallel {
            self.adapter_timeout()
        } else {
            let count = u32::try_from(adapters.max(1)).unwrap_or(u32::MAX);
            self.adapter_timeout().saturating_mul(count)
        }
    }
}

/// Convert a caller-supplied number of seconds into a positive duration
pub fn parse_duration(secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(BluetoothScanError::InvalidParameter(format!(
            "Scan duration must be positive, got {}",
            secs
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| BluetoothScanError::InvalidParameter(format!("Invalid scan duration: {}", e)))
}

/// Empty and placeholder filters ("null", "none", "string") mean no filter
pub fn normalize_filter(filter: Option<&str>) -> Option<String> {
    let trimmed = filter?.trim();
    if NO_FILTER_SENTINELS
        .iter()
        .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn env_value<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {}={}", key, raw);
            None
        }
    }
}

fn env_flag(key: &str) -> Option<bool> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!("Ignoring unparseable {}={}", key, raw);
            None
        }
    }
}
