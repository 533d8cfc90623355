//! bluescout - multi-source Bluetooth device discovery
//!
//! This library runs several Bluetooth scan adapters and reconciles what they
//! report into one list of physical devices:
//! - Address normalization and name heuristics
//! - Parallel or sequential adapter fan-out with timeouts and cancellation
//! - Streaming merge plus a final global deduplication pass
//! - Catalog enrichment (MAC prefixes, manufacturer IDs, OUI vendors)

pub mod config;
pub mod constants;
pub mod db;
pub mod detect;
pub mod engine;
pub mod errors;
pub mod ident;
pub mod model;
pub mod names;
pub mod reconcile;
pub mod report;

// Re-export commonly used types for convenience
pub use config::{MatchPolicy, ScanConfig};
pub use detect::{AdapterClass, AdapterContext, ScanAdapter};
pub use engine::{AdapterOutcome, ScanEngine, ScanOutcome};
pub use errors::{AdapterError, BluetoothScanError, Result};
pub use model::DeviceRecord;
pub use reconcile::{advanced_deduplication, devices_match, merge, Reconciler};
pub use report::{DeviceSummary, ScanReport};
