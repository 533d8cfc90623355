use thiserror::Error;

/// Failure of a single scan adapter. The engine contains these: a failing
/// adapter contributes no records and never aborts the scan.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Adapter unavailable: {0}")]
    Unavailable(String),

    #[error("Adapter {adapter} timed out after {seconds:.1}s")]
    Timeout { adapter: String, seconds: f64 },

    #[error("Bluetooth stack error: {0}")]
    Stack(String),

    #[error("Process Error: {0}")]
    Process(String),

    #[error("Adapter {0} panicked")]
    Panicked(String),

    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error surfaced to callers of the scan engine
#[derive(Error, Debug)]
pub enum BluetoothScanError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Bluetooth scan failed: {0}")]
    ScanFailed(String),

    #[error("Bluetooth scan cancelled")]
    Cancelled,

    #[error("Adapter Error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("I/O Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BluetoothScanError>;
