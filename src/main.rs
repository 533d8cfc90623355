// ==========================================================
//  bluescout  - multi-source Bluetooth discovery tool
// ==========================================================

use bluescout::config::parse_duration;
use bluescout::detect::{platform_adapters, AdapterClass, ReplayAdapter, ScanAdapter};
use bluescout::report::{render_outcomes, render_table};
use bluescout::{BluetoothScanError, ScanConfig, ScanEngine, ScanReport};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: bluescout [OPTIONS]
Options:
  -d, --duration <SECS>   scan duration per adapter (default: 5)
  -f, --filter <NAME>     only keep devices whose name contains NAME
  --no-ble                skip BLE advertisement scanning
  --no-classic            skip classic device discovery
  --no-platform           skip OS-specific enumeration
  --no-dedup              report every adapter record separately
  --sequential            run adapters one after another
  --connect               connect to devices for extra details
  --fast                  3 second parallel scan
  --thorough              10 second scan with every adapter and connections
  --replay <FILE.json>    replay a saved capture instead of live adapters (repeatable)
  --json                  print JSON instead of a table
  -h, --help              show this help message";

fn missing_value(flag: &str) -> BluetoothScanError {
    BluetoothScanError::InvalidParameter(format!("{} requires a value", flag))
}

#[tokio::main]
async fn main() -> Result<(), BluetoothScanError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bluescout=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args: Vec<String> = std::env::args().collect();
    let mut args = raw_args.iter().skip(1);

    let mut config = ScanConfig::from_env();
    let mut replays = Vec::new();
    let mut json = false;

    // Parse command line arguments
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--duration" | "-d" => {
                let raw = args.next().ok_or_else(|| missing_value(arg))?;
                let secs: f64 = raw.parse().map_err(|_| {
                    BluetoothScanError::InvalidParameter(format!("Invalid duration: {}", raw))
                })?;
                config.duration = parse_duration(secs)?;
            }
            "--filter" | "-f" => {
                let filter = args.next().ok_or_else(|| missing_value(arg))?;
                config = config.with_filter(Some(filter.as_str()));
            }
            "--no-ble" => config.include_ble = false,
            "--no-classic" => config.include_classic = false,
            "--no-platform" => config.include_platform = false,
            "--no-dedup" => config.deduplicate = false,
            "--sequential" => config.parallel = false,
            "--connect" => config.connect_for_details = true,
            "--fast" => config = ScanConfig::fast().with_filter(config.filter_name.as_deref()),
            "--thorough" => config = ScanConfig::thorough().with_filter(config.filter_name.as_deref()),
            "--replay" => replays.push(args.next().ok_or_else(|| missing_value(arg))?.clone()),
            "--json" => json = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                return Ok(());
            }
            other => {
                eprintln!("{}", USAGE);
                return Err(BluetoothScanError::InvalidParameter(format!(
                    "Unknown argument: {}",
                    other
                )));
            }
        }
    }

    let adapters: Vec<Arc<dyn ScanAdapter>> = if replays.is_empty() {
        platform_adapters()
    } else {
        replays
            .iter()
            .map(|path| Arc::new(ReplayAdapter::new(path, AdapterClass::Platform)) as Arc<dyn ScanAdapter>)
            .collect()
    };
    if adapters.is_empty() {
        warn!("No Bluetooth adapters are supported on this platform");
    }

    let engine = ScanEngine::new(adapters);
    let cancel = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let outcome = engine.scan_detailed_until(&config, cancel).await?;

    if json {
        println!("{}", ScanReport::new(outcome.devices).to_json()?);
    } else {
        println!("{}", render_table(&outcome.devices));
        println!("{}", render_outcomes(&outcome.outcomes));
        println!(
            "Found {} devices in {:.1}s",
            outcome.devices.len(),
            outcome.elapsed.as_secs_f64()
        );
    }

    Ok(())
}
