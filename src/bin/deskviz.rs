//! deskviz - render a demo dashboard to an SVG file.
//!
//! Drives the full engine against synthetic metric sources: loads the
//! config (path from the first argument, defaults to `deskviz.yaml`),
//! polls every widget for a couple of seconds on a current-thread
//! runtime, and writes the composed dashboard to `dashboard.svg`.

use std::env;
use std::future::ready;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use deskviz::config::Config;
use deskviz::dashboard::{Dashboard, MetricSources};
use deskviz::weather::SyntheticProvider;
use deskviz::widgets::{DiskInfo, InterfaceRates, TrackMetadata};

const OUTPUT_PATH: &str = "dashboard.svg";
const WARMUP: Duration = Duration::from_secs(2);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config_path =
        env::args().nth(1).unwrap_or_else(|| "deskviz.yaml".to_string());
    let config = Config::load_or_default(&config_path);
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
    runtime.block_on(run(config))?;

    println!("Wrote {OUTPUT_PATH}");
    Ok(())
}

async fn run(config: Config) -> deskviz::Result<()> {
    let now = Utc::now().with_timezone(Local::now().offset());
    let sources = synthetic_sources(now);

    let mut dashboard = Dashboard::new(config);
    let layout = dashboard.layout();
    log::info!(
        "Laid out {} slots on a {}x{} grid ({} overlaps)",
        layout.slots.len(),
        layout.grid_cols,
        layout.grid_rows,
        layout.overlaps.len()
    );

    dashboard.start(&sources);
    tokio::time::sleep(WARMUP).await;

    let canvas = dashboard.canvas(Utc::now().with_timezone(Local::now().offset()));
    dashboard.shutdown().await;

    canvas.write_to_file(OUTPUT_PATH)
}

/// Sources that wiggle plausibly without touching the operating system.
fn synthetic_sources(now: chrono::DateTime<chrono::FixedOffset>) -> MetricSources {
    MetricSources::new(Arc::new(SyntheticProvider::new(now)))
        .cpu_percent(|| ready(Some(35.0 + 25.0 * jitter())))
        .memory_percent(|| ready(Some(60.0 + 5.0 * jitter())))
        .disks(|| {
            ready(Some(vec![
                DiskInfo {
                    name: "system".to_string(),
                    kind: "SSD".to_string(),
                    mount_point: "/".to_string(),
                    file_system: "ext4".to_string(),
                    total_space: 512_000_000_000,
                    available_space: 198_000_000_000,
                },
                DiskInfo {
                    name: "media".to_string(),
                    kind: "HDD".to_string(),
                    mount_point: "/mnt/media".to_string(),
                    file_system: "xfs".to_string(),
                    total_space: 4_000_000_000_000,
                    available_space: 1_250_000_000_000,
                },
            ]))
        })
        .interfaces(|| {
            ready(Some(vec![InterfaceRates {
                name: "eth0".to_string(),
                mac_address: "de:ad:be:ef:00:01".to_string(),
                received: 12_000_000.0 * (0.5 + 0.5 * jitter()),
                transmitted: 1_500_000.0 * (0.5 + 0.5 * jitter()),
            }]))
        })
        .track(|| {
            ready(Some(TrackMetadata {
                title: "Weightless".to_string(),
                artist: "Marconi Union".to_string(),
                album: "Ambient Transmissions".to_string(),
                album_art: None,
            }))
        })
        .spectrum(|| {
            let bars: Vec<f64> =
                (0..24).map(|i| (0.3 + 0.7 * jitter()) * f64::from(24 - i) / 24.0).collect();
            ready(Some(bars))
        })
}

/// Deterministic pseudo-noise in `[0, 1)` derived from the wall clock.
fn jitter() -> f64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    f64::from(nanos % 1_000) / 1_000.0
}
