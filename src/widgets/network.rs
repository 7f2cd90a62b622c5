//! Per-interface network throughput.
//!
//! Raw samples arrive as instantaneous byte rates. The averaging transform
//! folds each interface's last ten samples into a rolling mean before the
//! panel renders, so a single burst reads as a ramp rather than a spike.
//!
//! - **Window divisor**: the mean divides by the window capacity, not the
//!   fill level, so a freshly seen interface ramps up from near zero.
//! - **Interface churn**: interfaces absent from a sample lose their window
//!   and restart the ramp if they return.

use std::future::{ready, Ready};

use crate::color::Rgba;
use crate::pipeline::HistoryBuffer;
use crate::scene::{Scene, TextAnchor};

/// Samples folded into each rolling mean.
const AVERAGE_WINDOW: usize = 10;
/// Byte rate that fills the usage bar completely.
const FULL_SCALE_BYTES: f64 = 50_000_000.0;
const BLOCK_HEIGHT: f64 = 64.0;
const PAD: f64 = 8.0;
const UPLOAD_GLYPH: char = '\u{2191}';
const DOWNLOAD_GLYPH: char = '\u{2193}';
const PRIMARY: Rgba = Rgba::WHITE;
const SECONDARY: Rgba = Rgba::rgb(0xaa, 0xaa, 0xaa);
const BAR_TRACK: Rgba = Rgba::new(255, 255, 255, 0x22);
const BAR_FILL: Rgba = Rgba::rgb(0x4f, 0xac, 0xfe);
const BAR_HEIGHT: f64 = 3.0;

/// Instantaneous byte rates for one interface, as sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceRates {
    pub name: String,
    pub mac_address: String,
    /// Bytes received per second.
    pub received: f64,
    /// Bytes transmitted per second.
    pub transmitted: f64,
}

/// Rolling-mean throughput for one interface.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceThroughput {
    pub name: String,
    pub mac_address: String,
    pub received_avg: f64,
    pub transmitted_avg: f64,
}

/// Poll transform that folds raw rates into rolling means.
///
/// A failed fetch publishes an empty interface list and drops every window,
/// so rates ramp up again once sampling recovers.
pub fn averaging_transform(
) -> impl FnMut(Option<Vec<InterfaceRates>>) -> Ready<Option<Vec<InterfaceThroughput>>> {
    let mut windows: Vec<(String, HistoryBuffer<f64>, HistoryBuffer<f64>)> = Vec::new();

    move |raw| {
        let interfaces = raw.unwrap_or_default();
        windows.retain(|(name, _, _)| interfaces.iter().any(|i| i.name == *name));

        let mut out = Vec::with_capacity(interfaces.len());
        for iface in interfaces {
            let slot = match windows.iter().position(|(name, _, _)| *name == iface.name) {
                Some(i) => i,
                None => {
                    windows.push((
                        iface.name.clone(),
                        HistoryBuffer::new(AVERAGE_WINDOW),
                        HistoryBuffer::new(AVERAGE_WINDOW),
                    ));
                    windows.len() - 1
                }
            };
            let (_, received, transmitted) = &mut windows[slot];
            received.push(iface.received);
            transmitted.push(iface.transmitted);
            out.push(InterfaceThroughput {
                received_avg: window_mean(received),
                transmitted_avg: window_mean(transmitted),
                name: iface.name,
                mac_address: iface.mac_address,
            });
        }
        ready(Some(out))
    }
}

fn window_mean(window: &HistoryBuffer<f64>) -> f64 {
    window.iter().sum::<f64>() / window.capacity() as f64
}

/// View model for the network throughput widget.
#[derive(Debug, Clone, Default)]
pub struct NetworkMonitor;

impl NetworkMonitor {
    /// Create the widget.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the scene, one stacked block per interface.
    #[must_use]
    pub fn scene(&self, width: f64, height: f64, interfaces: &[InterfaceThroughput]) -> Scene {
        let mut scene = Scene::new(width, height);

        for (i, iface) in interfaces.iter().enumerate() {
            let top = i as f64 * BLOCK_HEIGHT;

            scene = scene
                .text(PAD, top + 12.0, &*iface.name, 11.0, PRIMARY)
                .text_anchored(
                    width - PAD,
                    top + 12.0,
                    &*iface.mac_address,
                    9.0,
                    SECONDARY,
                    TextAnchor::End,
                );
            scene = rate_row(scene, width, top + 28.0, UPLOAD_GLYPH, iface.transmitted_avg);
            scene = rate_row(scene, width, top + 46.0, DOWNLOAD_GLYPH, iface.received_avg);
        }

        scene
    }
}

fn rate_row(scene: Scene, width: f64, y: f64, glyph: char, avg: f64) -> Scene {
    let percent = (avg / FULL_SCALE_BYTES * 100.0).min(100.0);
    let bar_width = width - 2.0 * PAD;

    scene
        .text(PAD, y, format!("{glyph} {:.2}MB/s", avg / 1e6), 10.0, PRIMARY)
        .text_anchored(width - PAD, y, format!("{percent:.0}%"), 10.0, SECONDARY, TextAnchor::End)
        .rect(PAD, y + 4.0, bar_width, BAR_HEIGHT, BAR_TRACK)
        .rect(PAD, y + 4.0, bar_width * percent / 100.0, BAR_HEIGHT, BAR_FILL)
}
