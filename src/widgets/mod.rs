//! Widget view models.
//!
//! One builder per widget kind turns pipeline and provider state into a
//! render-ready [`Scene`](crate::scene::Scene):
//!
//! - [`PerfGraph`]: smoothed metric curve over a gridline backdrop
//! - [`WeatherTimeline`]: temperature curve with day/night and sun markers
//! - [`DiskUsage`]: per-disk capacity bars
//! - [`NetworkMonitor`]: per-interface throughput bars
//! - [`MediaPanel`]: now-playing track info with album art
//! - [`TimeDatePanel`]: clock, date, and current conditions
//! - [`SpectrumBars`]: audio spectrum bars with a sine idle animation
//!
//! Builders are pure: the same inputs produce the same scene. Widgets whose
//! display folds over the sample stream (throughput averaging, album-art
//! resolution, silence detection) express that fold as a stateful transform
//! for their poller, so the scene builder itself stays stateless.

pub mod clock;
pub mod disks;
pub mod media;
pub mod network;
pub mod perf_graph;
pub mod visualizer;
pub mod weather;

pub use clock::TimeDatePanel;
pub use disks::{DiskInfo, DiskUsage};
pub use media::{art_resolving_transform, AlbumArtSource, MediaPanel, TrackDisplay, TrackMetadata};
pub use network::{averaging_transform, InterfaceRates, InterfaceThroughput, NetworkMonitor};
pub use perf_graph::PerfGraph;
pub use visualizer::{spectrum_transform, SpectrumBars};
pub use weather::WeatherTimeline;
