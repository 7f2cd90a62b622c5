//! Dashboard assembly: layout, pipelines, and scene collection.
//!
//! A [`Dashboard`] turns a [`Config`] into a running set of widgets. It
//! lays the widgets out once, owns one poll task per widget, and composes
//! their scenes onto a [`Canvas`] on demand.
//!
//! - **Independent widgets**: every widget polls on its own timer; a slow
//!   or failing source delays nothing but its own panel.
//! - **Failure isolation**: a widget that cannot produce a scene gets an
//!   error panel in its cell; siblings keep rendering and polling.
//! - **Group lifecycle**: `start` spawns every poll task,
//!   `stop`/`shutdown` tear them all down; dropping the dashboard aborts
//!   whatever is still running.
//!
//! Metric sources cross the boundary as [`MetricSources`]: shared async
//! getters for system stats plus the weather provider and the optional
//! album-art resolver. The dashboard never talks to the operating system
//! itself.

use std::future::{ready, Future};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};

use crate::color::Rgba;
use crate::config::{Config, PerfStat, WidgetKind};
use crate::error::Error;
use crate::grid::{self, GridLayout, Slot};
use crate::pipeline::{MetricPipeline, PipelineConfig, Poller};
use crate::scene::{Canvas, Scene};
use crate::weather::{WeatherProvider, WeatherReport};
use crate::widgets::{
    art_resolving_transform, averaging_transform, spectrum_transform, AlbumArtSource, DiskInfo,
    DiskUsage, InterfaceRates, MediaPanel, NetworkMonitor, PerfGraph, SpectrumBars, TimeDatePanel,
    TrackMetadata, WeatherTimeline,
};

const PERF_INTERVAL: Duration = Duration::from_millis(100);
const DISK_INTERVAL: Duration = Duration::from_millis(1000);
const NETWORK_INTERVAL: Duration = Duration::from_millis(100);
const MEDIA_INTERVAL: Duration = Duration::from_millis(200);
const SPECTRUM_INTERVAL: Duration = Duration::from_millis(50);
const WEATHER_INTERVAL: Duration = Duration::from_secs(600);
/// The clock's conditions line refreshes faster than the full timeline.
const CLOCK_WEATHER_INTERVAL: Duration = Duration::from_secs(60);

const ERROR_TITLE_COLOR: Rgba = Rgba::rgb(0xff, 0x55, 0x55);
const ERROR_DETAIL_COLOR: Rgba = Rgba::rgb(0xaa, 0xaa, 0xaa);

/// Boxed future returned by a shared metric getter.
pub type BoxedSample<T> = Pin<Box<dyn Future<Output = Option<T>> + Send>>;

/// A metric getter shareable between widgets (two perf graphs may read the
/// same stat).
pub type SharedGetter<T> = Arc<dyn Fn() -> BoxedSample<T> + Send + Sync>;

fn shared<T, G, F>(getter: G) -> SharedGetter<T>
where
    G: Fn() -> F + Send + Sync + 'static,
    F: Future<Output = Option<T>> + Send + 'static,
{
    Arc::new(move || Box::pin(getter()) as BoxedSample<T>)
}

fn absent<T: Send + 'static>() -> SharedGetter<T> {
    Arc::new(|| Box::pin(ready(None)) as BoxedSample<T>)
}

/// Everything the dashboard polls, supplied by the embedding process.
///
/// Getters left unset report absence forever, which renders the widget
/// empty without affecting its siblings.
pub struct MetricSources {
    weather: Arc<dyn WeatherProvider>,
    album_art: Option<Arc<dyn AlbumArtSource>>,
    cpu_percent: SharedGetter<f64>,
    memory_percent: SharedGetter<f64>,
    disks: SharedGetter<Vec<DiskInfo>>,
    interfaces: SharedGetter<Vec<InterfaceRates>>,
    track: SharedGetter<TrackMetadata>,
    spectrum: SharedGetter<Vec<f64>>,
}

impl MetricSources {
    /// Create a source set with only the weather provider wired.
    #[must_use]
    pub fn new(weather: Arc<dyn WeatherProvider>) -> Self {
        Self {
            weather,
            album_art: None,
            cpu_percent: absent(),
            memory_percent: absent(),
            disks: absent(),
            interfaces: absent(),
            track: absent(),
            spectrum: absent(),
        }
    }

    /// Set the CPU usage getter (percent, 0-100).
    #[must_use]
    pub fn cpu_percent<G, F>(mut self, getter: G) -> Self
    where
        G: Fn() -> F + Send + Sync + 'static,
        F: Future<Output = Option<f64>> + Send + 'static,
    {
        self.cpu_percent = shared(getter);
        self
    }

    /// Set the memory usage getter (percent, 0-100).
    #[must_use]
    pub fn memory_percent<G, F>(mut self, getter: G) -> Self
    where
        G: Fn() -> F + Send + Sync + 'static,
        F: Future<Output = Option<f64>> + Send + 'static,
    {
        self.memory_percent = shared(getter);
        self
    }

    /// Set the disk inventory getter.
    #[must_use]
    pub fn disks<G, F>(mut self, getter: G) -> Self
    where
        G: Fn() -> F + Send + Sync + 'static,
        F: Future<Output = Option<Vec<DiskInfo>>> + Send + 'static,
    {
        self.disks = shared(getter);
        self
    }

    /// Set the network interface rates getter.
    #[must_use]
    pub fn interfaces<G, F>(mut self, getter: G) -> Self
    where
        G: Fn() -> F + Send + Sync + 'static,
        F: Future<Output = Option<Vec<InterfaceRates>>> + Send + 'static,
    {
        self.interfaces = shared(getter);
        self
    }

    /// Set the now-playing metadata getter.
    #[must_use]
    pub fn track<G, F>(mut self, getter: G) -> Self
    where
        G: Fn() -> F + Send + Sync + 'static,
        F: Future<Output = Option<TrackMetadata>> + Send + 'static,
    {
        self.track = shared(getter);
        self
    }

    /// Set the audio spectrum getter (normalized magnitudes).
    #[must_use]
    pub fn spectrum<G, F>(mut self, getter: G) -> Self
    where
        G: Fn() -> F + Send + Sync + 'static,
        F: Future<Output = Option<Vec<f64>>> + Send + 'static,
    {
        self.spectrum = shared(getter);
        self
    }

    /// Set the album-art resolver consulted by media widgets configured
    /// for high-resolution art.
    #[must_use]
    pub fn album_art(mut self, source: Arc<dyn AlbumArtSource>) -> Self {
        self.album_art = Some(source);
        self
    }
}

#[derive(Debug)]
enum WidgetRuntime {
    PerfGraph { widget: PerfGraph, pipeline: MetricPipeline },
    DiskUsage { widget: DiskUsage, poller: Poller<Vec<DiskInfo>> },
    Network { widget: NetworkMonitor, poller: Poller<Vec<crate::widgets::InterfaceThroughput>> },
    MediaInfo { widget: MediaPanel, poller: Poller<crate::widgets::TrackDisplay> },
    Visualizer { widget: SpectrumBars, poller: Poller<Vec<f64>> },
    Weather { widget: WeatherTimeline, poller: Poller<WeatherReport> },
    TimeDate { widget: TimeDatePanel, poller: Poller<WeatherReport> },
}

impl WidgetRuntime {
    fn is_running(&self) -> bool {
        match self {
            Self::PerfGraph { pipeline, .. } => pipeline.is_running(),
            Self::DiskUsage { poller, .. } => poller.is_running(),
            Self::Network { poller, .. } => poller.is_running(),
            Self::MediaInfo { poller, .. } => poller.is_running(),
            Self::Visualizer { poller, .. } => poller.is_running(),
            Self::Weather { poller, .. } => poller.is_running(),
            Self::TimeDate { poller, .. } => poller.is_running(),
        }
    }

    fn stop(&mut self) {
        match self {
            Self::PerfGraph { pipeline, .. } => pipeline.stop(),
            Self::DiskUsage { poller, .. } => poller.stop(),
            Self::Network { poller, .. } => poller.stop(),
            Self::MediaInfo { poller, .. } => poller.stop(),
            Self::Visualizer { poller, .. } => poller.stop(),
            Self::Weather { poller, .. } => poller.stop(),
            Self::TimeDate { poller, .. } => poller.stop(),
        }
    }

    async fn shutdown(&mut self) {
        match self {
            Self::PerfGraph { pipeline, .. } => pipeline.shutdown().await,
            Self::DiskUsage { poller, .. } => poller.shutdown().await,
            Self::Network { poller, .. } => poller.shutdown().await,
            Self::MediaInfo { poller, .. } => poller.shutdown().await,
            Self::Visualizer { poller, .. } => poller.shutdown().await,
            Self::Weather { poller, .. } => poller.shutdown().await,
            Self::TimeDate { poller, .. } => poller.shutdown().await,
        }
    }
}

/// A configured dashboard and its running widgets.
#[derive(Debug)]
pub struct Dashboard {
    config: Config,
    layout: GridLayout,
    runtimes: Vec<(String, WidgetRuntime)>,
}

impl Dashboard {
    /// Lay out the configured widgets. No poll task runs until
    /// [`Dashboard::start`].
    ///
    /// Overlapping placements are logged by the layout pass and surfaced
    /// in [`Dashboard::layout`]; the later widget wins the contested
    /// cells and every widget still renders.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let layout = grid::layout(&config.placements());
        Self { config, layout, runtimes: Vec::new() }
    }

    /// The computed cell layout.
    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// The configuration this dashboard was built from.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Spawn one poll task per configured widget.
    ///
    /// Calling this on a running dashboard replaces every poll task; the
    /// new tasks start from empty state.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn start(&mut self, sources: &MetricSources) {
        let mut runtimes = Vec::with_capacity(self.config.widgets.len());

        for (index, widget) in self.config.widgets.iter().enumerate() {
            let id = format!("{}-{index}", widget.kind.name());
            let runtime = match &widget.kind {
                WidgetKind::PerfGraph { stat } => {
                    let getter = match stat {
                        PerfStat::Cpu => Arc::clone(&sources.cpu_percent),
                        PerfStat::Memory => Arc::clone(&sources.memory_percent),
                    };
                    let mut pipeline = MetricPipeline::new(PipelineConfig {
                        interval: PERF_INTERVAL,
                        ..PipelineConfig::default()
                    });
                    pipeline.start(move || getter(), |raw| ready(raw));
                    WidgetRuntime::PerfGraph {
                        widget: PerfGraph::new(id.clone(), stat.title()),
                        pipeline,
                    }
                }
                WidgetKind::DiskUsage => {
                    let getter = Arc::clone(&sources.disks);
                    let mut poller = Poller::new(DISK_INTERVAL);
                    poller.start(move || getter(), |raw| ready(Some(raw.unwrap_or_default())));
                    WidgetRuntime::DiskUsage { widget: DiskUsage::new(), poller }
                }
                WidgetKind::Network => {
                    let getter = Arc::clone(&sources.interfaces);
                    let mut poller = Poller::new(NETWORK_INTERVAL);
                    poller.start(move || getter(), averaging_transform());
                    WidgetRuntime::Network { widget: NetworkMonitor::new(), poller }
                }
                WidgetKind::MediaInfo { get_high_res, blur } => {
                    let getter = Arc::clone(&sources.track);
                    let art = if *get_high_res { sources.album_art.clone() } else { None };
                    let mut poller = Poller::new(MEDIA_INTERVAL);
                    poller.start(move || getter(), art_resolving_transform(art));
                    WidgetRuntime::MediaInfo { widget: MediaPanel::new().blur(*blur), poller }
                }
                WidgetKind::Visualizer => {
                    let getter = Arc::clone(&sources.spectrum);
                    let mut poller = Poller::new(SPECTRUM_INTERVAL);
                    poller.start(move || getter(), spectrum_transform(SPECTRUM_INTERVAL));
                    WidgetRuntime::Visualizer { widget: SpectrumBars::new(), poller }
                }
                WidgetKind::Weather { lat, lon } => {
                    let mut poller = Poller::new(WEATHER_INTERVAL);
                    poller.start(
                        weather_getter(Arc::clone(&sources.weather), *lat, *lon),
                        |raw| ready(raw),
                    );
                    WidgetRuntime::Weather { widget: WeatherTimeline::new(id.clone()), poller }
                }
                WidgetKind::TimeDate { lat, lon } => {
                    let mut poller = Poller::new(CLOCK_WEATHER_INTERVAL);
                    poller.start(
                        weather_getter(Arc::clone(&sources.weather), *lat, *lon),
                        |raw| ready(raw),
                    );
                    WidgetRuntime::TimeDate { widget: TimeDatePanel::new(), poller }
                }
            };
            runtimes.push((id, runtime));
        }

        self.runtimes = runtimes;
        log::debug!("Dashboard started {} widgets", self.runtimes.len());
    }

    /// Whether any widget's poll task is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.runtimes.iter().any(|(_, r)| r.is_running())
    }

    /// Abort every poll task without waiting.
    pub fn stop(&mut self) {
        for (_, runtime) in &mut self.runtimes {
            runtime.stop();
        }
    }

    /// Abort every poll task and wait for each to terminate.
    ///
    /// After this returns, no getter or transform belonging to this
    /// dashboard can fire.
    pub async fn shutdown(&mut self) {
        for (_, runtime) in &mut self.runtimes {
            runtime.shutdown().await;
        }
    }

    /// Compose the current widget scenes onto a canvas.
    ///
    /// Every layout slot yields a scene: live widgets from their latest
    /// samples, fillers and not-yet-started widgets as empty panels, and
    /// failed widgets as error panels.
    #[must_use]
    pub fn canvas(&self, now: DateTime<FixedOffset>) -> Canvas {
        let global = &self.config.global;
        let mut canvas = Canvas::new(global.canvas_width, global.canvas_height);
        let (cell_width, cell_height) = self.cell_size();

        for slot in &self.layout.slots {
            let (col, row, scene) = match slot {
                Slot::Widget(request) => {
                    let width = f64::from(request.col_span) * cell_width;
                    let height = f64::from(request.row_span) * cell_height;
                    (request.col, request.row, self.widget_scene(&request.id, width, height, now))
                }
                Slot::Filler { col, row } => {
                    (*col, *row, Scene::new(cell_width, cell_height))
                }
            };
            canvas.place(
                f64::from(col - 1) * cell_width,
                f64::from(row - 1) * cell_height,
                scene,
            );
        }

        canvas
    }

    fn cell_size(&self) -> (f64, f64) {
        let cols = self.layout.grid_cols.max(1);
        let rows = self.layout.grid_rows.max(1);
        (
            f64::from(self.config.global.canvas_width) / f64::from(cols),
            f64::from(self.config.global.canvas_height) / f64::from(rows),
        )
    }

    fn widget_scene(
        &self,
        id: &str,
        width: f64,
        height: f64,
        now: DateTime<FixedOffset>,
    ) -> Scene {
        let Some((_, runtime)) = self.runtimes.iter().find(|(rid, _)| rid == id) else {
            return Scene::new(width, height);
        };

        match runtime {
            WidgetRuntime::PerfGraph { widget, pipeline } => {
                widget.scene(width, height, &pipeline.snapshot())
            }
            WidgetRuntime::DiskUsage { widget, poller } => {
                widget.scene(width, height, &poller.sample().value.unwrap_or_default())
            }
            WidgetRuntime::Network { widget, poller } => {
                widget.scene(width, height, &poller.sample().value.unwrap_or_default())
            }
            WidgetRuntime::MediaInfo { widget, poller } => {
                widget.scene(width, height, poller.sample().value.as_ref())
            }
            WidgetRuntime::Visualizer { widget, poller } => {
                widget.scene(width, height, &poller.sample().value.unwrap_or_default())
            }
            WidgetRuntime::Weather { widget, poller } => widget
                .scene(width, height, now, poller.sample().value.as_ref())
                .unwrap_or_else(|e| error_scene(width, height, id, &e)),
            WidgetRuntime::TimeDate { widget, poller } => {
                widget.scene(width, height, now, poller.sample().value.as_ref())
            }
        }
    }
}

fn weather_getter(
    provider: Arc<dyn WeatherProvider>,
    latitude: f64,
    longitude: f64,
) -> impl FnMut() -> std::future::Ready<Option<WeatherReport>> + Send + 'static {
    move || {
        let report = match provider.fetch(latitude, longitude) {
            Ok(report) => Some(report),
            Err(e) => {
                log::warn!("Weather fetch for ({}, {}) failed: {}", latitude, longitude, e);
                None
            }
        };
        ready(report)
    }
}

fn error_scene(width: f64, height: f64, id: &str, error: &Error) -> Scene {
    log::warn!("Widget '{}' failed: {}", id, error);
    Scene::new(width, height)
        .text(8.0, 18.0, "Something went wrong", 12.0, ERROR_TITLE_COLOR)
        .text(8.0, 34.0, format!("{id}: {error}"), 10.0, ERROR_DETAIL_COLOR)
}
