//! Configuration system for the dashboard.
//!
//! Supports YAML configuration with fallback to built-in defaults. The
//! default widget arrangement is the stock 7x5 dashboard; a config file
//! replaces it wholesale rather than patching it.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::grid::PlacementRequest;

/// Default site coordinates (Stellenbosch, South Africa).
pub const DEFAULT_LATITUDE: f64 = -33.927_872;
/// Default site coordinates (Stellenbosch, South Africa).
pub const DEFAULT_LONGITUDE: f64 = 18.868_789;

/// Global rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Canvas width in pixels.
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,

    /// Canvas height in pixels.
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,

    /// Site latitude, used by widgets that omit their own coordinates.
    #[serde(default = "default_latitude")]
    pub latitude: f64,

    /// Site longitude, used by widgets that omit their own coordinates.
    #[serde(default = "default_longitude")]
    pub longitude: f64,
}

fn default_canvas_width() -> u32 {
    1280
}
fn default_canvas_height() -> u32 {
    800
}
fn default_latitude() -> f64 {
    DEFAULT_LATITUDE
}
fn default_longitude() -> f64 {
    DEFAULT_LONGITUDE
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            latitude: default_latitude(),
            longitude: default_longitude(),
        }
    }
}

/// Anchor cell of a widget, 1-indexed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Position {
    /// Column of the anchor cell.
    pub col: u32,
    /// Row of the anchor cell.
    pub row: u32,
}

/// Span of a widget in grid cells.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Size {
    /// Columns covered.
    pub cols: u32,
    /// Rows covered.
    pub rows: u32,
}

/// Which performance statistic a graph widget tracks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PerfStat {
    /// Total CPU usage percentage.
    Cpu,
    /// Used memory as a percentage of total.
    Memory,
}

impl PerfStat {
    /// Display title for the graph header.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Memory => "Memory",
        }
    }
}

/// Widget kind plus its kind-specific options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WidgetKind {
    /// Now-playing track info.
    MediaInfo {
        /// Fetch full-resolution album art.
        #[serde(default)]
        get_high_res: bool,
        /// Blur the album art backdrop.
        #[serde(default)]
        blur: bool,
    },
    /// Temperature timeline.
    Weather {
        /// Location latitude.
        #[serde(default = "default_latitude")]
        lat: f64,
        /// Location longitude.
        #[serde(default = "default_longitude")]
        lon: f64,
    },
    /// Smoothed performance graph.
    PerfGraph {
        /// Statistic to track.
        stat: PerfStat,
    },
    /// Per-disk usage bars.
    DiskUsage,
    /// Audio spectrum bars.
    Visualizer,
    /// Per-interface throughput.
    Network,
    /// Clock with current conditions.
    TimeDate {
        /// Location latitude.
        #[serde(default = "default_latitude")]
        lat: f64,
        /// Location longitude.
        #[serde(default = "default_longitude")]
        lon: f64,
    },
}

impl WidgetKind {
    /// Stable name of the kind, matching its config tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MediaInfo { .. } => "media-info",
            Self::Weather { .. } => "weather",
            Self::PerfGraph { .. } => "perf-graph",
            Self::DiskUsage => "disk-usage",
            Self::Visualizer => "visualizer",
            Self::Network => "network",
            Self::TimeDate { .. } => "time-date",
        }
    }
}

/// One configured widget instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WidgetConfig {
    /// Anchor cell.
    pub position: Position,

    /// Cells covered from the anchor.
    pub size: Size,

    /// Kind and options.
    #[serde(flatten)]
    pub kind: WidgetKind,
}

impl WidgetConfig {
    /// Placement request for the layout pass.
    #[must_use]
    pub fn placement(&self, id: impl Into<String>) -> PlacementRequest {
        PlacementRequest::new(
            id,
            self.position.col,
            self.position.row,
            self.size.cols,
            self.size.rows,
        )
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Global settings.
    #[serde(default)]
    pub global: GlobalConfig,

    /// Widget arrangement; an empty list renders an empty canvas.
    #[serde(default = "default_widgets")]
    pub widgets: Vec<WidgetConfig>,
}

fn default_version() -> u32 {
    1
}

fn default_widgets() -> Vec<WidgetConfig> {
    fn widget(col: u32, row: u32, cols: u32, rows: u32, kind: WidgetKind) -> WidgetConfig {
        WidgetConfig { position: Position { col, row }, size: Size { cols, rows }, kind }
    }

    vec![
        widget(1, 1, 1, 2, WidgetKind::DiskUsage),
        widget(
            2,
            1,
            5,
            1,
            WidgetKind::Weather { lat: DEFAULT_LATITUDE, lon: DEFAULT_LONGITUDE },
        ),
        widget(7, 1, 1, 2, WidgetKind::Network),
        widget(
            3,
            2,
            3,
            1,
            WidgetKind::TimeDate { lat: DEFAULT_LATITUDE, lon: DEFAULT_LONGITUDE },
        ),
        widget(3, 3, 3, 2, WidgetKind::MediaInfo { get_high_res: false, blur: false }),
        widget(2, 5, 1, 1, WidgetKind::PerfGraph { stat: PerfStat::Cpu }),
        widget(3, 5, 3, 1, WidgetKind::Visualizer),
        widget(6, 5, 1, 1, WidgetKind::PerfGraph { stat: PerfStat::Memory }),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            global: GlobalConfig::default(),
            widgets: default_widgets(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse { line, message: e.to_string() }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Placement requests for every configured widget, in declaration
    /// order, with ids derived from the kind and index.
    #[must_use]
    pub fn placements(&self) -> Vec<PlacementRequest> {
        self.widgets
            .iter()
            .enumerate()
            .map(|(i, w)| w.placement(format!("{}-{i}", w.kind.name())))
            .collect()
    }

    /// Checks value ranges that the schema alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(Error::ConfigInvalid {
                key: "version".to_string(),
                message: format!("unsupported version {}", self.version),
            });
        }
        if self.global.canvas_width == 0 || self.global.canvas_height == 0 {
            return Err(Error::ConfigInvalid {
                key: "global".to_string(),
                message: "canvas dimensions must be non-zero".to_string(),
            });
        }

        for (i, widget) in self.widgets.iter().enumerate() {
            let name = widget.kind.name();
            if widget.position.col == 0 || widget.position.row == 0 {
                return Err(Error::ConfigInvalid {
                    key: format!("widgets[{i}].position"),
                    message: format!("{name} position is 1-indexed"),
                });
            }
            if widget.size.cols == 0 || widget.size.rows == 0 {
                return Err(Error::ConfigInvalid {
                    key: format!("widgets[{i}].size"),
                    message: format!("{name} must span at least one cell"),
                });
            }
            if let WidgetKind::Weather { lat, lon } | WidgetKind::TimeDate { lat, lon } =
                widget.kind
            {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(Error::ConfigInvalid {
                        key: format!("widgets[{i}].lat"),
                        message: format!("latitude {lat} out of range"),
                    });
                }
                if !(-180.0..=180.0).contains(&lon) {
                    return Err(Error::ConfigInvalid {
                        key: format!("widgets[{i}].lon"),
                        message: format!("longitude {lon} out of range"),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_arrangement() {
        let config = Config::new();

        assert_eq!(config.version, 1);
        assert_eq!(config.widgets.len(), 8);
        assert_eq!(config.widgets[0].kind, WidgetKind::DiskUsage);
        assert_eq!(config.widgets[0].position, Position { col: 1, row: 1 });
        assert_eq!(config.widgets[0].size, Size { cols: 1, rows: 2 });

        let stats: Vec<PerfStat> = config
            .widgets
            .iter()
            .filter_map(|w| match w.kind {
                WidgetKind::PerfGraph { stat } => Some(stat),
                _ => None,
            })
            .collect();
        assert_eq!(stats, vec![PerfStat::Cpu, PerfStat::Memory]);
    }

    #[test]
    fn test_config_default_validates() {
        assert!(Config::new().validate().is_ok());
    }

    #[test]
    fn test_config_parse_minimal() {
        let config = Config::parse("version: 1").unwrap();

        assert_eq!(config.version, 1);
        assert_eq!(config.widgets.len(), 8, "widgets default to the stock arrangement");
        assert_eq!(config.global.canvas_width, 1280);
    }

    #[test]
    fn test_config_parse_full() {
        let yaml = r#"
version: 1
global:
  canvas_width: 1920
  canvas_height: 1080
  latitude: 52.52
  longitude: 13.405
widgets:
  - position: { col: 1, row: 1 }
    size: { cols: 2, rows: 1 }
    type: weather
    lat: 52.52
    lon: 13.405
  - position: { col: 1, row: 2 }
    size: { cols: 1, rows: 1 }
    type: perf-graph
    stat: cpu
  - position: { col: 2, row: 2 }
    size: { cols: 1, rows: 1 }
    type: disk-usage
"#;

        let config = Config::parse(yaml).unwrap();

        assert_eq!(config.global.canvas_width, 1920);
        assert_eq!(config.widgets.len(), 3);
        assert_eq!(config.widgets[0].kind, WidgetKind::Weather { lat: 52.52, lon: 13.405 });
        assert_eq!(config.widgets[1].kind, WidgetKind::PerfGraph { stat: PerfStat::Cpu });
        assert_eq!(config.widgets[2].kind, WidgetKind::DiskUsage);
    }

    #[test]
    fn test_config_widget_options_use_defaults() {
        let yaml = r#"
version: 1
widgets:
  - position: { col: 1, row: 1 }
    size: { cols: 2, rows: 1 }
    type: weather
  - position: { col: 1, row: 2 }
    size: { cols: 2, rows: 1 }
    type: media-info
"#;

        let config = Config::parse(yaml).unwrap();

        assert_eq!(
            config.widgets[0].kind,
            WidgetKind::Weather { lat: DEFAULT_LATITUDE, lon: DEFAULT_LONGITUDE }
        );
        assert_eq!(
            config.widgets[1].kind,
            WidgetKind::MediaInfo { get_high_res: false, blur: false }
        );
    }

    #[test]
    fn test_config_parse_error_includes_line() {
        let yaml = r#"
version: 1
global:
  canvas_width: not_a_number
"#;

        let err = Config::parse(yaml).unwrap_err();
        assert!(err.to_string().contains('4'), "error should name the line: {err}");
    }

    #[test]
    fn test_config_unknown_top_level_key_fails() {
        assert!(Config::parse("version: 1\nrefresh_rate: 60").is_err());
        assert!(Config::parse("version: 1\nglobal:\n  brightness: 0.5").is_err());
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let config = Config::new();
        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        assert_eq!(Config::parse(&yaml).unwrap(), config);
    }

    #[test]
    fn test_config_unknown_widget_type_fails() {
        let yaml = r#"
version: 1
widgets:
  - position: { col: 1, row: 1 }
    size: { cols: 1, rows: 1 }
    type: teleporter
"#;

        assert!(Config::parse(yaml).is_err());
    }

    #[test]
    fn test_config_unknown_stat_fails() {
        let yaml = r#"
version: 1
widgets:
  - position: { col: 1, row: 1 }
    size: { cols: 1, rows: 1 }
    type: perf-graph
    stat: flux
"#;

        assert!(Config::parse(yaml).is_err());
    }

    #[test]
    fn test_config_rejects_zero_size() {
        let yaml = r#"
version: 1
widgets:
  - position: { col: 1, row: 1 }
    size: { cols: 0, rows: 1 }
    type: disk-usage
"#;

        let err = Config::parse(yaml).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { ref key, .. } if key == "widgets[0].size"));
    }

    #[test]
    fn test_config_rejects_out_of_range_latitude() {
        let yaml = r#"
version: 1
widgets:
  - position: { col: 1, row: 1 }
    size: { cols: 1, rows: 1 }
    type: time-date
    lat: 120.0
"#;

        let err = Config::parse(yaml).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { ref key, .. } if key == "widgets[0].lat"));
    }

    #[test]
    fn test_config_rejects_unsupported_version() {
        let err = Config::parse("version: 9").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { ref key, .. } if key == "version"));
    }

    #[test]
    fn test_config_load_or_default() {
        let config = Config::load_or_default("/nonexistent/path");
        assert_eq!(config, Config::new());
    }

    #[test]
    fn test_config_placements_preserve_order() {
        let placements = Config::new().placements();

        assert_eq!(placements.len(), 8);
        assert_eq!(placements[0].id, "disk-usage-0");
        assert_eq!(placements[1].id, "weather-1");
        assert_eq!(placements[5].id, "perf-graph-5");
        assert_eq!(placements[0].col, 1);
        assert_eq!(placements[0].row_span, 2);
    }

    #[test]
    fn test_perf_stat_titles() {
        assert_eq!(PerfStat::Cpu.title(), "CPU");
        assert_eq!(PerfStat::Memory.title(), "Memory");
    }
}
