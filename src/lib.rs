//! # deskviz
//!
//! Telemetry dashboard engine for fixed-size desk displays: a constraint
//! grid layout, per-widget polled metric pipelines, smooth spline path
//! generation, and a weather timeline mapper, composed into render-ready
//! widget scenes.
//!
//! The engine owns no window, canvas, or network socket. Metric sources
//! cross the boundary as async getter/transform pairs, weather data as a
//! [`weather::WeatherProvider`], and output leaves as SVG documents or
//! scene element lists any renderer can consume.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use deskviz::prelude::*;
//! use std::sync::Arc;
//!
//! let sources = MetricSources::new(Arc::new(provider))
//!     .cpu_percent(|| async { backend.cpu().await });
//!
//! let mut dashboard = Dashboard::new(Config::load_or_default("deskviz.yaml"));
//! dashboard.start(&sources);
//! // each render tick:
//! let svg = dashboard.canvas(now).render();
//! ```
//!
//! ## Architecture
//!
//! - [`grid`]: pure placement engine; sizes the grid, detects overlaps,
//!   tiles gaps with fillers
//! - [`pipeline`]: poller + exponential smoother + rolling history per
//!   widget, each stage usable alone
//! - [`spline`]: Catmull-Rom-style smooth paths and area fills from point
//!   sequences
//! - [`timeline`]: time/value-to-pixel maps and overlay series for the
//!   weather graph
//! - [`widgets`] and [`dashboard`]: view-model builders and the group
//!   lifecycle that ties everything together

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and the value-stop color ramp.
pub mod color;

/// Geometric primitives in pixel space.
pub mod geometry;

/// Scale functions for data-to-pixel mappings.
pub mod scale;

/// Unit formatting and step rounding helpers.
pub mod units;

// ============================================================================
// Engine Modules
// ============================================================================

/// Constraint-based grid layout and gap filling.
pub mod grid;

/// Polled metric pipelines (poller, smoother, history).
pub mod pipeline;

/// Smooth curve and area path generation.
pub mod spline;

/// Weather timeline scales and overlay series.
pub mod timeline;

/// Weather data model and provider boundary.
pub mod weather;

// ============================================================================
// Composition Modules
// ============================================================================

/// Dashboard configuration (YAML).
pub mod config;

/// Scene model and SVG assembly.
pub mod scene;

/// Per-kind widget view models.
pub mod widgets;

/// Dashboard assembly: layout, pipelines, and scene collection.
pub mod dashboard;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for deskviz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use deskviz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::{ColorRamp, Rgba};
    pub use crate::config::{Config, WidgetConfig, WidgetKind};
    pub use crate::dashboard::{Dashboard, MetricSources};
    pub use crate::error::{Error, Result};
    pub use crate::geometry::Point;
    pub use crate::grid::{layout, GridLayout, PlacementRequest};
    pub use crate::pipeline::{
        HistoryBuffer, MetricPipeline, MetricSnapshot, PipelineConfig, Poller, Smoother,
    };
    pub use crate::scale::{LinearScale, Scale, TimeScale};
    pub use crate::scene::{Canvas, Scene};
    pub use crate::spline::{area_path, smooth_path};
    pub use crate::timeline::{TimelineFrame, TimelineScale};
    pub use crate::weather::{WeatherProvider, WeatherReport};
}

// ============================================================================
// Tests
// ============================================================================
