//! Smoothed performance graph with a watermark title.
//!
//! Renders one metric pipeline's history window as a smooth curve over a
//! faint gridline backdrop, with a gradient underfill and a dot on the
//! latest reading. Readings are percentages; the vertical axis is fixed at
//! 0–100 so the curve never rescales between frames.
//!
//! Points are spaced by the history *capacity*, not the current length, so
//! a filling buffer grows rightward from the left edge instead of
//! stretching to fit.

use crate::color::Rgba;
use crate::geometry::Point;
use crate::pipeline::MetricSnapshot;
use crate::scene::{GradientAxis, GradientStop, LinearGradient, Paint, Scene, TextAnchor};
use crate::spline::{area_path, smooth_path, DEFAULT_TENSION};

const LINE_COLOR: Rgba = Rgba::rgb(0x4f, 0xac, 0xfe);
const FILL_TOP: Rgba = Rgba::new(0x4f, 0xac, 0xfe, 0x17);
const FILL_BOTTOM: Rgba = Rgba::new(0, 39, 41, 18);
const GRIDLINE_COLOR: Rgba = Rgba::new(255, 255, 255, 0x14);
const TITLE_COLOR: Rgba = Rgba::new(255, 255, 255, 0x28);
const DOT_COLOR: Rgba = Rgba::WHITE;

const H_GRIDLINES: u32 = 9;
const V_GRIDLINES: u32 = 5;
const TITLE_SIZE: f64 = 12.0;
const LINE_WIDTH: f64 = 2.0;
const DOT_RADIUS: f64 = 4.0;
const FULL_SCALE: f64 = 100.0;
/// Minimum history length before the curve paths are drawn.
const MIN_CURVE_POINTS: usize = 4;

/// View model for one performance graph widget.
#[derive(Debug, Clone)]
pub struct PerfGraph {
    id: String,
    title: String,
    capacity: usize,
}

impl PerfGraph {
    /// Create a graph for the widget with the given id and title.
    ///
    /// The id prefixes the underfill gradient so two graphs on one canvas
    /// do not collide. Capacity defaults to the pipeline default of 25.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), capacity: 25 }
    }

    /// Set the history capacity used for horizontal point spacing.
    ///
    /// Must match the pipeline's capacity or the curve will end short of
    /// (or past) the right edge.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is less than two.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 1, "graph spacing needs a capacity of at least two");
        self.capacity = capacity;
        self
    }

    /// Title shown as the watermark.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Build the scene for one snapshot.
    #[must_use]
    pub fn scene(&self, width: f64, height: f64, snapshot: &MetricSnapshot) -> Scene {
        let fill_id = format!("{}-fill", self.id);

        let mut scene = Scene::new(width, height).gradient(LinearGradient {
            id: fill_id.clone(),
            axis: GradientAxis::Vertical,
            stops: vec![
                GradientStop { offset: 0.0, color: FILL_TOP },
                GradientStop { offset: 1.0, color: FILL_BOTTOM },
            ],
        });

        for i in 0..H_GRIDLINES {
            let y = (f64::from(i) / f64::from(H_GRIDLINES) + 0.05) * height;
            scene = scene.line(0.0, y, width, y, GRIDLINE_COLOR, 1.0);
        }
        for i in 0..V_GRIDLINES {
            let x = (f64::from(i) / f64::from(V_GRIDLINES) + 0.1) * width;
            scene = scene.line(x, 0.0, x, height, GRIDLINE_COLOR, 1.0);
        }

        scene = scene.text_anchored(
            width / 2.0,
            height / 2.0,
            &self.title,
            TITLE_SIZE,
            TITLE_COLOR,
            TextAnchor::Middle,
        );

        let step = width / (self.capacity - 1) as f64;
        let points: Vec<Point> = snapshot
            .history
            .iter()
            .enumerate()
            .map(|(i, v)| Point::new(i as f64 * step, height - (v / FULL_SCALE) * height))
            .collect();

        if points.len() >= MIN_CURVE_POINTS {
            let fill = area_path(
                &points,
                Point::new(0.0, height),
                Point::new(width, height),
                DEFAULT_TENSION,
            );
            scene = scene
                .path(fill, Paint::Gradient(fill_id), None, 0.0)
                .path(smooth_path(&points, DEFAULT_TENSION), Paint::None, Some(LINE_COLOR), LINE_WIDTH);
        }

        if let Some(last) = points.last() {
            scene = scene.circle(last.x, last.y, DOT_RADIUS, DOT_COLOR);
        }

        scene
    }
}
