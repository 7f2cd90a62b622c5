//! Temperature timeline.
//!
//! Draws a 32-hour forecast window: a smoothed temperature curve filled
//! with a temperature-keyed gradient, isotherm gridlines, a day/night strip
//! under the graph with noon, midnight, sunrise, and sunset markers, and a
//! vertical line at the current instant.
//!
//! Both gradients reuse the frame's own projection for their stop offsets,
//! so a stop belonging to an instant or temperature outside the window
//! simply lands outside `0..=1` and clips, exactly like the guides.

use chrono::{DateTime, FixedOffset};

use crate::color::{ColorRamp, Rgba};
use crate::error::Result;
use crate::geometry::Point;
use crate::scene::{GradientAxis, GradientStop, LinearGradient, Paint, Scene, TextAnchor};
use crate::spline::{smooth_path, DEFAULT_TENSION};
use crate::timeline::{TimelineFrame, TimelineScale};
use crate::weather::{SunEventKind, WeatherReport};

/// Vertical space reserved below the graph for the day/night strip and the
/// marker time labels.
const GRAPH_INSET: f64 = 28.0;
const TIME_BAR_HEIGHT: f64 = 18.0;
/// Markers and the now line start below the top edge so the "Now" label
/// has room above them.
const MARKER_TOP: f64 = 15.0;
const ICON_FRACTION: f64 = 0.8;
const TIME_FORMAT: &str = "%H:%M";
const LABEL_SIZE: f64 = 10.0;
const DASH: f64 = 2.0;
const SKY_OPACITY: f64 = 0.3;
const CURVE_WIDTH: f64 = 2.0;
const CURVE_FILL_ALPHA: u8 = 0x2c;
const DOT_RADIUS: f64 = 2.5;
const DOT_HALO_RADIUS: f64 = 4.0;
const GRID_STROKE: Rgba = Rgba::rgb(0x44, 0x44, 0x44);
const NOW_STROKE: Rgba = Rgba::rgb(0x99, 0x99, 0x99);
const LABEL_COLOR: Rgba = Rgba::rgb(0xaa, 0xaa, 0xaa);
const MARKER_ICON_FILL: Rgba = Rgba::new(255, 255, 255, 0xaa);
const DOT_HALO_FILL: Rgba = Rgba::new(255, 255, 255, 0x22);
const NOON_GLYPH: &str = "\u{2600}";
const MIDNIGHT_GLYPH: &str = "\u{263e}";
const SUN_EVENT_GLYPH: &str = "\u{263c}";

/// View model for the weather timeline widget.
#[derive(Debug, Clone)]
pub struct WeatherTimeline {
    id: String,
}

impl WeatherTimeline {
    /// Create the widget.
    ///
    /// The id prefixes the gradient definitions so two timelines on one
    /// canvas keep separate paints.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Build the scene for the given instant.
    ///
    /// No report renders an empty panel. A report without samples still
    /// draws the day/night strip, markers, and the now line.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame's projection cannot be built, which
    /// requires a zero-length window or equal temperature bounds.
    pub fn scene(
        &self,
        width: f64,
        height: f64,
        now: DateTime<FixedOffset>,
        report: Option<&WeatherReport>,
    ) -> Result<Scene> {
        let mut scene = Scene::new(width, height);
        let Some(report) = report else {
            return Ok(scene);
        };

        let frame = TimelineFrame::new(now, report);
        let graph_height = height - GRAPH_INSET;
        let scale = TimelineScale::new(&frame, width, graph_height)?;
        let ramp = ColorRamp::temperature();

        let sky_id = format!("{}-sky", self.id);
        let temp_id = format!("{}-temp", self.id);
        scene = scene
            .gradient(sky_gradient(&sky_id, &frame, &scale, width))
            .gradient(temp_gradient(&temp_id, &ramp, &scale, graph_height))
            .rect_faded(
                0.0,
                graph_height,
                width,
                TIME_BAR_HEIGHT,
                Paint::Gradient(sky_id),
                SKY_OPACITY,
            );

        for at in &frame.noons {
            scene = marker(scene, &scale, *at, NOON_GLYPH, graph_height, height);
        }
        for at in &frame.midnights {
            scene = marker(scene, &scale, *at, MIDNIGHT_GLYPH, graph_height, height);
        }
        for kind in [SunEventKind::Sunset, SunEventKind::Sunrise] {
            for event in frame.sun_events.iter().filter(|e| e.kind == kind) {
                scene = marker(scene, &scale, event.at, SUN_EVENT_GLYPH, graph_height, height);
            }
        }

        // The curve is bracketed down to the baseline at both window edges
        // but left unclosed; the baseline itself stays unstroked.
        let mut points = Vec::with_capacity(frame.samples.len() + 2);
        points.push(Point::new(scale.x(frame.start), graph_height));
        points.extend(frame.samples.iter().map(|s| scale.project(s)));
        points.push(Point::new(scale.x(frame.end), graph_height));
        scene = scene.path(
            smooth_path(&points, DEFAULT_TENSION),
            Paint::Gradient(temp_id),
            Some(GRID_STROKE),
            CURVE_WIDTH,
        );

        for &temperature in &frame.isotherms {
            let y = scale.y(temperature);
            scene = scene.dashed_line(0.0, y, width, y, GRID_STROKE, 1.0, DASH).text_anchored(
                width,
                y - 2.0,
                format!("{temperature}\u{b0}C"),
                LABEL_SIZE,
                LABEL_COLOR,
                TextAnchor::End,
            );
        }

        let now_x = scale.x(frame.now);
        scene = scene
            .line(now_x, MARKER_TOP, now_x, graph_height, NOW_STROKE, 1.0)
            .text_anchored(now_x, LABEL_SIZE, "Now", LABEL_SIZE, Rgba::WHITE, TextAnchor::Middle);

        for sample in &frame.samples {
            let p = scale.project(sample);
            scene = scene
                .circle(p.x, p.y, DOT_RADIUS, ramp.color_at(sample.temperature))
                .circle(p.x, p.y, DOT_HALO_RADIUS, DOT_HALO_FILL);
        }

        Ok(scene)
    }
}

/// Day/night gradient across the time axis: white at each noon, black at
/// each midnight, stops ordered by instant.
fn sky_gradient(
    id: &str,
    frame: &TimelineFrame,
    scale: &TimelineScale,
    graph_width: f64,
) -> LinearGradient {
    let mut keyed: Vec<(DateTime<FixedOffset>, Rgba)> = frame
        .noons
        .iter()
        .map(|at| (*at, Rgba::WHITE))
        .chain(frame.midnights.iter().map(|at| (*at, Rgba::BLACK)))
        .collect();
    keyed.sort_by_key(|(at, _)| *at);

    LinearGradient {
        id: id.to_string(),
        axis: GradientAxis::Horizontal,
        stops: keyed
            .into_iter()
            .map(|(at, color)| GradientStop { offset: scale.x(at) / graph_width, color })
            .collect(),
    }
}

/// Vertical fill gradient keyed by temperature: the ramp's interior stops
/// projected through the frame's y axis, reordered by pixel offset.
fn temp_gradient(
    id: &str,
    ramp: &ColorRamp,
    scale: &TimelineScale,
    graph_height: f64,
) -> LinearGradient {
    let ramp_stops = ramp.stops();
    let mut stops: Vec<GradientStop> = ramp_stops[1..ramp_stops.len() - 1]
        .iter()
        .map(|stop| GradientStop {
            offset: scale.y(stop.value) / graph_height,
            color: ramp.color_at(stop.value).with_alpha(CURVE_FILL_ALPHA),
        })
        .collect();
    stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));

    LinearGradient { id: id.to_string(), axis: GradientAxis::Vertical, stops }
}

fn marker(
    scene: Scene,
    scale: &TimelineScale,
    at: DateTime<FixedOffset>,
    glyph: &str,
    graph_height: f64,
    height: f64,
) -> Scene {
    let x = scale.x(at);
    let icon_size = TIME_BAR_HEIGHT * ICON_FRACTION;

    scene
        .glyph(
            x - icon_size / 2.0,
            graph_height + (TIME_BAR_HEIGHT - icon_size) / 2.0,
            icon_size,
            glyph,
            MARKER_ICON_FILL,
        )
        .dashed_line(x, MARKER_TOP, x, graph_height, GRID_STROKE, 1.0, DASH)
        .text_anchored(
            x,
            height,
            at.format(TIME_FORMAT).to_string(),
            LABEL_SIZE,
            Rgba::WHITE,
            TextAnchor::Middle,
        )
}
