//! Temperature timeline frame for the weather widget.
//!
//! A [`TimelineFrame`] fixes everything one 32-hour view of a
//! [`WeatherReport`] needs before any pixel math happens:
//!
//! - **Window**: two hours behind `now` through thirty hours ahead.
//! - **Samples**: hourly readings within an hour of the window, so the
//!   curve enters and leaves the frame mid-stroke instead of stopping at
//!   the edge.
//! - **Bounds**: the sample extent rounded outward to multiples of three,
//!   plus two degrees of headroom at the top. The headroom keeps the
//!   bounds strictly ordered even when every sample is the same value.
//! - **Guides**: midnight and noon instants for each calendar day the
//!   window touches, sun events strictly inside the window, and isotherms
//!   at multiples of five strictly between the bounds.
//!
//! Frames are plain data. [`TimelineScale`] projects instants and
//! temperatures into an unclamped pixel rectangle, so guides slightly
//! outside the window (the first midnight usually is) land at negative
//! coordinates and clip naturally.

use chrono::{DateTime, Duration, FixedOffset, Timelike};

use crate::error::Result;
use crate::geometry::Point;
use crate::scale::{LinearScale, Scale, TimeScale};
use crate::units::{round_down, round_up};
use crate::weather::{HourlySample, SunEvent, WeatherReport};

const HOURS_BEHIND: i64 = 2;
const HOURS_AHEAD: i64 = 30;
const SAMPLE_PAD_HOURS: i64 = 1;
const TEMP_ROUND: f64 = 3.0;
const TEMP_HEADROOM: f64 = 2.0;
const ISOTHERM_STEP: f64 = 5.0;

/// Everything a render pass needs to draw one timeline view.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineFrame {
    /// The instant the frame was computed for.
    pub now: DateTime<FixedOffset>,
    /// Window start, two hours before `now`.
    pub start: DateTime<FixedOffset>,
    /// Window end, thirty hours after `now`.
    pub end: DateTime<FixedOffset>,
    /// Hourly samples within an hour of the window, ascending.
    pub samples: Vec<HourlySample>,
    /// Lower temperature bound, a multiple of three at or below the
    /// coldest sample.
    pub temp_min: f64,
    /// Upper temperature bound, two degrees above a multiple of three at
    /// or above the warmest sample.
    pub temp_max: f64,
    /// Midnight instants for each day the window touches; the first
    /// usually precedes the window start.
    pub midnights: Vec<DateTime<FixedOffset>>,
    /// Noon instants, one per midnight.
    pub noons: Vec<DateTime<FixedOffset>>,
    /// Sun events strictly inside the window, ascending.
    pub sun_events: Vec<SunEvent>,
    /// Isotherm temperatures, multiples of five strictly between the
    /// bounds, ascending.
    pub isotherms: Vec<f64>,
}

impl TimelineFrame {
    /// Compute the frame for `now` from a weather report.
    #[must_use]
    pub fn new(now: DateTime<FixedOffset>, report: &WeatherReport) -> Self {
        let start = now - Duration::hours(HOURS_BEHIND);
        let end = now + Duration::hours(HOURS_AHEAD);
        let pad = Duration::hours(SAMPLE_PAD_HOURS);

        let samples: Vec<HourlySample> = report
            .hourly
            .iter()
            .copied()
            .filter(|s| s.at > start - pad && s.at < end + pad)
            .collect();

        // Seeds keep the fold total even with no samples; the resulting
        // inverted bounds draw an empty frame rather than dividing by zero.
        let coldest = samples.iter().fold(100.0_f64, |m, s| m.min(s.temperature));
        let warmest = samples.iter().fold(-100.0_f64, |m, s| m.max(s.temperature));
        let temp_min = round_down(coldest, TEMP_ROUND);
        let temp_max = round_up(warmest, TEMP_ROUND) + TEMP_HEADROOM;

        let first_midnight = start_of_day(start);
        let n_days = (end.date_naive() - start.date_naive()).num_days() + 1;
        let midnights: Vec<DateTime<FixedOffset>> =
            (0..n_days).map(|i| first_midnight + Duration::days(i)).collect();
        let noons: Vec<DateTime<FixedOffset>> =
            midnights.iter().map(|m| *m + Duration::hours(12)).collect();

        let sun_events: Vec<SunEvent> = report
            .sun_events
            .iter()
            .copied()
            .filter(|e| e.at > start && e.at < end)
            .collect();

        let mut isotherms = Vec::new();
        let mut t = round_up(temp_min, ISOTHERM_STEP);
        if t <= temp_min {
            t += ISOTHERM_STEP;
        }
        while t < temp_max {
            // round_up can yield -0.0 just below zero.
            isotherms.push(if t == 0.0 { 0.0 } else { t });
            t += ISOTHERM_STEP;
        }

        Self {
            now,
            start,
            end,
            samples,
            temp_min,
            temp_max,
            midnights,
            noons,
            sun_events,
            isotherms,
        }
    }

    /// Whether the frame has any samples to draw a curve through.
    #[must_use]
    pub fn has_samples(&self) -> bool {
        !self.samples.is_empty()
    }
}

/// Projection of a [`TimelineFrame`] onto a pixel rectangle.
///
/// The x axis maps the window onto `0..graph_width`; the y axis maps the
/// temperature bounds onto `graph_height..0`, warm side up. Neither axis
/// clamps.
#[derive(Debug, Clone)]
pub struct TimelineScale {
    x: TimeScale,
    y: LinearScale,
}

impl TimelineScale {
    /// Build the projection for a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if either axis would have an empty domain. The
    /// frame's headroom makes that unreachable for frames built by
    /// [`TimelineFrame::new`].
    pub fn new(frame: &TimelineFrame, graph_width: f64, graph_height: f64) -> Result<Self> {
        let x = TimeScale::new((frame.start, frame.end), (0.0, graph_width))?;
        let y = LinearScale::new((frame.temp_min, frame.temp_max), (graph_height, 0.0))?;
        Ok(Self { x, y })
    }

    /// Pixel x of an instant.
    #[must_use]
    pub fn x(&self, at: DateTime<FixedOffset>) -> f64 {
        self.x.scale(at)
    }

    /// Pixel y of a temperature.
    #[must_use]
    pub fn y(&self, temperature: f64) -> f64 {
        self.y.scale(temperature)
    }

    /// Pixel position of an hourly sample.
    #[must_use]
    pub fn project(&self, sample: &HourlySample) -> Point {
        Point::new(self.x(sample.at), self.y(sample.temperature))
    }
}

fn start_of_day(t: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    t.with_hour(0)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}
