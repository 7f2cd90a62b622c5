//! Scale functions for data-to-pixel mappings.
//!
//! Scales transform domain values (metric readings, instants) to pixel
//! positions. Mappings are affine and unclamped: values outside the domain
//! project outside the range, which overlay gradients rely on.

use chrono::{DateTime, FixedOffset};

use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
///
/// An inverted range (or domain) is valid and produces a descending map,
/// the normal case for y axes where smaller pixel values are "up".
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if domain min equals domain max.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if (domain.0 - domain.1).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Create a scale from data extent.
    #[must_use]
    pub fn from_data(data: &[f64], range: (f64, f64)) -> Option<Self> {
        if data.is_empty() {
            return None;
        }

        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self::new((min, max), range).ok()
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f64) -> f64 {
        let t = (value - self.range_min) / (self.range_max - self.range_min);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Linear scale from instants to pixels.
///
/// Offsets are respected through the instant itself; two timestamps with
/// different zone offsets but the same instant map to the same pixel.
#[derive(Debug, Clone, Copy)]
pub struct TimeScale {
    domain_start: DateTime<FixedOffset>,
    domain_end: DateTime<FixedOffset>,
    range_min: f64,
    range_max: f64,
}

impl TimeScale {
    /// Create a new time scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain endpoints are the same instant.
    pub fn new(
        domain: (DateTime<FixedOffset>, DateTime<FixedOffset>),
        range: (f64, f64),
    ) -> Result<Self> {
        if domain.0 == domain.1 {
            return Err(Error::ScaleDomain("Domain start and end cannot be equal".to_string()));
        }

        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }
}

impl Scale<DateTime<FixedOffset>, f64> for TimeScale {
    fn scale(&self, value: DateTime<FixedOffset>) -> f64 {
        let span = (self.domain_end - self.domain_start).num_milliseconds() as f64;
        let offset = (value - self.domain_start).num_milliseconds() as f64;
        self.range_min + (offset / span) * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
        (self.domain_start, self.domain_end)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}
