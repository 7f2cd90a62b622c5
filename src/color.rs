//! Color types for scene output.
//!
//! The render boundary consumes colors as hex strings, so [`Rgba`] focuses
//! on construction and formatting. [`ColorRamp`] maps a scalar (typically a
//! temperature) onto a color through an ordered stop table.

use std::fmt;

use crate::error::{Error, Result};

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Format as a hex string: `#rrggbb`, or `#rrggbbaa` when translucent.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Parse a `#rrggbb` or `#rrggbbaa` hex string.
    ///
    /// # Errors
    ///
    /// Returns an error for any other shape.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 && digits.len() != 8 {
            return Err(invalid());
        }

        let byte = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(invalid)
        };

        let a = if digits.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// One stop of a [`ColorRamp`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampStop {
    /// Domain value at which this stop applies.
    pub value: f64,
    /// Stop color.
    pub color: Rgba,
}

/// Value-to-color lookup through an ordered stop table.
///
/// Lookup is a threshold scan, not an interpolation: the first stop after
/// the head whose value exceeds the input wins, and inputs beyond the table
/// clamp to the last stop.
#[derive(Debug, Clone)]
pub struct ColorRamp {
    stops: Vec<RampStop>,
}

impl ColorRamp {
    /// Create a ramp from `(value, color)` stops.
    ///
    /// Stops are sorted by value on construction.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two stops are given.
    pub fn new(mut stops: Vec<RampStop>) -> Result<Self> {
        if stops.len() < 2 {
            return Err(Error::ScaleDomain(
                "color ramp requires at least two stops".to_string(),
            ));
        }

        stops.sort_by(|a, b| a.value.total_cmp(&b.value));
        Ok(Self { stops })
    }

    /// The standard outdoor-temperature ramp (°C), deep blue through red.
    #[must_use]
    pub fn temperature() -> Self {
        Self {
            stops: vec![
                RampStop { value: -20.0, color: Rgba::rgb(0x00, 0x00, 0xff) },
                RampStop { value: 5.0, color: Rgba::rgb(0x04, 0x61, 0xe4) },
                RampStop { value: 15.0, color: Rgba::rgb(0xa0, 0xe0, 0xff) },
                RampStop { value: 18.0, color: Rgba::rgb(0xe6, 0xff, 0xaa) },
                RampStop { value: 26.0, color: Rgba::rgb(0xdb, 0xe7, 0x2f) },
                RampStop { value: 32.0, color: Rgba::rgb(0xff, 0xaa, 0x00) },
                RampStop { value: 40.0, color: Rgba::rgb(0xff, 0x55, 0x00) },
                RampStop { value: 99.0, color: Rgba::rgb(0xff, 0x26, 0x00) },
            ],
        }
    }

    /// Look up the color for a value.
    #[must_use]
    pub fn color_at(&self, value: f64) -> Rgba {
        for stop in self.stops.iter().skip(1) {
            if value < stop.value {
                return stop.color;
            }
        }
        self.stops.last().map_or(Rgba::BLACK, |s| s.color)
    }

    /// All stops, ascending by value.
    #[must_use]
    pub fn stops(&self) -> &[RampStop] {
        &self.stops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_opaque() {
        assert_eq!(Rgba::rgb(255, 170, 0).to_hex(), "#ffaa00");
        assert_eq!(Rgba::BLACK.to_hex(), "#000000");
    }

    #[test]
    fn test_hex_translucent() {
        let c = Rgba::rgb(0xdb, 0xe7, 0x2f).with_alpha(0x2c);
        assert_eq!(c.to_hex(), "#dbe72f2c");
    }

    #[test]
    fn test_display_matches_hex() {
        let c = Rgba::rgb(4, 97, 228);
        assert_eq!(format!("{c}"), c.to_hex());
    }

    #[test]
    fn test_with_alpha_preserves_rgb() {
        let c = Rgba::rgb(255, 0, 0).with_alpha(128);
        assert_eq!(c.r, 255);
        assert_eq!(c.a, 128);
    }

    #[test]
    fn test_from_hex_opaque() {
        assert_eq!(Rgba::from_hex("#ffaa00").unwrap(), Rgba::rgb(255, 170, 0));
        assert_eq!(Rgba::from_hex("#000000").unwrap(), Rgba::BLACK);
    }

    #[test]
    fn test_from_hex_translucent() {
        let c = Rgba::from_hex("#dbe72f2c").unwrap();
        assert_eq!(c, Rgba::rgb(0xdb, 0xe7, 0x2f).with_alpha(0x2c));
        assert_eq!(c.to_hex(), "#dbe72f2c");
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert!(Rgba::from_hex("ffaa00").is_err());
        assert!(Rgba::from_hex("#fff").is_err());
        assert!(Rgba::from_hex("#gghhii").is_err());
        assert!(Rgba::from_hex("#ffaa0").is_err());
        assert!(Rgba::from_hex("").is_err());
    }

    #[test]
    fn test_ramp_requires_two_stops() {
        let one = vec![RampStop { value: 0.0, color: Rgba::WHITE }];
        assert!(ColorRamp::new(one).is_err());
        assert!(ColorRamp::new(vec![]).is_err());
    }

    #[test]
    fn test_ramp_sorts_stops() {
        let ramp = ColorRamp::new(vec![
            RampStop { value: 10.0, color: Rgba::WHITE },
            RampStop { value: 0.0, color: Rgba::BLACK },
        ])
        .unwrap();
        assert_eq!(ramp.stops()[0].value, 0.0);
    }

    #[test]
    fn test_temperature_lookup() {
        let ramp = ColorRamp::temperature();
        // Mild temperatures land in the pale-blue band.
        assert_eq!(ramp.color_at(10.0), Rgba::rgb(0xa0, 0xe0, 0xff));
        // Between 18 and 26 the next stop up wins.
        assert_eq!(ramp.color_at(20.0), Rgba::rgb(0xdb, 0xe7, 0x2f));
    }

    #[test]
    fn test_temperature_clamps_high() {
        let ramp = ColorRamp::temperature();
        assert_eq!(ramp.color_at(150.0), Rgba::rgb(0xff, 0x26, 0x00));
    }

    #[test]
    fn test_temperature_below_table() {
        let ramp = ColorRamp::temperature();
        // The threshold scan starts at the second stop, so arbitrarily cold
        // inputs resolve to that stop's color.
        assert_eq!(ramp.color_at(-40.0), Rgba::rgb(0x04, 0x61, 0xe4));
    }
}
