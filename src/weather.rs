//! Weather domain: reports, condition codes, and the provider boundary.
//!
//! The engine does not talk to a forecast service itself. A
//! [`WeatherProvider`] supplies one [`WeatherReport`] per fetch: current
//! conditions, an hourly temperature series spanning several days, and
//! sunrise/sunset instants. Every timestamp carries the queried location's
//! own UTC offset, never the process locale, so a dashboard in Berlin
//! renders Cape Town's timeline in Cape Town time.
//!
//! Condition codes follow the WMO interpretation table used by forecast
//! services; [`Condition::from_wmo_code`] maps them to display labels and
//! icon classes.

use chrono::{DateTime, Duration, FixedOffset, Timelike};

use crate::error::Result;

/// Icon class for a weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionIcon {
    /// Clear sky.
    Sun,
    /// Partly cloudy.
    CloudSun,
    /// Overcast.
    Cloud,
    /// Fog or rime fog.
    Fog,
    /// Light rain with breaks of sun.
    SunRain,
    /// Rain or drizzle.
    Rain,
    /// Snow in any intensity.
    Snow,
    /// Rain showers.
    Showers,
    /// Thunderstorm, with or without hail.
    Thunder,
    /// Code not in the interpretation table.
    Unknown,
}

impl ConditionIcon {
    /// Glyph used when the icon is drawn as text.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Sun => "\u{2600}",
            Self::CloudSun => "\u{26c5}",
            Self::Cloud => "\u{2601}",
            Self::Fog => "\u{1f32b}",
            Self::SunRain => "\u{1f326}",
            Self::Rain => "\u{1f327}",
            Self::Snow => "\u{2744}",
            Self::Showers => "\u{2614}",
            Self::Thunder => "\u{26c8}",
            Self::Unknown => "?",
        }
    }
}

/// A display-ready weather condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Lowercase description, e.g. `partly cloudy`.
    pub label: String,
    /// Icon class to render next to the label.
    pub icon: ConditionIcon,
}

impl Condition {
    /// Interpret a WMO weather code.
    ///
    /// Unknown codes yield a label naming the code rather than an error;
    /// a forecast with a new code still renders.
    #[must_use]
    pub fn from_wmo_code(code: u32) -> Self {
        let (label, icon) = match code {
            0 | 1 => ("clear", ConditionIcon::Sun),
            2 => ("partly cloudy", ConditionIcon::CloudSun),
            3 => ("overcast", ConditionIcon::Cloud),
            45 | 48 => ("fog", ConditionIcon::Fog),
            51 => ("light drizzle", ConditionIcon::SunRain),
            53 | 55 | 56 | 57 => ("drizzle", ConditionIcon::Rain),
            61 => ("slight rain", ConditionIcon::SunRain),
            63 => ("moderate rain", ConditionIcon::Rain),
            65 | 67 => ("heavy rain", ConditionIcon::Rain),
            66 => ("light rain", ConditionIcon::Rain),
            71 | 85 => ("slight snow", ConditionIcon::Snow),
            73 => ("moderate snow", ConditionIcon::Snow),
            75 | 86 => ("heavy snow", ConditionIcon::Snow),
            77 => ("snow", ConditionIcon::Snow),
            80 => ("slight showers", ConditionIcon::Showers),
            81 => ("moderate showers", ConditionIcon::Showers),
            82 => ("violent showers", ConditionIcon::Showers),
            95 | 96 | 99 => ("thunderstorm", ConditionIcon::Thunder),
            other => {
                return Self {
                    label: format!("unknown (code {other})"),
                    icon: ConditionIcon::Unknown,
                }
            }
        };
        Self { label: label.to_string(), icon }
    }

    /// The label with its first letter uppercased, for standalone display.
    #[must_use]
    pub fn capitalized_label(&self) -> String {
        let mut chars = self.label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

/// Whether a sun event is the sun coming up or going down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunEventKind {
    /// Sunrise.
    Sunrise,
    /// Sunset.
    Sunset,
}

/// One sunrise or sunset instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunEvent {
    /// Which event this is.
    pub kind: SunEventKind,
    /// When it occurs, in the location's own offset.
    pub at: DateTime<FixedOffset>,
}

/// One point of the hourly temperature series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlySample {
    /// Sample instant, in the location's own offset.
    pub at: DateTime<FixedOffset>,
    /// Air temperature in degrees Celsius.
    pub temperature: f64,
}

/// Current conditions at the queried location.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Observation instant, in the location's own offset.
    pub at: DateTime<FixedOffset>,
    /// Air temperature in degrees Celsius.
    pub temperature: f64,
    /// WMO weather code.
    pub code: u32,
}

/// A complete weather report for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// IANA zone name of the location, informational only; the offsets on
    /// the timestamps are authoritative.
    pub timezone: String,
    /// Conditions right now.
    pub current: CurrentConditions,
    /// Sunrise and sunset instants, ascending by time.
    pub sun_events: Vec<SunEvent>,
    /// Hourly temperatures over the report's multi-day window, ascending.
    pub hourly: Vec<HourlySample>,
}

impl WeatherReport {
    /// Condition interpretation of the current weather code.
    #[must_use]
    pub fn condition(&self) -> Condition {
        Condition::from_wmo_code(self.current.code)
    }
}

/// Source of weather reports for a coordinate pair.
///
/// Implementations are expected to resolve the location's timezone and
/// stamp every instant with that offset.
pub trait WeatherProvider: Send + Sync {
    /// Fetch a report for the given coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying source is unreachable or
    /// returns an unusable payload.
    fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherReport>;
}

/// Deterministic offline provider for demos and tests.
///
/// Generates a plausible diurnal temperature curve around a fixed `now`:
/// hourly samples from the previous midnight through three days ahead,
/// sunrise at 06:30 and sunset at 18:30 local, and a condition code picked
/// from the coordinates. Two fetches with the same inputs produce the
/// identical report.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticProvider {
    now: DateTime<FixedOffset>,
}

impl SyntheticProvider {
    /// Number of days of hourly samples, including the past day.
    const REPORT_DAYS: i64 = 4;

    /// Create a provider anchored at the given instant.
    #[must_use]
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    fn temperature_at(latitude: f64, at: DateTime<FixedOffset>) -> f64 {
        let hour = f64::from(at.hour()) + f64::from(at.minute()) / 60.0;
        let base = 22.0 - latitude.abs() / 6.0;
        let swing = 6.0;
        // Warmest around 15:00 local.
        base + swing * ((hour - 9.0) / 24.0 * std::f64::consts::TAU).sin()
    }

    fn code_for(latitude: f64, longitude: f64) -> u32 {
        const CODES: [u32; 5] = [0, 2, 3, 61, 80];
        let pick = (latitude.abs() + longitude.abs()) as usize;
        CODES[pick % CODES.len()]
    }
}

impl WeatherProvider for SyntheticProvider {
    fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherReport> {
        let day_start = self.now - Duration::days(1);
        let first_midnight = day_start
            .with_hour(0)
            .and_then(|t| t.with_minute(0))
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(day_start);

        let hourly = (0..Self::REPORT_DAYS * 24)
            .map(|i| {
                let at = first_midnight + Duration::hours(i);
                HourlySample { at, temperature: Self::temperature_at(latitude, at) }
            })
            .collect();

        let mut sun_events = Vec::new();
        for day in 0..Self::REPORT_DAYS {
            let midnight = first_midnight + Duration::days(day);
            sun_events.push(SunEvent {
                kind: SunEventKind::Sunrise,
                at: midnight + Duration::minutes(6 * 60 + 30),
            });
            sun_events.push(SunEvent {
                kind: SunEventKind::Sunset,
                at: midnight + Duration::minutes(18 * 60 + 30),
            });
        }
        sun_events.sort_by_key(|e| e.at);

        Ok(WeatherReport {
            timezone: "synthetic".to_string(),
            current: CurrentConditions {
                at: self.now,
                temperature: Self::temperature_at(latitude, self.now),
                code: Self::code_for(latitude, longitude),
            },
            sun_events,
            hourly,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn anchor() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 15, 13, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_wmo_clear_codes() {
        for code in [0, 1] {
            let condition = Condition::from_wmo_code(code);
            assert_eq!(condition.label, "clear");
            assert_eq!(condition.icon, ConditionIcon::Sun);
        }
    }

    #[test]
    fn test_wmo_cloud_codes() {
        assert_eq!(Condition::from_wmo_code(2).label, "partly cloudy");
        assert_eq!(Condition::from_wmo_code(2).icon, ConditionIcon::CloudSun);
        assert_eq!(Condition::from_wmo_code(3).label, "overcast");
        assert_eq!(Condition::from_wmo_code(45).icon, ConditionIcon::Fog);
        assert_eq!(Condition::from_wmo_code(48).icon, ConditionIcon::Fog);
    }

    #[test]
    fn test_wmo_rain_codes() {
        assert_eq!(Condition::from_wmo_code(51).icon, ConditionIcon::SunRain);
        assert_eq!(Condition::from_wmo_code(55).label, "drizzle");
        assert_eq!(Condition::from_wmo_code(61).label, "slight rain");
        assert_eq!(Condition::from_wmo_code(61).icon, ConditionIcon::SunRain);
        assert_eq!(Condition::from_wmo_code(65).label, "heavy rain");
        assert_eq!(Condition::from_wmo_code(66).label, "light rain");
        assert_eq!(Condition::from_wmo_code(82).label, "violent showers");
        assert_eq!(Condition::from_wmo_code(82).icon, ConditionIcon::Showers);
    }

    #[test]
    fn test_wmo_snow_and_thunder_codes() {
        for code in [71, 73, 75, 77, 85, 86] {
            assert_eq!(Condition::from_wmo_code(code).icon, ConditionIcon::Snow);
        }
        for code in [95, 96, 99] {
            let condition = Condition::from_wmo_code(code);
            assert_eq!(condition.label, "thunderstorm");
            assert_eq!(condition.icon, ConditionIcon::Thunder);
        }
    }

    #[test]
    fn test_wmo_unknown_code_names_itself() {
        let condition = Condition::from_wmo_code(1234);
        assert_eq!(condition.label, "unknown (code 1234)");
        assert_eq!(condition.icon, ConditionIcon::Unknown);
    }

    #[test]
    fn test_capitalized_label() {
        assert_eq!(Condition::from_wmo_code(2).capitalized_label(), "Partly cloudy");
        assert_eq!(Condition::from_wmo_code(0).capitalized_label(), "Clear");
    }

    #[test]
    fn test_icon_glyphs() {
        assert_eq!(ConditionIcon::Sun.glyph(), "\u{2600}");
        assert_eq!(ConditionIcon::Thunder.glyph(), "\u{26c8}");
        assert_eq!(ConditionIcon::Unknown.glyph(), "?");
    }

    #[test]
    fn test_synthetic_provider_is_deterministic() {
        let provider = SyntheticProvider::new(anchor());
        let a = provider.fetch(-33.92, 18.86).unwrap();
        let b = provider.fetch(-33.92, 18.86).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_synthetic_hourly_series_shape() {
        let provider = SyntheticProvider::new(anchor());
        let report = provider.fetch(-33.92, 18.86).unwrap();

        assert_eq!(report.hourly.len(), 96);
        assert!(report.hourly.windows(2).all(|w| w[0].at < w[1].at), "hourly must ascend");

        let first = report.hourly[0].at;
        assert_eq!((first.hour(), first.minute()), (0, 0), "series starts at a midnight");
        assert!(first < anchor() - Duration::hours(23), "series reaches back a full day");
    }

    #[test]
    fn test_synthetic_sun_events_sorted_and_paired() {
        let provider = SyntheticProvider::new(anchor());
        let report = provider.fetch(-33.92, 18.86).unwrap();

        assert_eq!(report.sun_events.len(), 8);
        assert!(report.sun_events.windows(2).all(|w| w[0].at < w[1].at));
        assert_eq!(report.sun_events[0].kind, SunEventKind::Sunrise);
        assert_eq!(report.sun_events[1].kind, SunEventKind::Sunset);
    }

    #[test]
    fn test_synthetic_timestamps_keep_offset() {
        let provider = SyntheticProvider::new(anchor());
        let report = provider.fetch(-33.92, 18.86).unwrap();

        let offset = anchor().offset().local_minus_utc();
        assert_eq!(report.current.at.offset().local_minus_utc(), offset);
        assert!(report.hourly.iter().all(|s| s.at.offset().local_minus_utc() == offset));
        assert!(report.sun_events.iter().all(|e| e.at.offset().local_minus_utc() == offset));
    }

    #[test]
    fn test_synthetic_temperatures_plausible() {
        let provider = SyntheticProvider::new(anchor());
        let report = provider.fetch(-33.92, 18.86).unwrap();

        assert!(report.hourly.iter().all(|s| s.temperature.is_finite()));
        assert!(report.hourly.iter().all(|s| (-40.0..60.0).contains(&s.temperature)));
        assert!(report.current.temperature.is_finite());
    }

    #[test]
    fn test_report_condition_uses_current_code() {
        let provider = SyntheticProvider::new(anchor());
        let report = provider.fetch(0.0, 0.0).unwrap();
        assert_eq!(report.condition().label, Condition::from_wmo_code(report.current.code).label);
    }
}
