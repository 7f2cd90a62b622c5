//! Clock panel with date and a current-conditions line.
//!
//! The weather line renders as a single centered string with the condition
//! glyph embedded, so no text measurement is needed to keep the icon and
//! label visually joined. The line appears only once a report has arrived.

use chrono::{DateTime, FixedOffset};

use crate::color::Rgba;
use crate::scene::{Scene, TextAnchor};
use crate::weather::WeatherReport;

const TIME_FORMAT: &str = "%I:%M %p";
const DATE_FORMAT: &str = "%A, %B %-d, %Y";
const TIME_SIZE: f64 = 30.0;
const DATE_SIZE: f64 = 12.0;
const WEATHER_SIZE: f64 = 12.0;
const TIME_COLOR: Rgba = Rgba::WHITE;
const DATE_COLOR: Rgba = Rgba::rgb(0xcc, 0xcc, 0xcc);
const WEATHER_COLOR: Rgba = Rgba::rgb(0xaa, 0xaa, 0xaa);
const DIVIDER_COLOR: Rgba = Rgba::new(255, 255, 255, 0x22);

/// View model for the time/date widget.
#[derive(Debug, Clone, Default)]
pub struct TimeDatePanel;

impl TimeDatePanel {
    /// Create the widget.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the scene for the given instant.
    #[must_use]
    pub fn scene(
        &self,
        width: f64,
        height: f64,
        now: DateTime<FixedOffset>,
        report: Option<&WeatherReport>,
    ) -> Scene {
        let center = width / 2.0;
        let mut scene = Scene::new(width, height)
            .text_anchored(
                center,
                height * 0.38,
                now.format(TIME_FORMAT).to_string(),
                TIME_SIZE,
                TIME_COLOR,
                TextAnchor::Middle,
            )
            .line(width * 0.25, height * 0.48, width * 0.75, height * 0.48, DIVIDER_COLOR, 1.0)
            .text_anchored(
                center,
                height * 0.62,
                now.format(DATE_FORMAT).to_string(),
                DATE_SIZE,
                DATE_COLOR,
                TextAnchor::Middle,
            );

        if let Some(report) = report {
            let condition = report.condition();
            scene = scene.text_anchored(
                center,
                height * 0.80,
                format!(
                    "{} {}, {:.0}\u{b0}C",
                    condition.icon.glyph(),
                    condition.capitalized_label(),
                    report.current.temperature
                ),
                WEATHER_SIZE,
                WEATHER_COLOR,
                TextAnchor::Middle,
            );
        }

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneElement;
    use crate::weather::{CurrentConditions, SunEvent, SunEventKind};
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 15, hour, minute, 0)
            .unwrap()
    }

    fn report(code: u32, temperature: f64) -> WeatherReport {
        WeatherReport {
            timezone: "test".to_string(),
            current: CurrentConditions { at: at(13, 30), temperature, code },
            sun_events: vec![SunEvent { kind: SunEventKind::Sunrise, at: at(6, 30) }],
            hourly: vec![],
        }
    }

    fn texts(scene: &Scene) -> Vec<(String, TextAnchor)> {
        scene
            .elements()
            .iter()
            .filter_map(|e| match e {
                SceneElement::Text { text, anchor, .. } => Some((text.clone(), *anchor)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_time_renders_two_digit_twelve_hour() {
        let scene = TimeDatePanel::new().scene(300.0, 100.0, at(13, 30), None);
        assert_eq!(texts(&scene)[0].0, "01:30 PM");

        let morning = TimeDatePanel::new().scene(300.0, 100.0, at(9, 5), None);
        assert_eq!(texts(&morning)[0].0, "09:05 AM");
    }

    #[test]
    fn test_date_renders_long_form() {
        let scene = TimeDatePanel::new().scene(300.0, 100.0, at(13, 30), None);
        assert_eq!(texts(&scene)[1].0, "Saturday, June 15, 2024");
    }

    #[test]
    fn test_weather_line_requires_report() {
        let without = TimeDatePanel::new().scene(300.0, 100.0, at(13, 30), None);
        assert_eq!(texts(&without).len(), 2);

        let with = TimeDatePanel::new().scene(300.0, 100.0, at(13, 30), Some(&report(0, 19.4)));
        assert_eq!(texts(&with).len(), 3);
    }

    #[test]
    fn test_weather_line_embeds_glyph_and_rounds() {
        let scene = TimeDatePanel::new().scene(300.0, 100.0, at(13, 30), Some(&report(0, 19.4)));
        assert_eq!(texts(&scene)[2].0, "\u{2600} Clear, 19\u{b0}C");

        let stormy = TimeDatePanel::new().scene(300.0, 100.0, at(13, 30), Some(&report(95, 7.8)));
        assert_eq!(texts(&stormy)[2].0, "\u{26c8} Thunderstorm, 8\u{b0}C");
    }

    #[test]
    fn test_all_rows_centered() {
        let scene = TimeDatePanel::new().scene(300.0, 100.0, at(13, 30), Some(&report(0, 19.4)));
        assert!(texts(&scene).iter().all(|(_, anchor)| *anchor == TextAnchor::Middle));

        let centered_x = scene.elements().iter().all(|e| match e {
            SceneElement::Text { x, .. } => (*x - 150.0).abs() < f64::EPSILON,
            _ => true,
        });
        assert!(centered_x);
    }
}
