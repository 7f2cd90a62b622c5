//! Audio spectrum bars.
//!
//! Raw FFT magnitudes arrive normalized to `0..=1`. The transform reshapes
//! them with a cubic response curve so quiet program material does not pin
//! the bars, and watches for sustained silence: after two seconds with every
//! bin at the noise floor, the bars switch to a slow synthetic wave instead
//! of a dead flatline. Any real signal snaps back immediately.
//!
//! The wave is driven by the tick counter, not wall time, so a paused-clock
//! test run produces the same animation frames every time.

use std::future::{ready, Ready};
use std::time::Duration;

use crate::color::Rgba;
use crate::scene::Scene;

/// Magnitudes at or below this fraction of full scale count as silence.
const SILENCE_LEVEL: f64 = 0.01;
/// Silence must persist this long before the idle wave starts.
const SILENCE_DELAY_SECS: f64 = 2.0;
/// Input level mapped to zero output by the response curve.
const SPECTRUM_FLOOR: f64 = 0.6;
/// Smallest bar height the response curve emits.
const QUIET_FLOOR: f64 = 0.04;
/// Idle wave amplitude margin at both ends of the range.
const IDLE_PADDING: f64 = 0.2;
/// Fraction of each slot occupied by the bar.
const BAR_DENSITY: f64 = 0.4;
const BAR_FILL: Rgba = Rgba::rgb(0x41, 0x40, 0x40);
const CAP_FILL: Rgba = Rgba::WHITE;
const CAP_HEIGHT: f64 = 3.0;

fn shape(magnitude: f64) -> f64 {
    (((magnitude - SPECTRUM_FLOOR) / (1.0 - SPECTRUM_FLOOR)).powi(3)).max(QUIET_FLOOR)
}

fn idle_wave(len: usize, t: f64) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let phase = i as f64 / len as f64 * std::f64::consts::PI;
            let hi = (7.0 * phase + 2.0 * t).sin();
            let mid = (4.0 * phase + t).sin();
            let lo = (2.0 * phase - t).sin();
            let norm = (hi + mid + lo) / 3.0 * 0.5 + 0.5;
            norm * (1.0 - 2.0 * IDLE_PADDING) + IDLE_PADDING
        })
        .collect()
}

/// Poll transform that reshapes FFT frames and swaps in the idle wave
/// during sustained silence.
///
/// A failed fetch publishes an empty frame, which also counts as silence.
pub fn spectrum_transform(
    interval: Duration,
) -> impl FnMut(Option<Vec<f64>>) -> Ready<Option<Vec<f64>>> {
    let secs = interval.as_secs_f64();
    let mut tick: u64 = 0;
    let mut silent_since: Option<u64> = None;

    move |raw| {
        let frame = raw.unwrap_or_default();
        let silent = frame.iter().all(|&m| m <= SILENCE_LEVEL);

        let out = if silent {
            let since = *silent_since.get_or_insert(tick);
            if (tick - since) as f64 * secs > SILENCE_DELAY_SECS {
                idle_wave(frame.len(), tick as f64 * secs)
            } else {
                frame.iter().copied().map(shape).collect()
            }
        } else {
            silent_since = None;
            frame.iter().copied().map(shape).collect()
        };

        tick += 1;
        ready(Some(out))
    }
}

/// View model for the spectrum widget.
#[derive(Debug, Clone, Default)]
pub struct SpectrumBars;

impl SpectrumBars {
    /// Create the widget.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the scene; each magnitude is a `0..=1` fraction of the height.
    #[must_use]
    pub fn scene(&self, width: f64, height: f64, magnitudes: &[f64]) -> Scene {
        let mut scene = Scene::new(width, height);
        if magnitudes.is_empty() {
            return scene;
        }

        let slot = width / magnitudes.len() as f64;
        let spacing = slot * (1.0 - BAR_DENSITY);
        let bar_width = slot - spacing;

        for (i, &magnitude) in magnitudes.iter().enumerate() {
            let bar_height = magnitude * height;
            let x = i as f64 * slot + spacing / 2.0;
            let top = height - bar_height;

            scene = scene
                .rect(x, top, bar_width, bar_height, BAR_FILL)
                .rect(x, top, bar_width, CAP_HEIGHT, CAP_FILL);
        }

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneElement;

    const INTERVAL: Duration = Duration::from_millis(50);

    #[test]
    fn test_response_curve() {
        assert!((shape(1.0) - 1.0).abs() < 1e-12);
        assert!((shape(0.8) - 0.125).abs() < 1e-12);
        assert!((shape(0.6) - QUIET_FLOOR).abs() < 1e-12, "floor input clamps to quiet floor");
        assert!((shape(0.3) - QUIET_FLOOR).abs() < 1e-12, "sub-floor input clamps too");
    }

    #[test]
    fn test_idle_wave_is_deterministic_and_bounded() {
        let a = idle_wave(16, 3.0);
        let b = idle_wave(16, 3.0);
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (0.2..=0.8).contains(v)));
        assert!(a.iter().any(|v| (v - a[0]).abs() > 1e-6), "wave varies across bars");
    }

    #[tokio::test]
    async fn test_live_frames_are_shaped() {
        let mut transform = spectrum_transform(INTERVAL);
        let out = transform(Some(vec![1.0, 0.8, 0.0])).await.unwrap();
        assert!((out[0] - 1.0).abs() < 1e-12);
        assert!((out[1] - 0.125).abs() < 1e-12);
        assert!((out[2] - QUIET_FLOOR).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_idle_wave_starts_after_two_seconds_of_silence() {
        let mut transform = spectrum_transform(INTERVAL);

        // 41 ticks cover exactly 2.0s since the first silent tick; the
        // strict threshold keeps the shaped floor until the next one.
        for _ in 0..41 {
            let out = transform(Some(vec![0.0; 4])).await.unwrap();
            assert!(out.iter().all(|v| (v - QUIET_FLOOR).abs() < 1e-12));
        }

        let idle = transform(Some(vec![0.0; 4])).await.unwrap();
        assert!(idle.iter().all(|v| (0.2..=0.8).contains(v)), "idle wave took over: {idle:?}");
    }

    #[tokio::test]
    async fn test_signal_resets_the_silence_clock() {
        let mut transform = spectrum_transform(INTERVAL);
        for _ in 0..41 {
            transform(Some(vec![0.0; 4])).await.unwrap();
        }

        transform(Some(vec![0.9; 4])).await.unwrap();
        let out = transform(Some(vec![0.0; 4])).await.unwrap();
        assert!(
            out.iter().all(|v| (v - QUIET_FLOOR).abs() < 1e-12),
            "one loud frame restarts the delay"
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_publishes_empty_frame() {
        let mut transform = spectrum_transform(INTERVAL);
        assert_eq!(transform(None).await, Some(vec![]));
    }

    #[test]
    fn test_bar_geometry() {
        let scene = SpectrumBars::new().scene(40.0, 100.0, &[0.5, 0.5, 0.5, 0.5]);

        let rects: Vec<(f64, f64, f64, f64)> = scene
            .elements()
            .iter()
            .filter_map(|e| match e {
                SceneElement::Rect { x, y, width, height, .. } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .collect();

        assert_eq!(rects.len(), 8, "a bar and a cap per bin");
        assert_eq!(rects[0], (3.0, 50.0, 4.0, 50.0));
        assert_eq!(rects[1], (3.0, 50.0, 4.0, CAP_HEIGHT));
        assert_eq!(rects[2].0, 13.0, "slots advance by width / len");
    }

    #[test]
    fn test_empty_spectrum_renders_nothing() {
        let scene = SpectrumBars::new().scene(40.0, 100.0, &[]);
        assert!(scene.elements().is_empty());
    }
}
