//! Human-readable value formatting and round-to-step helpers.
//!
//! Widgets display raw counters through these formatters: byte totals with
//! binary prefixes, clock rates with decimal prefixes, usage fractions as
//! whole percentages. The prefix index is derived from the value's
//! logarithm and clamped to the prefix table, so out-of-range magnitudes
//! saturate at the largest unit instead of overflowing the table.

const BYTE_PREFIXES: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const HERTZ_PREFIXES: [&str; 4] = ["Hz", "KHz", "MHz", "GHz"];

/// Scale `value` by the prefix whose magnitude it falls in.
///
/// Non-positive values print as zero in the base unit with no decimals;
/// everything else keeps two.
fn format_units(value: f64, prefixes: &[&str], exp: f64) -> String {
    if value <= 0.0 {
        return format!("0 {}", prefixes[0]);
    }
    let magnitude = (value.ln() / exp.ln()).floor();
    let i = magnitude.clamp(0.0, (prefixes.len() - 1) as f64) as usize;
    format!("{:.2} {}", value / exp.powi(i as i32), prefixes[i])
}

/// Format a byte count with binary (1024-based) prefixes.
#[must_use]
pub fn format_bytes(value: f64) -> String {
    format_units(value, &BYTE_PREFIXES, 1024.0)
}

/// Format a frequency with decimal (1000-based) prefixes.
#[must_use]
pub fn format_hertz(value: f64) -> String {
    format_units(value, &HERTZ_PREFIXES, 1000.0)
}

/// Format a usage fraction (0.0 to 1.0) as a whole percentage.
///
/// Rounds before clamping, so 0.999 prints as `100 %` and slight sensor
/// overshoot past 1.0 stays pinned at 100.
#[must_use]
pub fn format_percent(value: f64) -> String {
    let percent = (value * 100.0).round().clamp(0.0, 100.0) as i64;
    format!("{percent} %")
}

/// Round to the nearest multiple of `nearest`.
#[must_use]
pub fn round_to(value: f64, nearest: f64) -> f64 {
    (value / nearest).round() * nearest
}

/// Round down to a multiple of `nearest` (toward negative infinity).
#[must_use]
pub fn round_down(value: f64, nearest: f64) -> f64 {
    (value / nearest).floor() * nearest
}

/// Round up to a multiple of `nearest` (toward positive infinity).
#[must_use]
pub fn round_up(value: f64, nearest: f64) -> f64 {
    (value / nearest).ceil() * nearest
}
