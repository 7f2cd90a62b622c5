//! Smooth curve paths through ordered point sequences.
//!
//! Live history curves and weather timelines render as Catmull-Rom style
//! cubic splines instead of jagged polylines. Control points derive from
//! the chord lengths of the surrounding segments, so tangents scale with
//! local point spacing and unevenly spaced samples do not overshoot or
//! loop. The first and last points are duplicated as virtual neighbors,
//! which keeps the curve inside the data at both ends.
//!
//! Output is an SVG path description. Identical input always yields the
//! identical string.
//!
//! # Example
//!
//! ```rust,ignore
//! use deskviz::geometry::Point;
//! use deskviz::spline::{smooth_path, DEFAULT_TENSION};
//!
//! let points = vec![Point::new(0.0, 40.0), Point::new(50.0, 10.0), Point::new(100.0, 25.0)];
//! let d = smooth_path(&points, DEFAULT_TENSION);
//! assert!(d.starts_with("M 0 40"));
//! ```

use crate::geometry::Point;

/// Default curve tension. Higher values pull the curve flatter toward the
/// chords; lower values hug the data points more tightly.
pub const DEFAULT_TENSION: f64 = 0.35;

/// Control points for the segment between `p1` and `p2`, with `p0` and
/// `p3` as their outer neighbors.
///
/// Tangent lengths are weighted by the chords `d01`, `d12`, `d23`. A zero
/// chord sum would leave the tangent direction undefined, so its factor
/// degenerates to zero and the control point collapses onto the data
/// point, keeping every output coordinate finite.
fn control_points(p0: Point, p1: Point, p2: Point, p3: Point, tension: f64) -> (Point, Point) {
    let d01 = p0.distance(p1);
    let d12 = p1.distance(p2);
    let d23 = p2.distance(p3);

    let fa = if d01 + d12 > 0.0 { tension * d01 / (d01 + d12) } else { 0.0 };
    let fb = if d12 + d23 > 0.0 { tension * d12 / (d12 + d23) } else { 0.0 };

    let cp1 = Point::new(p1.x - fa * (p0.x - p2.x), p1.y - fa * (p0.y - p2.y));
    let cp2 = Point::new(p2.x + fb * (p1.x - p3.x), p2.y + fb * (p1.y - p3.y));
    (cp1, cp2)
}

/// Build a smooth open path through `points`.
///
/// Degenerate inputs produce the documented degenerate output rather than
/// an error: no points yield an empty string, one point a bare move, two
/// points a straight line. Three or more points produce a quadratic lead-in
/// and lead-out around cubic interior segments, one segment per interior
/// point pair.
#[must_use]
pub fn smooth_path(points: &[Point], tension: f64) -> String {
    match points {
        [] => String::new(),
        [p] => format!("M {} {}", p.x, p.y),
        [a, b] => format!("M {} {} L {} {}", a.x, a.y, b.x, b.y),
        _ => {
            let n = points.len();
            let mut path = format!("M {} {}", points[0].x, points[0].y);

            let (_, cp2) = control_points(points[0], points[0], points[1], points[2], tension);
            path.push_str(&format!(" Q {} {} {} {}", cp2.x, cp2.y, points[1].x, points[1].y));

            for i in 1..n - 2 {
                let (cp1, cp2) =
                    control_points(points[i - 1], points[i], points[i + 1], points[i + 2], tension);
                path.push_str(&format!(
                    " C {} {} {} {} {} {}",
                    cp1.x,
                    cp1.y,
                    cp2.x,
                    cp2.y,
                    points[i + 1].x,
                    points[i + 1].y
                ));
            }

            let (cp1, _) =
                control_points(points[n - 3], points[n - 2], points[n - 1], points[n - 1], tension);
            path.push_str(&format!(
                " Q {} {} {} {}",
                cp1.x,
                cp1.y,
                points[n - 1].x,
                points[n - 1].y
            ));

            path
        }
    }
}

/// Build a closed area-under-curve region.
///
/// The data points are bracketed by `left` and `right` baseline points at
/// the chart edges, smoothed as one sequence, and explicitly closed so the
/// region can be filled or stroked.
#[must_use]
pub fn area_path(points: &[Point], left: Point, right: Point, tension: f64) -> String {
    let mut bracketed = Vec::with_capacity(points.len() + 2);
    bracketed.push(left);
    bracketed.extend_from_slice(points);
    bracketed.push(right);

    let mut path = smooth_path(&bracketed, tension);
    path.push_str(" Z");
    path
}
