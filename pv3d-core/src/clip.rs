/// Segment clipping for edges with an endpoint behind the camera
///
/// A point behind the camera still projects somewhere, but on the wrong side
/// of the screen. Instead of clipping against the near plane, the behind
/// endpoint is slid along the segment until it reaches the screen-width
/// bound on one axis. This is an approximation: steep crossings can bend
/// visibly, since the true near-plane crossing is never computed.
use nalgebra::{Point2, Vector2};

use crate::math::sign;
use crate::projection::ProjectedPoint;

/// A segment endpoint in screen space
pub type ScreenPoint = Point2<f64>;

fn screen_point(p: &ProjectedPoint) -> ScreenPoint {
    Point2::new(p.x as f64, p.y as f64)
}

/// Turn two projected endpoints into a drawable segment.
///
/// Returns `None` when both endpoints are behind the camera. Endpoint order
/// is preserved.
pub fn clip(
    a: &ProjectedPoint,
    b: &ProjectedPoint,
    screen_width: f64,
) -> Option<(ScreenPoint, ScreenPoint)> {
    let (from, to) = (screen_point(a), screen_point(b));

    match (a.behind, b.behind) {
        (true, true) => None,
        (false, false) => Some((from, to)),
        (true, false) => Some((pull_toward(from, to, screen_width), to)),
        (false, true) => Some((from, pull_toward(to, from, screen_width))),
    }
}

/// Move `behind` toward `visible` until one coordinate reaches
/// `±screen_width` in the direction of travel.
fn pull_toward(behind: ScreenPoint, visible: ScreenPoint, screen_width: f64) -> ScreenPoint {
    let delta = visible - behind;

    match clip_fraction(&behind, &delta, screen_width) {
        Some(fraction) => behind + delta * fraction,
        None => behind,
    }
}

/// Smallest fraction of `delta` that brings `start` to the bound on either
/// axis. An axis with no movement offers no candidate.
fn clip_fraction(start: &ScreenPoint, delta: &Vector2<f64>, screen_width: f64) -> Option<f64> {
    let candidate = |position: f64, step: f64| {
        (step != 0.0).then(|| (sign(step) * screen_width - position) / step)
    };

    match (candidate(start.x, delta.x), candidate(start.y, delta.y)) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, y) => x.or(y),
    }
}
