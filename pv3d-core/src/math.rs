/// Vector and plane helpers shared by the camera and the projector
use nalgebra::{Point3, Vector3};

use crate::error::GeometryError;

/// Denominators smaller than this are treated as zero
pub const EPSILON: f64 = 1e-12;

/// Sign of `x` as -1, 0 or 1. Unlike `f64::signum`, zero maps to zero.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Angle in radians between two vectors of any length
pub fn angle_between(v: &Vector3<f64>, w: &Vector3<f64>) -> Result<f64, GeometryError> {
    let magnitudes = v.norm() * w.norm();
    if magnitudes < EPSILON {
        return Err(GeometryError::ZeroLengthVector);
    }

    // Rounding can push the cosine just outside [-1, 1]
    let cosine = (v.dot(w) / magnitudes).clamp(-1.0, 1.0);
    Ok(cosine.acos())
}

/// Scale the (x, y) pair of `v` to unit length, leaving z untouched
pub fn normalize_horizontal(v: &Vector3<f64>) -> Result<Vector3<f64>, GeometryError> {
    let magnitude = v.x.hypot(v.y);
    if magnitude < EPSILON {
        return Err(GeometryError::DegenerateHorizon);
    }

    Ok(Vector3::new(v.x / magnitude, v.y / magnitude, v.z))
}

/// Heading of `to - from` in the xy plane, in (-π, π]
pub fn horizontal_angle(from: &Point3<f64>, to: &Point3<f64>) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}
