/// The per-frame view plane
///
/// Instead of a projection matrix, every frame builds a plane one unit in
/// front of the camera and perpendicular to its orientation. Scene points
/// are projected by intersecting their camera ray with this plane.
use nalgebra::{Point3, Vector3};

use crate::camera::CameraState;
use crate::error::GeometryError;
use crate::math::EPSILON;

/// Plane `normal · p + d = 0` anchored at `center`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPlane {
    normal: Vector3<f64>,
    d: f64,
    center: Point3<f64>,
}

impl ViewPlane {
    /// Build the view plane for the current camera
    pub fn build(state: &CameraState) -> Result<Self, GeometryError> {
        let normal = state.orientation;
        let length = normal.norm();
        if length < EPSILON {
            return Err(GeometryError::ZeroLengthVector);
        }

        let center = state.position + normal / length;
        let d = -normal.dot(&center.coords);

        Ok(Self { normal, d, center })
    }

    /// Plane normal; this is the camera orientation it was built from
    pub fn normal(&self) -> &Vector3<f64> {
        &self.normal
    }

    /// Where the optical axis pierces the plane
    pub fn center(&self) -> &Point3<f64> {
        &self.center
    }

    /// Signed plane equation value at `point`, zero on the plane
    pub fn evaluate(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) + self.d
    }

    /// Intersect the line through `origin` and `point` with the plane
    pub fn intersect_ray(
        &self,
        origin: &Point3<f64>,
        point: &Point3<f64>,
    ) -> Result<Point3<f64>, GeometryError> {
        let direction = point - origin;
        let denominator = self.normal.dot(&direction);
        if denominator.abs() < EPSILON {
            return Err(GeometryError::DegenerateRay);
        }

        let lambda = -self.evaluate(point) / denominator;
        Ok(point + direction * lambda)
    }
}
