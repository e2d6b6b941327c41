/// Point projection onto the screen through the view plane
use nalgebra::{distance, Point3, Vector2, Vector3};
use std::f64::consts::FRAC_PI_2;

use crate::config::RenderConfig;
use crate::error::GeometryError;
use crate::math::{self, EPSILON};
use crate::plane::ViewPlane;

/// A scene point after projection, in whole screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedPoint {
    pub x: i32,
    pub y: i32,
    /// The point lies at or beyond 90° from the view direction
    pub behind: bool,
}

/// Maps scene points to screen pixels for a fixed screen and field of view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    fov: f64,
    screen_width: f64,
    screen_height: f64,
    overflow_clamp: f64,
}

impl Projector {
    /// `fov` is the horizontal field of view in radians
    pub fn new(fov: f64, screen_width: u32, screen_height: u32, overflow_clamp: f64) -> Self {
        Self {
            fov,
            screen_width: screen_width as f64,
            screen_height: screen_height as f64,
            overflow_clamp,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(
            config.fov_radians(),
            config.screen_width,
            config.screen_height,
            config.overflow_clamp,
        )
    }

    pub fn screen_width(&self) -> f64 {
        self.screen_width
    }

    /// Project `point` as seen from `camera` through `plane`
    pub fn project(
        &self,
        camera: &Point3<f64>,
        point: &Point3<f64>,
        plane: &ViewPlane,
    ) -> Result<ProjectedPoint, GeometryError> {
        let behind = is_behind(camera, plane.normal(), point)?;
        let intersection = plane.intersect_ray(camera, point)?;
        let (horizon, left) = closest_point_on_horizon(plane, &intersection)?;

        let mut horizontal = distance(plane.center(), &horizon);
        if left {
            horizontal = -horizontal;
        }
        let mut vertical = distance(&horizon, &intersection);
        if intersection.z < horizon.z {
            vertical = -vertical;
        }

        let offset = self.scale_to_screen(Vector2::new(horizontal, vertical));
        let offset = clamp_overflow(offset, self.overflow_clamp);

        Ok(ProjectedPoint {
            x: (self.screen_width / 2.0 + offset.x) as i32,
            y: (self.screen_height / 2.0 - offset.y) as i32,
            behind,
        })
    }

    /// Convert distances on the view plane into pixel offsets.
    ///
    /// Both axes use half the screen width, so the vertical field of view
    /// follows from the aspect ratio.
    fn scale_to_screen(&self, plane_offset: Vector2<f64>) -> Vector2<f64> {
        let max_extent = (self.fov / 2.0).tan();
        plane_offset / max_extent * (self.screen_width / 2.0)
    }
}

/// Whether `point` is at least 90° away from `orientation` as seen from `camera`.
///
/// A point exactly perpendicular to the view direction counts as behind.
pub fn is_behind(
    camera: &Point3<f64>,
    orientation: &Vector3<f64>,
    point: &Point3<f64>,
) -> Result<bool, GeometryError> {
    let angle = math::angle_between(orientation, &(point - camera))?;
    Ok(angle >= FRAC_PI_2)
}

/// Closest point to `target` on the horizon line through the plane center.
///
/// The horizon runs through the center, level in z, perpendicular to the
/// camera heading. The flag is set when `target` lies left of center.
pub fn closest_point_on_horizon(
    plane: &ViewPlane,
    target: &Point3<f64>,
) -> Result<(Point3<f64>, bool), GeometryError> {
    let (p, q) = (plane.normal().x, plane.normal().y);
    let length_squared = p * p + q * q;
    if length_squared < EPSILON {
        return Err(GeometryError::DegenerateHorizon);
    }

    let center = plane.center();
    let lambda = (q * center.x - q * target.x + p * target.y - p * center.y) / length_squared;
    let horizon = Point3::new(center.x - lambda * q, center.y + lambda * p, center.z);

    Ok((horizon, lambda > 0.0))
}

/// Bound pixel offsets to `limit` on each axis, preserving their ratio.
///
/// Points almost in the view plane project absurdly far out; only their
/// direction matters for clipping.
pub fn clamp_overflow(offset: Vector2<f64>, limit: f64) -> Vector2<f64> {
    let mut offset = offset;
    if offset.y.abs() > limit {
        let scale = limit / offset.y.abs();
        offset = Vector2::new(offset.x * scale, math::sign(offset.y) * limit);
    }
    if offset.x.abs() > limit {
        let scale = limit / offset.x.abs();
        offset = Vector2::new(math::sign(offset.x) * limit, offset.y * scale);
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraState;

    fn projector() -> Projector {
        Projector::new(90f64.to_radians(), 1280, 720, 30000.0)
    }

    fn view(position: Point3<f64>, facing: Vector3<f64>) -> (CameraState, ViewPlane) {
        let state = CameraState::new(position, facing).unwrap();
        let plane = ViewPlane::build(&state).unwrap();
        (state, plane)
    }

    #[test]
    fn test_center_of_plane_maps_to_screen_center() {
        let facings = [
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(-3.0, 0.5, 1.2),
            Vector3::new(0.2, -1.0, -0.7),
        ];
        for facing in facings {
            let (state, plane) = view(Point3::new(1.5, -2.0, 0.5), facing);
            let projected = projector()
                .project(&state.position, plane.center(), &plane)
                .unwrap();
            assert_eq!((projected.x, projected.y), (640, 360));
            assert!(!projected.behind);
        }
    }

    #[test]
    fn test_points_on_optical_axis_share_a_pixel() {
        let (state, plane) = view(Point3::new(0.0, 0.0, 1.0), Vector3::new(1.0, 0.0, 0.0));
        for t in [0.5, 1.0, 2.0, 10.0, 1000.0] {
            let projected = projector()
                .project(&state.position, &Point3::new(t, 0.0, 1.0), &plane)
                .unwrap();
            assert!((projected.x - 640).abs() <= 1, "x = {} at t = {}", projected.x, t);
            assert!((projected.y - 360).abs() <= 1, "y = {} at t = {}", projected.y, t);
        }
    }

    #[test]
    fn test_left_and_up_offsets() {
        let (state, plane) = view(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));

        // Half a unit left and up on the plane is halfway to the edge of a 90° view
        let projected = projector()
            .project(&state.position, &Point3::new(2.0, 1.0, 1.0), &plane)
            .unwrap();
        assert!((projected.x - 320).abs() <= 1);
        assert!((projected.y - 40).abs() <= 1);

        let projected = projector()
            .project(&state.position, &Point3::new(2.0, -1.0, -1.0), &plane)
            .unwrap();
        assert!((projected.x - 960).abs() <= 1);
        assert!((projected.y - 680).abs() <= 1);
    }

    #[test]
    fn test_perpendicular_point_is_behind() {
        let camera = Point3::origin();
        let orientation = Vector3::new(1.0, 0.0, 0.0);

        assert!(is_behind(&camera, &orientation, &Point3::new(0.0, 1.0, 0.0)).unwrap());
        assert!(is_behind(&camera, &orientation, &Point3::new(-1.0, 1.0, 0.0)).unwrap());
        assert!(!is_behind(&camera, &orientation, &Point3::new(0.001, 1.0, 0.0)).unwrap());
    }

    #[test]
    fn test_point_at_camera_is_degenerate() {
        let (state, plane) = view(Point3::new(0.0, 0.0, 1.0), Vector3::new(1.0, 0.0, 0.0));
        let result = projector().project(&state.position, &state.position, &plane);
        assert_eq!(result, Err(GeometryError::ZeroLengthVector));
    }

    #[test]
    fn test_point_in_camera_plane_is_degenerate() {
        let (state, plane) = view(Point3::new(0.0, 0.0, 1.0), Vector3::new(1.0, 0.0, 0.0));
        let result = projector().project(&state.position, &Point3::new(0.0, 3.0, 1.0), &plane);
        assert_eq!(result, Err(GeometryError::DegenerateRay));
    }

    #[test]
    fn test_behind_point_still_projects() {
        let (state, plane) = view(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
        let projected = projector()
            .project(&state.position, &Point3::new(-2.0, 1.0, 0.0), &plane)
            .unwrap();
        assert!(projected.behind);
    }

    #[test]
    fn test_clamp_overflow_preserves_ratio() {
        let clamped = clamp_overflow(Vector2::new(10000.0, 60000.0), 30000.0);
        assert_eq!(clamped.y, 30000.0);
        assert_eq!(clamped.x, 5000.0);

        let clamped = clamp_overflow(Vector2::new(-90000.0, 3000.0), 30000.0);
        assert_eq!(clamped.x, -30000.0);
        assert!((clamped.y - 1000.0).abs() < 1e-9);

        let untouched = Vector2::new(100.0, -200.0);
        assert_eq!(clamp_overflow(untouched, 30000.0), untouched);
    }

    #[test]
    fn test_near_plane_points_are_clamped() {
        let (state, plane) = view(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
        let projected = projector()
            .project(&state.position, &Point3::new(1e-7, 0.0, 5.0), &plane)
            .unwrap();
        assert_eq!(projected.y, 360 - 30000);
        assert_eq!(projected.x, 640);
    }

    #[test]
    fn test_degenerate_horizon() {
        let (mut state, _) = view(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
        state.orientation = Vector3::new(0.0, 0.0, 1.0);
        let plane = ViewPlane::build(&state).unwrap();

        let result = closest_point_on_horizon(&plane, &Point3::new(1.0, 1.0, 1.0));
        assert_eq!(result, Err(GeometryError::DegenerateHorizon));
    }
}
