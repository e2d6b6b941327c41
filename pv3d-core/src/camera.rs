/// Camera state and the per-tick motion model
use nalgebra::{Point3, Vector3};
use std::f64::consts::FRAC_PI_2;

use crate::error::GeometryError;
use crate::math::{self, normalize_horizontal};

/// Closest the vertical angle may get to either pole, in radians
pub const POLE_MARGIN: f64 = 0.01;

/// Largest vertical angle the camera can reach
pub const MAX_VERTICAL_ANGLE: f64 = FRAC_PI_2 - POLE_MARGIN;

/// Abstract input actions understood by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    PanLeft,
    PanRight,
    TiltUp,
    TiltDown,
    MoveForward,
    MoveBack,
    StrafeLeft,
    StrafeRight,
    Quit,
}

/// A press or release of one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEdge {
    pub action: InputAction,
    pub pressed: bool,
}

impl InputEdge {
    pub fn press(action: InputAction) -> Self {
        Self {
            action,
            pressed: true,
        }
    }

    pub fn release(action: InputAction) -> Self {
        Self {
            action,
            pressed: false,
        }
    }
}

/// Camera position, facing and current motion
///
/// `orientation` is derived from the two angles on every tick. Its (x, y)
/// pair is unit length; `z` is the slope `tan(vertical_angle)`, so the
/// vector as a whole is not normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub position: Point3<f64>,
    pub orientation: Vector3<f64>,
    pub horizontal_angle: f64,
    pub vertical_angle: f64,
    pub horizontal_speed: f64,
    pub vertical_speed: f64,
    /// Camera-local movement request: x is forward/back, y is strafe, z is 0
    pub translation_intent: Vector3<f64>,
}

impl CameraState {
    /// Place a camera at `position` facing along `facing`.
    ///
    /// Fails when `facing` points straight up or down, since the heading is
    /// then undefined, or when it is not finite.
    pub fn new(position: Point3<f64>, facing: Vector3<f64>) -> Result<Self, GeometryError> {
        let horizontal_length = facing.x.hypot(facing.y);
        let finite = horizontal_length.is_finite() && facing.z.is_finite();
        if !finite || horizontal_length < math::EPSILON {
            return Err(GeometryError::DegenerateHorizon);
        }

        let horizontal_angle = math::horizontal_angle(&Point3::origin(), &Point3::from(facing));
        let vertical_angle = (facing.z / horizontal_length)
            .atan()
            .clamp(-MAX_VERTICAL_ANGLE, MAX_VERTICAL_ANGLE);

        Ok(Self {
            position,
            orientation: orientation_from_angles(horizontal_angle, vertical_angle)?,
            horizontal_angle,
            vertical_angle,
            horizontal_speed: 0.0,
            vertical_speed: 0.0,
            translation_intent: Vector3::zeros(),
        })
    }
}

/// `(cos h, sin h, tan v)` with the horizontal pair normalized
fn orientation_from_angles(horizontal: f64, vertical: f64) -> Result<Vector3<f64>, GeometryError> {
    normalize_horizontal(&Vector3::new(
        horizontal.cos(),
        horizontal.sin(),
        vertical.tan(),
    ))
}

/// Owns the camera and advances it one tick at a time
#[derive(Debug, Clone)]
pub struct CameraController {
    state: CameraState,
    pan_speed: f64,
    move_speed: f64,
}

impl CameraController {
    pub fn new(state: CameraState, pan_speed: f64, move_speed: f64) -> Self {
        Self {
            state,
            pan_speed,
            move_speed,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Record a key edge. Only speeds and intent change here; geometry is
    /// left for `integrate`.
    pub fn apply_input_edge(&mut self, edge: InputEdge) {
        let state = &mut self.state;
        let held = |value: f64| if edge.pressed { value } else { 0.0 };

        match edge.action {
            InputAction::PanLeft => state.horizontal_speed = held(self.pan_speed),
            InputAction::PanRight => state.horizontal_speed = held(-self.pan_speed),
            InputAction::TiltUp => state.vertical_speed = held(self.pan_speed),
            InputAction::TiltDown => state.vertical_speed = held(-self.pan_speed),
            InputAction::MoveForward => state.translation_intent.x = held(1.0),
            InputAction::MoveBack => state.translation_intent.x = held(-1.0),
            InputAction::StrafeLeft => state.translation_intent.y = held(1.0),
            InputAction::StrafeRight => state.translation_intent.y = held(-1.0),
            InputAction::Quit => {}
        }
    }

    /// Advance rotation and position by one tick
    pub fn integrate(&mut self) {
        let state = &mut self.state;

        state.horizontal_angle += state.horizontal_speed;
        state.vertical_angle += state.vertical_speed;
        if state.vertical_angle.abs() > MAX_VERTICAL_ANGLE {
            state.vertical_angle = math::sign(state.vertical_angle) * MAX_VERTICAL_ANGLE;
        }

        // cos/sin never vanish together, so this only fails on NaN angles;
        // keep the previous facing in that case.
        match orientation_from_angles(state.horizontal_angle, state.vertical_angle) {
            Ok(orientation) => state.orientation = orientation,
            Err(e) => log::warn!("Keeping previous camera orientation: {}", e),
        }

        let intent = match normalize_horizontal(&state.translation_intent) {
            Ok(unit) => unit,
            Err(_) => return,
        };
        let dx = intent.x * self.move_speed;
        let dy = intent.y * self.move_speed;

        let facing = state.orientation;
        state.position.x += dx * facing.x - dy * facing.y;
        state.position.y += dx * facing.y + dy * facing.x;
    }
}
