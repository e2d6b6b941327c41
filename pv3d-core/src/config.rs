/// Renderer configuration
use nalgebra::{Point3, Vector3};
use std::time::Duration;

use crate::error::ConfigError;
use crate::scene::Rgb;

/// Everything the core needs to know about the screen, camera and timing
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Screen size in pixels
    pub screen_width: u32,
    pub screen_height: u32,
    /// Ticks per second
    pub tick_rate: u32,
    /// Horizontal field of view in degrees
    pub field_of_view: f64,
    /// Radians per tick while a pan/tilt key is held
    pub pan_speed: f64,
    /// Units per tick while a move key is held
    pub move_speed: f64,
    pub initial_position: Point3<f64>,
    pub initial_orientation: Vector3<f64>,
    /// Largest pixel offset from the screen center a point may project to
    pub overflow_clamp: f64,
    /// Radius of vertex dots in pixels
    pub point_radius: u32,
    pub background: Rgb,
}

impl RenderConfig {
    pub fn fov_radians(&self) -> f64 {
        self.field_of_view.to_radians()
    }

    /// Duration of one tick at the configured rate
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError(format!(
                "screen size must be non-zero, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError("tick rate must be at least 1 Hz".to_string()));
        }
        if !(self.field_of_view > 0.0 && self.field_of_view < 180.0) {
            return Err(ConfigError(format!(
                "field of view must be between 0 and 180 degrees, got {}",
                self.field_of_view
            )));
        }
        if !(self.pan_speed >= 0.0 && self.move_speed >= 0.0) {
            return Err(ConfigError(format!(
                "speeds must not be negative, got pan {} and move {}",
                self.pan_speed, self.move_speed
            )));
        }
        if !(self.overflow_clamp > 0.0) {
            return Err(ConfigError(format!(
                "overflow clamp must be positive, got {}",
                self.overflow_clamp
            )));
        }
        let position = &self.initial_position.coords;
        let orientation = &self.initial_orientation;
        if !position.iter().chain(orientation.iter()).all(|v| v.is_finite()) {
            return Err(ConfigError(format!(
                "camera position and orientation must be finite, got {} and {}",
                position.transpose(),
                orientation.transpose()
            )));
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            screen_width: 1280,
            screen_height: 720,
            tick_rate: 60,
            field_of_view: 90.0,
            pan_speed: 0.02,
            move_speed: 0.1,
            initial_position: Point3::new(0.0, 0.0, 1.0),
            initial_orientation: Vector3::new(1.0, 1.0, 0.0),
            overflow_clamp: 30000.0,
            point_radius: 4,
            background: Rgb::BLACK,
        }
    }
}
