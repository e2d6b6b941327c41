/// Per-tick frame pipeline
///
/// One tick drains the input edges, moves the camera, builds the view plane
/// and turns every scene object into draw commands. Commands are plain data
/// so a frame can be inspected, replayed or sent to any `RenderSink`.
use std::sync::Arc;

use crate::camera::{CameraController, CameraState, InputAction, InputEdge};
use crate::clip::{clip, ScreenPoint};
use crate::config::RenderConfig;
use crate::error::Pv3dResult;
use crate::plane::ViewPlane;
use crate::projection::{ProjectedPoint, Projector};
use crate::scene::{Rgb, SceneObject};

/// A single drawing instruction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear(Rgb),
    Circle {
        x: i32,
        y: i32,
        radius: u32,
        color: Rgb,
    },
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        color: Rgb,
    },
    Present,
}

/// Drawing backend the frame commands are replayed against
pub trait RenderSink {
    fn clear_frame(&mut self, color: Rgb);
    fn draw_filled_circle(&mut self, x: i32, y: i32, radius: u32, color: Rgb);
    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, color: Rgb);
    fn present_frame(&mut self);
}

impl DrawCommand {
    pub fn apply<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        match *self {
            DrawCommand::Clear(color) => sink.clear_frame(color),
            DrawCommand::Circle {
                x,
                y,
                radius,
                color,
            } => sink.draw_filled_circle(x, y, radius, color),
            DrawCommand::Line { from, to, color } => sink.draw_line(from, to, color),
            DrawCommand::Present => sink.present_frame(),
        }
    }
}

/// Replay a frame's commands in order
pub fn render<S: RenderSink + ?Sized>(commands: &[DrawCommand], sink: &mut S) {
    for command in commands {
        command.apply(sink);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Running,
    /// Terminal; no further frames are produced
    Stopped,
}

/// Drives the camera and produces one frame of draw commands per tick
pub struct FrameOrchestrator {
    config: RenderConfig,
    controller: CameraController,
    projector: Projector,
    scene: Arc<[SceneObject]>,
    state: FrameState,
    frames: u64,
}

impl FrameOrchestrator {
    pub fn new(config: RenderConfig, scene: Arc<[SceneObject]>) -> Pv3dResult<Self> {
        config.validate()?;

        let camera = CameraState::new(config.initial_position, config.initial_orientation)?;
        let controller = CameraController::new(camera, config.pan_speed, config.move_speed);

        log::debug!(
            "Frame orchestrator ready: {} objects, {}x{} at {} Hz",
            scene.len(),
            config.screen_width,
            config.screen_height,
            config.tick_rate
        );

        Ok(Self {
            projector: Projector::from_config(&config),
            config,
            controller,
            scene,
            state: FrameState::Running,
            frames: 0,
        })
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == FrameState::Running
    }

    pub fn camera(&self) -> &CameraState {
        self.controller.state()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Number of frames produced so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Change the screen size used from the next tick on
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }

        self.config.screen_width = width;
        self.config.screen_height = height;
        self.projector = Projector::from_config(&self.config);
    }

    /// Run one tick.
    ///
    /// A pressed `Quit` stops the orchestrator and abandons the tick, so the
    /// returned frame is empty. Once stopped, every tick returns nothing.
    pub fn tick<I>(&mut self, edges: I) -> Vec<DrawCommand>
    where
        I: IntoIterator<Item = InputEdge>,
    {
        if self.state == FrameState::Stopped {
            return Vec::new();
        }

        for edge in edges {
            if edge.action == InputAction::Quit && edge.pressed {
                log::info!("Quit requested after {} frames", self.frames);
                self.state = FrameState::Stopped;
                return Vec::new();
            }
            self.controller.apply_input_edge(edge);
        }

        self.controller.integrate();

        let mut commands = vec![DrawCommand::Clear(self.config.background)];
        match ViewPlane::build(self.controller.state()) {
            Ok(plane) => {
                for object in self.scene.iter() {
                    self.draw_object(&plane, object, &mut commands);
                }
            }
            Err(e) => log::warn!("Skipping frame {}: {}", self.frames, e),
        }
        commands.push(DrawCommand::Present);

        self.frames += 1;
        log::trace!("Frame {}: {} commands", self.frames, commands.len());
        commands
    }

    fn draw_object(&self, plane: &ViewPlane, object: &SceneObject, commands: &mut Vec<DrawCommand>) {
        let camera = &self.controller.state().position;

        let projected: Vec<Option<ProjectedPoint>> = object
            .points()
            .iter()
            .enumerate()
            .map(|(i, point)| match self.projector.project(camera, point, plane) {
                Ok(p) => Some(p),
                Err(e) => {
                    log::trace!("Dropping point {} at {:?}: {}", i, point, e);
                    None
                }
            })
            .collect();

        let color = object.color();
        for &(a, b) in object.edges() {
            let (Some(a), Some(b)) = (&projected[a], &projected[b]) else {
                continue;
            };
            if let Some((from, to)) = clip(a, b, self.projector.screen_width()) {
                commands.push(DrawCommand::Line { from, to, color });
            }
        }

        if object.draw_points() {
            for p in projected.iter().flatten().filter(|p| !p.behind) {
                commands.push(DrawCommand::Circle {
                    x: p.x,
                    y: p.y,
                    radius: self.config.point_radius,
                    color,
                });
            }
        }
    }
}
