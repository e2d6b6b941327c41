/// PV3D Core Library - wireframe projection through a per-frame view plane
///
/// This library holds the deterministic part of the renderer: the camera
/// motion model, the view plane, point projection, segment clipping and the
/// frame pipeline that turns a scene into draw commands.

pub mod camera;
pub mod clip;
pub mod config;
pub mod error;
pub mod frame;
pub mod math;
pub mod plane;
pub mod projection;
pub mod scene;
pub mod stl;

// Re-export commonly used types
pub use camera::{CameraController, CameraState, InputAction, InputEdge};
pub use clip::{clip, ScreenPoint};
pub use config::RenderConfig;
pub use error::{ConfigError, GeometryError, Pv3dError, Pv3dResult, SceneError};
pub use frame::{render, DrawCommand, FrameOrchestrator, FrameState, RenderSink};
pub use plane::ViewPlane;
pub use projection::{ProjectedPoint, Projector};
pub use scene::{Rgb, SceneObject};
