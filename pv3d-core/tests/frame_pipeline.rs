use nalgebra::{Point2, Point3, Vector3};
use pv3d_core::{
    scene, DrawCommand, FrameOrchestrator, InputAction, InputEdge, RenderConfig, Rgb, SceneObject,
};
use std::sync::Arc;

const IDLE: [InputEdge; 0] = [];

fn lines(commands: &[DrawCommand]) -> Vec<(Point2<f64>, Point2<f64>)> {
    commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

fn circles(commands: &[DrawCommand]) -> Vec<(i32, i32)> {
    commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Circle { x, y, .. } => Some((*x, *y)),
            _ => None,
        })
        .collect()
}

fn near(actual: (f64, f64), expected: (f64, f64)) -> bool {
    (actual.0 - expected.0).abs() <= 1.0 && (actual.1 - expected.1).abs() <= 1.0
}

#[test]
fn test_single_edge_frame_matches_fixture() {
    let object = SceneObject::new(
        vec![Point3::new(5.0, 5.0, 0.0), Point3::new(6.0, 5.0, 0.0)],
        vec![(0, 1)],
        Rgb::GREEN,
        true,
    )
    .unwrap();
    let mut frames = FrameOrchestrator::new(RenderConfig::default(), Arc::from(vec![object])).unwrap();

    let commands = frames.tick(IDLE);

    // Camera at (0, 0, 1) facing (1, 1, 0) with a 90° view on 1280x720:
    // (5, 5, 0) sits on the vertical through the center, √2/10 below it;
    // (6, 5, 0) is 1/11 right and √2/11 below.
    let first = (640.0, 360.0 + 640.0 * 2f64.sqrt() / 10.0);
    let second = (640.0 + 640.0 / 11.0, 360.0 + 640.0 * 2f64.sqrt() / 11.0);

    let lines = lines(&commands);
    assert_eq!(lines.len(), 1);
    let (from, to) = lines[0];
    assert!(near((from.x, from.y), first), "from = {}", from);
    assert!(near((to.x, to.y), second), "to = {}", to);

    let circles = circles(&commands);
    assert_eq!(circles.len(), 2);
    assert!(near((circles[0].0 as f64, circles[0].1 as f64), first));
    assert!(near((circles[1].0 as f64, circles[1].1 as f64), second));
}

#[test]
fn test_frames_are_deterministic() {
    let scene: Arc<[SceneObject]> = Arc::from(scene::demo_objects().unwrap());
    let mut a = FrameOrchestrator::new(RenderConfig::default(), scene.clone()).unwrap();
    let mut b = FrameOrchestrator::new(RenderConfig::default(), scene).unwrap();

    let input = [
        InputEdge::press(InputAction::PanRight),
        InputEdge::press(InputAction::MoveForward),
    ];
    assert_eq!(a.tick(input), b.tick(input));
    for _ in 0..30 {
        assert_eq!(a.tick(IDLE), b.tick(IDLE));
    }
    assert_eq!(a.camera(), b.camera());
}

#[test]
fn test_turning_around_hides_points() {
    let scene: Arc<[SceneObject]> = Arc::from(scene::demo_objects().unwrap());
    let config = RenderConfig {
        pan_speed: std::f64::consts::PI / 10.0,
        ..RenderConfig::default()
    };
    let mut frames = FrameOrchestrator::new(config, scene).unwrap();

    let facing = frames.tick(IDLE);
    assert_eq!(circles(&facing).len(), 18);

    frames.tick([InputEdge::press(InputAction::PanLeft)]);
    for _ in 0..9 {
        frames.tick(IDLE);
    }
    let away = frames.tick([InputEdge::release(InputAction::PanLeft)]);

    // Ten steps of π/10 face the camera the opposite way
    let o = frames.camera().orientation;
    assert!((o - Vector3::new(-1.0, -1.0, 0.0).normalize()).norm() < 1e-9);
    assert!(circles(&away).is_empty());
    assert!(lines(&away).is_empty());
}

#[test]
fn test_walking_through_the_grid_keeps_drawing() {
    let grid = scene::ground_grid(20, 1.0, Rgb::WHITE);
    let edge_count = grid.edges().len();
    let mut frames = FrameOrchestrator::new(RenderConfig::default(), Arc::from(vec![grid])).unwrap();

    frames.tick([
        InputEdge::press(InputAction::MoveForward),
        InputEdge::press(InputAction::TiltDown),
    ]);
    for _ in 0..60 {
        let commands = frames.tick(IDLE);
        let drawn = lines(&commands);
        assert!(!drawn.is_empty());
        assert!(drawn.len() <= edge_count);
        assert!(circles(&commands).is_empty());
        for (from, to) in drawn {
            assert!(from.x.is_finite() && from.y.is_finite());
            assert!(to.x.is_finite() && to.y.is_finite());
        }
    }

    let position = frames.camera().position;
    assert!((position.x - position.y).abs() < 1e-9);
    assert!((position.x - 61.0 * 0.1 / 2f64.sqrt()).abs() < 1e-9);
    assert_eq!(position.z, 1.0);
}

#[test]
fn test_stl_scene_renders() {
    let ascii = "solid quad
facet normal 0 0 1
 outer loop
  vertex 4 0 0
  vertex 4 1 0
  vertex 4 0 1
 endloop
endfacet
endsolid quad";
    let object = pv3d_core::stl::load_stl_object(ascii.as_bytes(), Rgb::CYAN).unwrap();
    let config = RenderConfig {
        initial_orientation: Vector3::new(1.0, 0.0, 0.0),
        ..RenderConfig::default()
    };
    let mut frames = FrameOrchestrator::new(config, Arc::from(vec![object])).unwrap();

    let commands = frames.tick(IDLE);
    assert_eq!(lines(&commands).len(), 3);
    assert!(commands
        .iter()
        .all(|c| !matches!(c, DrawCommand::Line { color, .. } if *color != Rgb::CYAN)));
}
