/// Wireframe scene objects
use nalgebra::Point3;

use crate::error::SceneError;

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Points joined by straight edges, drawn in one color
///
/// Edges are validated on construction, so every index is in range for the
/// lifetime of the object.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    points: Vec<Point3<f64>>,
    edges: Vec<(usize, usize)>,
    color: Rgb,
    draw_points: bool,
}

impl SceneObject {
    pub fn new(
        points: Vec<Point3<f64>>,
        edges: Vec<(usize, usize)>,
        color: Rgb,
        draw_points: bool,
    ) -> Result<Self, SceneError> {
        for (edge, &(a, b)) in edges.iter().enumerate() {
            for index in [a, b] {
                if index >= points.len() {
                    return Err(SceneError::InvalidEdgeReference {
                        edge,
                        index,
                        point_count: points.len(),
                    });
                }
            }
        }

        Ok(Self {
            points,
            edges,
            color,
            draw_points,
        })
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn draw_points(&self) -> bool {
        self.draw_points
    }
}

/// Build an object from literal coordinates
fn object(
    points: &[(f64, f64, f64)],
    edges: &[(usize, usize)],
    color: Rgb,
) -> Result<SceneObject, SceneError> {
    let points = points
        .iter()
        .map(|&(x, y, z)| Point3::new(x, y, z))
        .collect();
    SceneObject::new(points, edges.to_vec(), color, true)
}

/// The stock scene: a pyramid, a box and a wedge near (5, 5, 0)
pub fn demo_objects() -> Result<Vec<SceneObject>, SceneError> {
    let pyramid = object(
        &[(5.0, 5.0, 0.0), (5.0, 6.0, 0.0), (6.0, 5.0, 0.0), (5.0, 5.0, 2.0)],
        &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
        Rgb::GREEN,
    )?;

    let cuboid = object(
        &[
            (4.0, 6.0, 0.0),
            (4.0, 5.0, 0.0),
            (3.0, 6.0, 0.0),
            (3.0, 5.0, 0.0),
            (4.0, 6.0, 0.75),
            (4.0, 5.0, 0.75),
            (3.0, 6.0, 0.75),
            (3.0, 5.0, 0.75),
        ],
        &[
            (0, 1),
            (0, 2),
            (3, 1),
            (3, 2),
            (4, 5),
            (4, 6),
            (7, 5),
            (7, 6),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ],
        Rgb::RED,
    )?;

    let wedge = object(
        &[
            (6.0, 4.0, 0.0),
            (5.0, 4.0, 0.0),
            (6.0, 3.0, 0.0),
            (5.0, 3.0, 0.0),
            (6.0, 4.0, 1.25),
            (6.0, 3.0, 1.25),
        ],
        &[
            (0, 1),
            (0, 2),
            (3, 1),
            (3, 2),
            (4, 5),
            (0, 4),
            (2, 5),
            (1, 4),
            (3, 5),
        ],
        Rgb::CYAN,
    )?;

    Ok(vec![pyramid, cuboid, wedge])
}

/// A square lattice of lines on the z = 0 plane.
///
/// Lines run parallel to both axes at multiples of `spacing`, out to
/// `line_count / 2` lines on each side of the origin, and each spans the
/// full extent of the lattice. Vertices are not drawn.
pub fn ground_grid(line_count: usize, spacing: f64, color: Rgb) -> SceneObject {
    let half = line_count / 2;
    let extent = half as f64 * spacing;

    let mut points = Vec::new();
    let mut edges = Vec::new();
    let mut add_line = |from: Point3<f64>, to: Point3<f64>| {
        edges.push((points.len(), points.len() + 1));
        points.push(from);
        points.push(to);
    };

    for i in 0..half {
        let offset = i as f64 * spacing;
        // The axis lines at offset zero are only laid once
        let mirrored = (i > 0).then_some(-offset);
        for o in std::iter::once(offset).chain(mirrored) {
            add_line(Point3::new(extent, o, 0.0), Point3::new(-extent, o, 0.0));
            add_line(Point3::new(o, extent, 0.0), Point3::new(o, -extent, 0.0));
        }
    }

    log::debug!(
        "Ground grid: {} points, {} edges, extent {}",
        points.len(),
        edges.len(),
        extent
    );

    SceneObject {
        points,
        edges,
        color,
        draw_points: false,
    }
}
