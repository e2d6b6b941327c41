/// PV3D Terminal Demo - walk around a wireframe scene
///
/// Controls:
///   - Arrow Keys: Look around
///   - WASD: Move and strafe
///   - Q/ESC: Quit
///
/// Logs go to stderr; redirect it (`2>pv3d.log`) when raising `RUST_LOG`.
use clap::Parser;
use nalgebra::{Point3, Vector3};
use pv3d_core::{scene, stl, RenderConfig, Rgb, SceneObject};
use pv3d_terminal::{to_io_error, TerminalApp};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(version, about = "Wireframe scene explorer for the terminal")]
struct Args {
    /// Render an STL model instead of the demo objects
    #[arg(long)]
    stl: Option<PathBuf>,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 90.0)]
    fov: f64,

    /// Ticks per second
    #[arg(long, default_value_t = 60)]
    tick_rate: u32,

    /// Camera turn rate in radians per tick
    #[arg(long, default_value_t = 0.02)]
    pan_speed: f64,

    /// Camera movement in units per tick
    #[arg(long, default_value_t = 0.1)]
    move_speed: f64,

    /// Initial camera position: X Y Z
    #[arg(
        long,
        num_args = 3,
        value_names = ["X", "Y", "Z"],
        allow_hyphen_values = true,
        default_values_t = [0.0, 0.0, 1.0]
    )]
    position: Vec<f64>,

    /// Initial viewing direction: X Y Z
    #[arg(
        long,
        num_args = 3,
        value_names = ["X", "Y", "Z"],
        allow_hyphen_values = true,
        default_values_t = [1.0, 1.0, 0.0]
    )]
    facing: Vec<f64>,

    /// Number of ground grid lines along each axis (0 disables the grid)
    #[arg(long, default_value_t = 50)]
    grid_lines: usize,

    /// Distance between ground grid lines
    #[arg(long, default_value_t = 1.0)]
    grid_spacing: f64,

    /// Radius of vertex dots in half-cell pixels
    #[arg(long, default_value_t = 0)]
    point_radius: u32,

    /// Largest pixel offset a projected point may have from the center
    #[arg(long, default_value_t = 30000.0)]
    overflow_clamp: f64,

    /// Ticks a key stays held without a repeat, for terminals that do not
    /// report key releases
    #[arg(long, default_value_t = 40)]
    hold_ticks: u32,
}

impl Args {
    fn config(&self) -> RenderConfig {
        RenderConfig {
            tick_rate: self.tick_rate,
            field_of_view: self.fov,
            pan_speed: self.pan_speed,
            move_speed: self.move_speed,
            initial_position: Point3::new(self.position[0], self.position[1], self.position[2]),
            initial_orientation: Vector3::new(self.facing[0], self.facing[1], self.facing[2]),
            overflow_clamp: self.overflow_clamp,
            point_radius: self.point_radius,
            ..RenderConfig::default()
        }
    }

    fn scene(&self) -> io::Result<Vec<SceneObject>> {
        let mut objects = match &self.stl {
            Some(path) => {
                log::info!("Loading STL file: {}", path.display());
                let data = fs::read(path).map_err(|e| {
                    io::Error::new(
                        e.kind(),
                        format!("Failed to read {}: {}", path.display(), e),
                    )
                })?;
                vec![stl::load_stl_object(&data, Rgb::CYAN).map_err(to_io_error)?]
            }
            None => scene::demo_objects().map_err(to_io_error)?,
        };

        if self.grid_lines > 0 {
            objects.push(scene::ground_grid(self.grid_lines, self.grid_spacing, Rgb::WHITE));
        }
        Ok(objects)
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = args.config();
    config.validate().map_err(to_io_error)?;
    let objects = args.scene()?;
    log::info!(
        "Starting with {} objects, {} edges total",
        objects.len(),
        objects.iter().map(|o| o.edges().len()).sum::<usize>()
    );

    let mut app = TerminalApp::new(config, Arc::from(objects), args.hold_ticks)?;
    app.run()?;

    println!("Thank you for using PV3D!");
    Ok(())
}
