/// Terminal frontend for the PV3D wireframe renderer
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use pv3d_core::{render, FrameOrchestrator, InputEdge, RenderConfig, SceneObject};
use std::io::{self, stdout, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub mod input;
pub mod renderer;

pub use input::KeyTracker;
pub use renderer::CellCanvas;

/// Convert a core error into an I/O error for the terminal loop
pub fn to_io_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    frames: FrameOrchestrator,
    canvas: CellCanvas,
    hold_ticks: u32,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Set up a renderer sized to the current terminal. The screen size in
    /// `config` is replaced by the terminal's.
    pub fn new(config: RenderConfig, scene: Arc<[SceneObject]>, hold_ticks: u32) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        let canvas = CellCanvas::new(columns as usize, rows as usize);
        let (width, height) = canvas.pixel_size();

        let config = RenderConfig {
            screen_width: width,
            screen_height: height,
            ..config
        };
        let frames = FrameOrchestrator::new(config, scene).map_err(to_io_error)?;

        Ok(Self {
            frames,
            canvas,
            hold_ticks,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let reports_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if reports_release {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        log::info!("Key release events reported: {}", reports_release);

        let result = self.main_loop(KeyTracker::new(reports_release, self.hold_ticks));

        // Cleanup
        if reports_release {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
        }
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self, mut keys: KeyTracker) -> io::Result<()> {
        let target_frame_time = self.frames.config().tick_duration();

        while self.frames.is_running() {
            let frame_start = Instant::now();

            let mut edges = self.poll_input(&mut keys)?;
            edges.extend(keys.end_tick());

            let commands = self.frames.tick(edges);
            if !self.frames.is_running() {
                break;
            }
            render(&commands, &mut self.canvas);
            self.draw()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Drain every pending terminal event without blocking
    fn poll_input(&mut self, keys: &mut KeyTracker) -> io::Result<Vec<InputEdge>> {
        let mut edges = Vec::new();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) => edges.extend(keys.key_event(&key)),
                Event::Resize(columns, rows) => self.resize(columns, rows),
                _ => {}
            }
        }
        Ok(edges)
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        self.canvas.resize(columns as usize, rows as usize);
        let (width, height) = self.canvas.pixel_size();
        log::debug!("Terminal resized to {}x{} cells", columns, rows);
        self.frames.resize(width, height);
    }

    fn draw(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        self.canvas.draw(&mut stdout)?;

        // Draw UI overlay
        let camera = self.frames.camera();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "PV3D | FPS: {:.1} | pos ({:.1}, {:.1}) | Arrows=Look WASD=Move Q=Quit",
                self.fps, camera.position.x, camera.position.y
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
