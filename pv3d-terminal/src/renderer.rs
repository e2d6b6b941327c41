/// Character-cell canvas for terminal rendering
///
/// Each terminal cell holds two vertically stacked pixels drawn with half
/// block glyphs, which keeps pixels roughly square on common fonts.
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use pv3d_core::{RenderSink, Rgb, ScreenPoint};
use std::io::Write;

const UPPER: u8 = 0b01;
const LOWER: u8 = 0b10;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    halves: u8,
    color: Rgb,
}

impl Cell {
    const EMPTY: Cell = Cell {
        halves: 0,
        color: Rgb::BLACK,
    };

    fn glyph(&self) -> char {
        match self.halves {
            UPPER => '▀',
            LOWER => '▄',
            0 => ' ',
            _ => '█',
        }
    }
}

/// Render sink backed by a grid of terminal cells
pub struct CellCanvas {
    columns: usize,
    rows: usize,
    background: Rgb,
    back: Vec<Cell>,
    front: Vec<Cell>,
}

impl CellCanvas {
    pub fn new(columns: usize, rows: usize) -> Self {
        let size = columns * rows;
        Self {
            columns,
            rows,
            background: Rgb::BLACK,
            back: vec![Cell::EMPTY; size],
            front: vec![Cell::EMPTY; size],
        }
    }

    /// Canvas size in pixels; every cell is one pixel wide and two tall
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.columns as u32, self.rows as u32 * 2)
    }

    pub fn resize(&mut self, columns: usize, rows: usize) {
        *self = Self::new(columns, rows);
    }

    fn plot(&mut self, x: i32, y: i32, color: Rgb) {
        let (width, height) = self.pixel_size();
        if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
            return;
        }

        let cell = &mut self.back[(y as usize / 2) * self.columns + x as usize];
        cell.halves |= if y % 2 == 0 { UPPER } else { LOWER };
        cell.color = color;
    }

    /// Glyph at a cell of the last presented frame
    pub fn glyph_at(&self, column: usize, row: usize) -> char {
        self.front[row * self.columns + column].glyph()
    }

    /// Write the last presented frame to the terminal
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(to_color(self.background)))?;
        for row in 0..self.rows {
            writer.queue(MoveTo(0, row as u16))?;
            let mut current = None;
            for cell in &self.front[row * self.columns..(row + 1) * self.columns] {
                if cell.halves != 0 && current != Some(cell.color) {
                    writer.queue(SetForegroundColor(to_color(cell.color)))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.glyph()))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

impl RenderSink for CellCanvas {
    fn clear_frame(&mut self, color: Rgb) {
        self.background = color;
        self.back.fill(Cell::EMPTY);
    }

    fn draw_filled_circle(&mut self, x: i32, y: i32, radius: u32, color: Rgb) {
        // Only the part of the disc that overlaps the canvas is scanned
        let (width, height) = self.pixel_size();
        let (x, y, r) = (x as i64, y as i64, radius as i64);
        let columns = (x - r).max(0)..=(x + r).min(width as i64 - 1);
        let rows = (y - r).max(0)..=(y + r).min(height as i64 - 1);

        for py in rows {
            for px in columns.clone() {
                let (dx, dy) = ((px - x) as i128, (py - y) as i128);
                if dx * dx + dy * dy <= (r as i128) * (r as i128) {
                    self.plot(px as i32, py as i32, color);
                }
            }
        }
    }

    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, color: Rgb) {
        let (width, height) = self.pixel_size();
        let bounds = (width as f64 - 1.0, height as f64 - 1.0);
        let Some((from, to)) = clip_to_rect(from, to, bounds) else {
            return;
        };

        // Bresenham over the visible part only
        let (mut x, mut y) = (from.x.round() as i32, from.y.round() as i32);
        let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn present_frame(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }
}

/// Liang-Barsky clip of a segment to `[0, max.0] x [0, max.1]`
fn clip_to_rect(
    from: ScreenPoint,
    to: ScreenPoint,
    max: (f64, f64),
) -> Option<(ScreenPoint, ScreenPoint)> {
    let delta = to - from;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    let edges = [
        (-delta.x, from.x),
        (delta.x, max.0 - from.x),
        (-delta.y, from.y),
        (delta.y, max.1 - from.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((from + delta * t0, from + delta * t1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn canvas() -> CellCanvas {
        let mut canvas = CellCanvas::new(10, 5);
        canvas.clear_frame(Rgb::BLACK);
        canvas
    }

    #[test]
    fn test_pixel_size() {
        assert_eq!(CellCanvas::new(80, 24).pixel_size(), (80, 48));
    }

    #[test]
    fn test_nothing_visible_until_present() {
        let mut canvas = canvas();
        canvas.draw_filled_circle(3, 3, 0, Rgb::RED);
        assert_eq!(canvas.glyph_at(3, 1), ' ');

        canvas.present_frame();
        assert_eq!(canvas.glyph_at(3, 1), '▄');
    }

    #[test]
    fn test_horizontal_line_fills_upper_halves() {
        let mut canvas = canvas();
        canvas.draw_line(Point2::new(-50.0, 4.0), Point2::new(50.0, 4.0), Rgb::WHITE);
        canvas.present_frame();

        for column in 0..10 {
            assert_eq!(canvas.glyph_at(column, 2), '▀');
        }
        assert_eq!(canvas.glyph_at(0, 1), ' ');
    }

    #[test]
    fn test_vertical_line_fills_whole_cells() {
        let mut canvas = canvas();
        canvas.draw_line(Point2::new(2.0, 0.0), Point2::new(2.0, 9.0), Rgb::WHITE);
        canvas.present_frame();

        for row in 0..5 {
            assert_eq!(canvas.glyph_at(2, row), '█');
        }
    }

    #[test]
    fn test_offscreen_line_draws_nothing() {
        let mut canvas = canvas();
        canvas.draw_line(
            Point2::new(-30000.0, -5.0),
            Point2::new(30000.0, -5.0),
            Rgb::WHITE,
        );
        canvas.present_frame();

        for row in 0..5 {
            for column in 0..10 {
                assert_eq!(canvas.glyph_at(column, row), ' ');
            }
        }
    }

    #[test]
    fn test_huge_circle_covers_canvas() {
        let mut canvas = canvas();
        canvas.draw_filled_circle(5, 5, u32::MAX, Rgb::RED);
        // Entirely left of the canvas
        canvas.draw_filled_circle(i32::MIN, 5, u32::MAX / 4, Rgb::RED);
        canvas.present_frame();

        for row in 0..5 {
            for column in 0..10 {
                assert_eq!(canvas.glyph_at(column, row), '█');
            }
        }
    }

    #[test]
    fn test_circle_radius() {
        let mut canvas = canvas();
        canvas.draw_filled_circle(4, 4, 1, Rgb::RED);
        canvas.present_frame();

        // Rows 3..=5 in column 4, only row 4 in columns 3 and 5
        assert_eq!(canvas.glyph_at(4, 1), '▄');
        assert_eq!(canvas.glyph_at(4, 2), '█');
        assert_eq!(canvas.glyph_at(3, 2), '▀');
        assert_eq!(canvas.glyph_at(6, 2), ' ');
    }

    #[test]
    fn test_clear_wipes_back_buffer() {
        let mut canvas = canvas();
        canvas.draw_filled_circle(5, 5, 2, Rgb::GREEN);
        canvas.clear_frame(Rgb::BLACK);
        canvas.present_frame();
        assert_eq!(canvas.glyph_at(5, 2), ' ');
    }

    #[test]
    fn test_clip_to_rect() {
        let (from, to) = clip_to_rect(
            Point2::new(-10.0, 5.0),
            Point2::new(30.0, 5.0),
            (19.0, 9.0),
        )
        .unwrap();
        assert!((from - Point2::new(0.0, 5.0)).norm() < 1e-9);
        assert!((to - Point2::new(19.0, 5.0)).norm() < 1e-9);

        assert!(clip_to_rect(Point2::new(-5.0, -5.0), Point2::new(-1.0, 20.0), (19.0, 9.0)).is_none());
    }

    #[test]
    fn test_draw_writes_every_row() {
        let mut canvas = canvas();
        canvas.draw_filled_circle(1, 1, 0, Rgb::CYAN);
        canvas.present_frame();

        let mut out = Vec::new();
        canvas.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('▄'));
        assert_eq!(text.matches('▄').count(), 1);
    }
}
