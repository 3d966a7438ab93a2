/// Character-cell canvas that the pipeline draws into
use crossterm::{
    cursor::MoveTo,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use spinmesh_core::{Color, RenderHost, ScreenTriangle, Viewport};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Edges stay visible even on unlit faces
const MIN_EDGE_BRIGHTNESS: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

/// A grid of terminal cells, one cell per pixel.
///
/// Triangles are painted in the order they arrive; later ones overwrite
/// earlier ones.
pub struct AsciiCanvas {
    width: usize,
    height: usize,
    background: Color,
    cells: Vec<Cell>,
}

impl AsciiCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        let background = Color::BLACK;
        Self {
            width,
            height,
            background,
            cells: vec![blank(background); width * height],
        }
    }

    /// Resize the grid, discarding its contents
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![blank(self.background); width * height];
    }

    pub fn glyph_at(&self, x: usize, y: usize) -> Option<char> {
        self.cell(x, y).map(|c| c.glyph)
    }

    pub fn color_at(&self, x: usize, y: usize) -> Option<Color> {
        self.cell(x, y).map(|c| c.color)
    }

    fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    fn plot(&mut self, x: i64, y: i64, glyph: char, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.cells[idx] = Cell { glyph, color };
    }

    /// Draw an edge cell by cell, clipped to the grid first
    fn line(&mut self, a: Point2<f32>, b: Point2<f32>, color: Color) {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        let Some((a, b)) = clip_segment(a, b, self.width as f32, self.height as f32) else {
            return;
        };

        let glyph = edge_glyph(dx, dy);
        let (x1, y1) = (b.x.floor() as i64, b.y.floor() as i64);
        let (mut x, mut y) = (a.x.floor() as i64, a.y.floor() as i64);

        // Bresenham over integer cells
        let step_x = if x < x1 { 1 } else { -1 };
        let step_y = if y < y1 { 1 } else { -1 };
        let span_x = (x1 - x).abs();
        let span_y = -(y1 - y).abs();
        let mut err = span_x + span_y;

        loop {
            self.plot(x, y, glyph, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= span_y {
                err += span_y;
                x += step_x;
            }
            if e2 <= span_x {
                err += span_x;
                y += step_y;
            }
        }
    }

    /// Write the whole grid to `writer` starting at the top-left corner
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(term_color(self.background)))?;

        let mut current = None;
        for y in 0..self.height {
            writer.queue(MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(term_color(cell.color)))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.glyph))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderHost for AsciiCanvas {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.width as u32, self.height as u32)
    }

    fn clear(&mut self, color: Color) {
        self.background = color;
        self.cells.fill(blank(color));
    }

    fn fill_triangle(&mut self, triangle: &ScreenTriangle) {
        if !is_finite(triangle) {
            return;
        }
        let [v0, v1, v2] = triangle.points;

        // Bounding box, clipped to the grid
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as i64;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min(self.width as f32 - 1.0) as i64;
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as i64;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min(self.height as f32 - 1.0) as i64;

        let glyph = shade_glyph(triangle.color);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.plot(x, y, glyph, triangle.color);
                    }
                }
            }
        }
    }

    fn stroke_triangle(&mut self, triangle: &ScreenTriangle) {
        if !is_finite(triangle) {
            return;
        }
        let c = triangle.color;
        let color = Color::new(
            c.r.max(MIN_EDGE_BRIGHTNESS),
            c.g.max(MIN_EDGE_BRIGHTNESS),
            c.b.max(MIN_EDGE_BRIGHTNESS),
        );
        let [a, b, d] = triangle.points;
        self.line(a, b, color);
        self.line(b, d, color);
        self.line(d, a, color);
    }
}

fn is_finite(triangle: &ScreenTriangle) -> bool {
    triangle
        .points
        .iter()
        .all(|p| p.x.is_finite() && p.y.is_finite())
}

/// Liang-Barsky clip of `a -> b` against `[0, width] x [0, height]`.
/// Unclipped endpoints are returned unchanged.
fn clip_segment(
    a: Point2<f32>,
    b: Point2<f32>,
    width: f32,
    height: f32,
) -> Option<(Point2<f32>, Point2<f32>)> {
    let d = b - a;
    let (mut t0, mut t1) = (0.0f32, 1.0f32);

    for (p, q) in [(-d.x, a.x), (d.x, width - a.x), (-d.y, a.y), (d.y, height - a.y)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let start = if t0 > 0.0 { a + d * t0 } else { a };
    let end = if t1 < 1.0 { a + d * t1 } else { b };
    Some((start, end))
}

fn blank(color: Color) -> Cell {
    Cell { glyph: ' ', color }
}

fn term_color(color: Color) -> TermColor {
    let (r, g, b) = color.to_rgb8();
    TermColor::Rgb { r, g, b }
}

/// Pick a ramp character for a shade
fn shade_glyph(color: Color) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (color.luminance().clamp(0.0, 1.0) * last as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(last)]
}

/// Pick a line character by slope. Terminal rows grow downward.
fn edge_glyph(dx: f32, dy: f32) -> char {
    if dx.abs() > 2.0 * dy.abs() {
        '-'
    } else if dy.abs() > 2.0 * dx.abs() {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    p: Point2<f32>,
) -> Option<(f32, f32, f32)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(points: [(f32, f32); 3], color: Color) -> ScreenTriangle {
        ScreenTriangle {
            points: points.map(|(x, y)| Point2::new(x, y)),
            color,
        }
    }

    #[test]
    fn test_viewport_matches_grid() {
        let canvas = AsciiCanvas::new(80, 24);
        assert_eq!(canvas.viewport(), Viewport::new(80, 24));
    }

    #[test]
    fn test_fill_covers_interior_in_either_winding() {
        let mut canvas = AsciiCanvas::new(20, 20);
        canvas.fill_triangle(&screen([(0.0, 0.0), (20.0, 0.0), (0.0, 20.0)], Color::WHITE));
        assert_eq!(canvas.glyph_at(2, 2), Some('@'));
        assert_eq!(canvas.glyph_at(18, 18), Some(' '));

        canvas.clear(Color::BLACK);
        canvas.fill_triangle(&screen([(0.0, 0.0), (0.0, 20.0), (20.0, 0.0)], Color::grey(0.6)));
        assert_eq!(canvas.glyph_at(2, 2), Some('+'));
    }

    #[test]
    fn test_later_triangles_overwrite() {
        let mut canvas = AsciiCanvas::new(10, 10);
        let big = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)];
        canvas.fill_triangle(&screen(big, Color::WHITE));
        canvas.fill_triangle(&screen(big, Color::grey(0.2)));
        assert_eq!(canvas.color_at(1, 1), Some(Color::grey(0.2)));
    }

    #[test]
    fn test_offscreen_and_non_finite_are_ignored() {
        let mut canvas = AsciiCanvas::new(10, 10);
        canvas.fill_triangle(&screen([(-50.0, -50.0), (-40.0, -50.0), (-50.0, -40.0)], Color::WHITE));
        canvas.fill_triangle(&screen([(f32::NAN, 0.0), (5.0, 5.0), (0.0, 5.0)], Color::WHITE));
        canvas.stroke_triangle(&screen([(f32::INFINITY, 0.0), (5.0, 5.0), (0.0, 5.0)], Color::WHITE));
        assert!((0..10).all(|y| (0..10).all(|x| canvas.glyph_at(x, y) == Some(' '))));
    }

    #[test]
    fn test_stroke_draws_edges() {
        let mut canvas = AsciiCanvas::new(20, 20);
        canvas.stroke_triangle(&screen([(2.0, 2.0), (15.0, 2.0), (2.0, 15.0)], Color::BLACK));
        assert_eq!(canvas.glyph_at(8, 2), Some('-'));
        assert_eq!(canvas.glyph_at(2, 8), Some('|'));
        // Interior untouched
        assert_eq!(canvas.glyph_at(5, 5), Some(' '));
        assert_eq!(canvas.color_at(8, 2), Some(Color::grey(MIN_EDGE_BRIGHTNESS)));
    }

    #[test]
    fn test_edges_have_no_missing_cells() {
        let edge = Color::WHITE;

        let mut canvas = AsciiCanvas::new(20, 20);
        canvas.line(Point2::new(2.0, 15.0), Point2::new(2.0, 2.0), edge);
        let missing: Vec<usize> = (2..=15).filter(|&y| canvas.glyph_at(2, y) != Some('|')).collect();
        assert!(missing.is_empty(), "vertical edge missing rows {missing:?}");

        let mut canvas = AsciiCanvas::new(20, 20);
        canvas.line(Point2::new(2.0, 2.0), Point2::new(15.0, 2.0), edge);
        let missing: Vec<usize> = (2..=15).filter(|&x| canvas.glyph_at(x, 2) != Some('-')).collect();
        assert!(missing.is_empty(), "horizontal edge missing columns {missing:?}");

        let mut canvas = AsciiCanvas::new(20, 20);
        canvas.line(Point2::new(15.0, 2.0), Point2::new(2.0, 15.0), edge);
        let missing: Vec<usize> = (2..=15)
            .filter(|&x| canvas.glyph_at(x, 17 - x) != Some('/'))
            .collect();
        assert!(missing.is_empty(), "diagonal edge missing columns {missing:?}");
    }

    #[test]
    fn test_edges_are_clipped_to_grid() {
        let mut canvas = AsciiCanvas::new(10, 10);
        canvas.line(Point2::new(-1.0e4, 4.0), Point2::new(1.0e4, 4.0), Color::WHITE);
        assert!((0..10).all(|x| canvas.glyph_at(x, 4) == Some('-')));
        assert!((0..10).all(|x| canvas.glyph_at(x, 3) == Some(' ')));

        canvas.line(Point2::new(-5.0, -5.0), Point2::new(-1.0, 20.0), Color::WHITE);
        assert!((0..10).all(|y| canvas.glyph_at(0, y) != Some('|')));
    }

    #[test]
    fn test_clear_resets_cells() {
        let mut canvas = AsciiCanvas::new(4, 4);
        canvas.fill_triangle(&screen([(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)], Color::WHITE));
        canvas.clear(Color::grey(0.1));
        assert_eq!(canvas.glyph_at(0, 0), Some(' '));
        assert_eq!(canvas.color_at(0, 0), Some(Color::grey(0.1)));
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let mut canvas = AsciiCanvas::new(3, 2);
        canvas.fill_triangle(&screen([(0.0, 0.0), (3.0, 0.0), (0.0, 3.0)], Color::WHITE));
        let mut out = Vec::new();
        canvas.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('@'));
    }

    #[test]
    fn test_edge_glyphs() {
        assert_eq!(edge_glyph(10.0, 1.0), '-');
        assert_eq!(edge_glyph(0.0, -5.0), '|');
        assert_eq!(edge_glyph(3.0, 3.0), '\\');
        assert_eq!(edge_glyph(-3.0, 3.0), '/');
    }
}
