/// ASCII rasterizer for terminal rendering
use std::collections::HashMap;
use std::io::Write;

use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use laddertruck_core::{Color, DrawMode, Mesh, PrimitiveKind, Renderer, Triangle, Viewport};
use nalgebra::{Matrix4, Point3};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Outlines win depth ties against the fill of the same part
const OUTLINE_DEPTH_BIAS: f32 = 1e-3;

#[derive(Debug, Clone, Copy)]
struct Cell {
    character: char,
    color: Color,
    depth: f32,
}

impl Cell {
    const EMPTY: Cell = Cell {
        character: ' ',
        color: Color::BACKGROUND,
        depth: f32::INFINITY,
    };
}

/// Screen-space vertex: column, row, depth
type ScreenPoint = (f32, f32, f32);

/// ASCII renderer that converts draw calls to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    meshes: HashMap<PrimitiveKind, Mesh>,
    projection: Matrix4<f32>,
    viewport: Viewport,
}

impl AsciiRenderer {
    /// Renderer with a mesh registered for every primitive kind
    pub fn new(width: usize, height: usize) -> Self {
        let meshes = PrimitiveKind::ALL
            .into_iter()
            .map(|kind| (kind, Mesh::for_primitive(kind)))
            .collect();
        Self::with_meshes(width, height, meshes)
    }

    pub fn with_meshes(width: usize, height: usize, meshes: HashMap<PrimitiveKind, Mesh>) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width * height],
            meshes,
            projection: Matrix4::identity(),
            viewport: Viewport::new(0, 0, width as u32, height as u32),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::EMPTY; width * height];
        self.viewport = Viewport::new(0, 0, width as u32, height as u32);
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Character and color at a cell
    pub fn cell(&self, x: usize, y: usize) -> Option<(char, Color)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let cell = self.cells[y * self.width + x];
        Some((cell.character, cell.color))
    }

    /// Project a primitive-space point through model-view and projection
    /// into the current viewport
    fn project(&self, mvp: &Matrix4<f32>, point: &Point3<f32>) -> ScreenPoint {
        let ndc = mvp.transform_point(point);
        let vp = self.viewport;
        let x = vp.x as f32 + (ndc.x + 1.0) * 0.5 * vp.width as f32;
        let y = vp.y as f32 + (1.0 - ndc.y) * 0.5 * vp.height as f32;
        (x, y, ndc.z)
    }

    /// Columns and rows covered by the viewport, clipped to the surface
    fn clip_bounds(&self) -> (i32, i32, i32, i32) {
        let vp = self.viewport;
        let min_x = vp.x as i32;
        let min_y = vp.y as i32;
        let max_x = ((vp.x + vp.width) as usize).min(self.width) as i32 - 1;
        let max_y = ((vp.y + vp.height) as usize).min(self.height) as i32 - 1;
        (min_x, min_y, max_x, max_y)
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char, color: Color) {
        let (min_x, min_y, max_x, max_y) = self.clip_bounds();
        if x < min_x || x > max_x || y < min_y || y > max_y {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.cells[idx].depth {
            self.cells[idx] = Cell {
                character,
                color,
                depth,
            };
        }
    }

    /// Step along the segment inside the viewport. Returns the number of
    /// cells visited.
    fn draw_line(&mut self, a: ScreenPoint, b: ScreenPoint, color: Color) -> usize {
        let character = line_char(b.0 - a.0, b.1 - a.1);
        let (min_x, min_y, max_x, max_y) = self.clip_bounds();
        if max_x < min_x || max_y < min_y {
            return 0;
        }
        let bounds = (
            min_x as f32,
            min_y as f32,
            (max_x + 1) as f32,
            (max_y + 1) as f32,
        );
        let Some((a, b)) = clip_segment(a, b, bounds) else {
            return 0;
        };

        let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = a.0 + (b.0 - a.0) * t;
            let y = a.1 + (b.1 - a.1) * t;
            let depth = a.2 + (b.2 - a.2) * t - OUTLINE_DEPTH_BIAS;
            self.plot(x.floor() as i32, y.floor() as i32, depth, character, color);
        }
        steps + 1
    }

    fn fill_triangle(&mut self, coords: [ScreenPoint; 3], character: char, color: Color) {
        let [v0, v1, v2] = coords;
        let (clip_min_x, clip_min_y, clip_max_x, clip_max_y) = self.clip_bounds();

        // Bounding box clipped to the viewport
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(clip_min_x);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(clip_max_x);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(clip_min_y);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(clip_max_y);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                    self.plot(x, y, depth, character, color);
                }
            }
        }
    }

    fn draw_triangle(
        &mut self,
        triangle: &Triangle,
        mvp: &Matrix4<f32>,
        normal: &Matrix4<f32>,
        color: Color,
        mode: DrawMode,
    ) {
        let coords = triangle
            .vertices
            .map(|vertex| self.project(mvp, &vertex.position));

        match mode {
            DrawMode::Outline => {
                for (a, b) in [(0, 1), (1, 2), (2, 0)] {
                    self.draw_line(coords[a], coords[b], color);
                }
            }
            DrawMode::Fill => {
                // Two-sided light from the viewer
                let eye_normal = normal.transform_vector(&triangle.average_normal());
                let brightness = eye_normal
                    .try_normalize(1e-6)
                    .map(|n| n.z.abs())
                    .unwrap_or(0.0);
                let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
                let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];
                self.fill_triangle(coords, character, shade(color, brightness));
            }
        }
    }

    /// Write the character buffer to the terminal
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(to_term_color(Color::BACKGROUND)))?;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            let mut current = None;
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(to_term_color(cell.color)))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.character))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Renderer for AsciiRenderer {
    fn supports(&self, kind: PrimitiveKind) -> bool {
        self.meshes.contains_key(&kind)
    }

    fn set_projection(&mut self, projection: &Matrix4<f32>) {
        self.projection = *projection;
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn draw(
        &mut self,
        kind: PrimitiveKind,
        model_view: &Matrix4<f32>,
        normal: &Matrix4<f32>,
        color: Color,
        mode: DrawMode,
    ) {
        // Validated at startup, so a missing mesh never reaches this point
        let Some(mesh) = self.meshes.remove(&kind) else {
            return;
        };
        let mvp = self.projection * model_view;
        for triangle in &mesh.triangles {
            self.draw_triangle(triangle, &mvp, normal, color, mode);
        }
        self.meshes.insert(kind, mesh);
    }
}

/// Liang-Barsky clip of `a`-`b` to `(min_x, min_y, max_x, max_y)`, with
/// depth interpolated at the clipped ends
fn clip_segment(
    a: ScreenPoint,
    b: ScreenPoint,
    (min_x, min_y, max_x, max_y): (f32, f32, f32, f32),
) -> Option<(ScreenPoint, ScreenPoint)> {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;

    for (p, q) in [
        (-dx, a.0 - min_x),
        (dx, max_x - a.0),
        (-dy, a.1 - min_y),
        (dy, max_y - a.1),
    ] {
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

    let at = |t: f32| (a.0 + dx * t, a.1 + dy * t, a.2 + (b.2 - a.2) * t);
    Some((at(t0), at(t1)))
}

/// Pick a line character from the screen-space direction
fn line_char(dx: f32, dy: f32) -> char {
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

fn shade(color: Color, brightness: f32) -> Color {
    let k = 0.35 + 0.65 * brightness;
    Color {
        r: color.r * k,
        g: color.g * k,
        b: color.b * k,
        a: color.a,
    }
}

fn to_term_color(color: Color) -> TermColor {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    TermColor::Rgb {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use laddertruck_core::{InputController, InputEvent, Scene, SceneError, SceneState, Transform};

    fn identity() -> Matrix4<f32> {
        Matrix4::identity()
    }

    #[test]
    fn test_fill_cube_covers_centre() {
        let mut renderer = AsciiRenderer::new(20, 10);
        let model = Transform::scale_matrix(1.0, 1.0, 1.0);
        renderer.draw(PrimitiveKind::Cube, &model, &identity(), Color::RED, DrawMode::Fill);

        let (character, color) = renderer.cell(10, 5).unwrap();
        assert_eq!(character, '@');
        assert!(color.r > 0.99 && color.g == 0.0);
        assert_eq!(renderer.cell(0, 0).unwrap().0, ' ');
    }

    #[test]
    fn test_outline_wins_over_fill() {
        let mut renderer = AsciiRenderer::new(21, 11);
        let model = Transform::scale_matrix(2.0, 2.0, 2.0);
        renderer.draw(PrimitiveKind::Cube, &model, &identity(), Color::BLACK, DrawMode::Outline);
        renderer.draw(PrimitiveKind::Cube, &model, &identity(), Color::RED, DrawMode::Fill);

        // Cube spans the full surface; the top row is an edge
        let (character, color) = renderer.cell(10, 0).unwrap();
        assert_eq!(character, '-');
        assert_eq!(color, Color::BLACK);
    }

    #[test]
    fn test_viewport_clips_drawing() {
        let mut renderer = AsciiRenderer::new(20, 10);
        renderer.set_viewport(Viewport::new(10, 0, 10, 5));
        let model = Transform::scale_matrix(4.0, 4.0, 1.0);
        renderer.draw(PrimitiveKind::Cube, &model, &identity(), Color::WHITE, DrawMode::Fill);

        assert_ne!(renderer.cell(15, 2).unwrap().0, ' ');
        assert_eq!(renderer.cell(5, 2).unwrap().0, ' ');
        assert_eq!(renderer.cell(15, 7).unwrap().0, ' ');
    }

    #[test]
    fn test_clear_and_resize() {
        let mut renderer = AsciiRenderer::new(8, 4);
        renderer.draw(PrimitiveKind::Sphere, &identity(), &identity(), Color::YELLOW, DrawMode::Fill);
        renderer.clear();
        assert!((0..8).all(|x| renderer.cell(x, 2).unwrap().0 == ' '));

        renderer.resize(30, 12);
        assert_eq!((renderer.width(), renderer.height()), (30, 12));
        assert!(renderer.cell(29, 11).is_some());
        assert!(renderer.cell(30, 0).is_none());
    }

    #[test]
    fn test_missing_mesh_fails_validation() {
        let mut meshes = HashMap::new();
        meshes.insert(PrimitiveKind::Cube, Mesh::cube(1.0));
        let renderer = AsciiRenderer::with_meshes(10, 10, meshes);
        let err = Scene::default().validate(&renderer).unwrap_err();
        assert!(matches!(err, SceneError::MissingPrimitive(_)));
    }

    #[test]
    fn test_full_frame_draws_something_in_every_quadrant() {
        let mut renderer = AsciiRenderer::new(80, 40);
        let mut scene = Scene::default();
        let mut state = SceneState::new();
        state.display.pixel_aspect = 0.5;
        state.resize(80, 40);
        scene.validate(&renderer).unwrap();
        scene.render(&state, &mut renderer, 0.0);

        for (x0, y0) in [(0, 0), (40, 0), (0, 20), (40, 20)] {
            let drawn = (x0..x0 + 40)
                .flat_map(|x| (y0..y0 + 20).map(move |y| (x, y)))
                .filter(|&(x, y)| renderer.cell(x, y).unwrap().0 != ' ')
                .count();
            assert!(drawn > 0, "quadrant at ({x0}, {y0}) is empty");
        }
    }

    #[test]
    fn test_clip_segment() {
        let bounds = (0.0, 0.0, 20.0, 10.0);
        let (a, b) = clip_segment((-1000.0, 5.0, 0.0), (1000.0, 5.0, 1.0), bounds).unwrap();
        assert!((a.0 - 0.0).abs() < 1e-3 && (b.0 - 20.0).abs() < 1e-3);
        assert!((a.2 - 0.5).abs() < 1e-3 && (b.2 - 0.5).abs() < 1e-3);

        // Diagonal entering through the left edge and leaving through the bottom
        let (a, b) = clip_segment((-5.0, 0.0, 0.0), (15.0, 20.0, 0.0), bounds).unwrap();
        assert!((a.0 - 0.0).abs() < 1e-4 && (a.1 - 5.0).abs() < 1e-4);
        assert!((b.0 - 5.0).abs() < 1e-4 && (b.1 - 10.0).abs() < 1e-4);

        assert!(clip_segment((-5.0, -1.0, 0.0), (30.0, -1.0, 0.0), bounds).is_none());
        assert!(clip_segment((25.0, 0.0, 0.0), (30.0, 9.0, 0.0), bounds).is_none());
    }

    #[test]
    fn test_long_line_steps_bounded_by_viewport() {
        let mut renderer = AsciiRenderer::new(80, 40);
        renderer.set_viewport(Viewport::new(40, 20, 40, 20));
        // Runs through the viewport corner to corner, far past both ends
        let steps = renderer.draw_line((-1960.0, -980.0, 0.0), (2080.0, 1040.0, 0.0), Color::BLACK);
        assert!(steps <= 45, "visited {steps} cells");

        let mut drawn = Vec::new();
        for x in 0..80 {
            for y in 0..40 {
                if renderer.cell(x, y).unwrap().0 != ' ' {
                    drawn.push((x, y));
                }
            }
        }
        assert!(drawn.len() >= 30);
        assert!(drawn.iter().all(|&(x, y)| x >= 40 && y >= 20));
        assert!(drawn.iter().all(|&(x, y)| renderer.cell(x, y).unwrap().0 == '\\'));

        let outside = renderer.draw_line((-1e7, 5.0, 0.0), (1e7, 5.0, 0.0), Color::BLACK);
        assert_eq!(outside, 0);
    }

    #[test]
    fn test_deeply_zoomed_frame_stays_in_viewports() {
        let mut renderer = AsciiRenderer::new(80, 40);
        let mut scene = Scene::default();
        let controller = InputController::default();
        let mut state = SceneState::new();
        state.display.pixel_aspect = 0.5;
        state.resize(80, 40);
        for _ in 0..60 {
            controller.handle(&mut state, &InputEvent::Wheel(-100.0));
        }
        assert!(state.camera.zoom < 0.05);

        scene.render(&state, &mut renderer, 0.0);
        let drawn = (0..80)
            .flat_map(|x| (0..40).map(move |y| (x, y)))
            .filter(|&(x, y)| renderer.cell(x, y).unwrap().0 != ' ')
            .count();
        assert!(drawn > 0);
    }

    #[test]
    fn test_line_chars() {
        assert_eq!(line_char(10.0, 0.0), '-');
        assert_eq!(line_char(0.0, 5.0), '|');
        assert_eq!(line_char(3.0, 3.0), '\\');
        assert_eq!(line_char(-3.0, 3.0), '/');
    }

    #[test]
    fn test_present_writes_every_row() {
        let renderer = AsciiRenderer::new(4, 3);
        let mut out = Vec::new();
        renderer.present(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("    ").count(), 3);
    }
}
