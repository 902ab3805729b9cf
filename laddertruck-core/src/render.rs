/// The renderer collaborator: draw calls, colors and viewports
use std::fmt;

use nalgebra::Matrix4;

use crate::error::SceneError;

/// Primitive shapes a renderer must be able to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Cube,
    Sphere,
    Cylinder,
    Torus,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 4] = [
        PrimitiveKind::Cube,
        PrimitiveKind::Sphere,
        PrimitiveKind::Cylinder,
        PrimitiveKind::Torus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Cube => "cube",
            PrimitiveKind::Sphere => "sphere",
            PrimitiveKind::Cylinder => "cylinder",
            PrimitiveKind::Torus => "torus",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Line pass or filled-triangle pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Outline,
    Fill,
}

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const GREY: Color = Color::rgb(0.9, 0.9, 0.9);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const ORANGE: Color = Color::rgb(1.0, 0.4, 0.0);
    pub const YELLOW: Color = Color::rgb(0.8, 0.9, 0.0);
    pub const CYAN: Color = Color::rgb(0.7, 1.0, 1.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const AMBER: Color = Color::rgb(1.0, 0.642, 0.0);
    pub const BACKGROUND: Color = Color::rgb(0.5, 0.3, 0.7);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Rectangle of the output surface, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Backend that turns draw calls into pixels (or characters, or commands)
pub trait Renderer {
    /// Whether a mesh is registered for `kind`
    fn supports(&self, kind: PrimitiveKind) -> bool;

    fn set_projection(&mut self, projection: &Matrix4<f32>);

    fn set_viewport(&mut self, viewport: Viewport);

    /// Draw a primitive. `model_view` maps primitive space to eye space and
    /// `normal` is its inverse-transpose.
    fn draw(
        &mut self,
        kind: PrimitiveKind,
        model_view: &Matrix4<f32>,
        normal: &Matrix4<f32>,
        color: Color,
        mode: DrawMode,
    );
}

/// Check that `renderer` can draw every primitive in `required`
pub fn validate_renderer<R, I>(renderer: &R, required: I) -> Result<(), SceneError>
where
    R: Renderer + ?Sized,
    I: IntoIterator<Item = PrimitiveKind>,
{
    for kind in required {
        if !renderer.supports(kind) {
            return Err(SceneError::MissingPrimitive(kind));
        }
    }
    Ok(())
}

/// A single recorded renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Viewport(Viewport),
    Projection(Matrix4<f32>),
    Draw {
        kind: PrimitiveKind,
        model_view: Matrix4<f32>,
        normal: Matrix4<f32>,
        color: Color,
        mode: DrawMode,
    },
}

/// Renderer that records every call, for hosts that replay the commands
/// elsewhere (a browser) and for inspecting frames in tests
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Draw calls only, skipping viewport and projection changes
    pub fn draws(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Draw { .. }))
    }
}

impl Renderer for CommandBuffer {
    fn supports(&self, _kind: PrimitiveKind) -> bool {
        true
    }

    fn set_projection(&mut self, projection: &Matrix4<f32>) {
        self.commands.push(DrawCommand::Projection(*projection));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.commands.push(DrawCommand::Viewport(viewport));
    }

    fn draw(
        &mut self,
        kind: PrimitiveKind,
        model_view: &Matrix4<f32>,
        normal: &Matrix4<f32>,
        color: Color,
        mode: DrawMode,
    ) {
        self.commands.push(DrawCommand::Draw {
            kind,
            model_view: *model_view,
            normal: *normal,
            color,
            mode,
        });
    }
}
