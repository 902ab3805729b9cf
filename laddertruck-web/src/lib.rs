/// Laddertruck Web - WASM bindings for the ladder truck viewer
///
/// The page owns the canvas and the GPU. Each frame it asks `WebTruck` for
/// a flat command list and replays it: viewport records, projection records
/// and draw records carrying the primitive, mode, color and matrices.
/// Viewport records use the GL bottom-left origin, so they go straight to
/// `gl.viewport`.
use laddertruck_core::{
    Clock, CommandBuffer, DrawCommand, DrawMode, InputController, InputEvent, PrimitiveKind,
    Scene, SceneError, SceneState,
};
use nalgebra::Matrix4;
use tracing::debug;
use wasm_bindgen::prelude::*;

pub const TAG_VIEWPORT: f32 = 0.0;
pub const TAG_PROJECTION: f32 = 1.0;
pub const TAG_DRAW: f32 = 2.0;

/// `performance.timeOrigin + performance.now()` in milliseconds
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceClock;

impl Clock for PerformanceClock {
    fn now_millis(&self) -> f64 {
        web_sys::window()
            .and_then(|window| window.performance())
            .map(|performance| performance.time_origin() + performance.now())
            .unwrap_or(0.0)
    }
}

#[wasm_bindgen]
pub struct WebTruck {
    state: SceneState,
    scene: Scene,
    controller: InputController,
    commands: CommandBuffer,
}

#[wasm_bindgen]
impl WebTruck {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> WebTruck {
        let mut state = SceneState::new();
        state.resize(width, height);
        WebTruck {
            state,
            scene: Scene::default(),
            controller: InputController::default(),
            commands: CommandBuffer::new(),
        }
    }

    /// Apply `key = command` overrides on top of the current bindings
    pub fn load_keymap(&mut self, source: &str) -> Result<usize, JsValue> {
        self.apply_keymap(source)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Handle a `KeyboardEvent.key` value. Returns true when it was bound.
    pub fn key_down(&mut self, key: &str) -> bool {
        self.controller
            .handle(&mut self.state, &InputEvent::Key(key.to_string()))
            .is_some()
    }

    /// Handle a wheel `deltaY`
    pub fn wheel(&mut self, delta: f32) {
        self.controller
            .handle(&mut self.state, &InputEvent::Wheel(delta));
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.controller
            .handle(&mut self.state, &InputEvent::Resize { width, height });
    }

    /// Commands for a frame at the current time
    pub fn frame(&mut self) -> Vec<f32> {
        self.frame_at(PerformanceClock.now_millis())
    }

    /// Commands for a frame at `time_ms`
    pub fn frame_at(&mut self, time_ms: f64) -> Vec<f32> {
        self.commands.clear();
        self.scene
            .render(&self.state, &mut self.commands, time_ms);
        debug!(commands = self.commands.commands().len(), "frame recorded");
        flatten(self.commands.commands(), self.state.display.height)
    }

    pub fn show_help(&self) -> bool {
        self.state.display.show_help
    }

    /// One `keys: description` line per command
    pub fn help_text(&self) -> String {
        self.controller
            .help_lines()
            .into_iter()
            .map(|(keys, description)| format!("{keys}: {description}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl WebTruck {
    fn apply_keymap(&mut self, source: &str) -> Result<usize, SceneError> {
        let mut keymap = self.controller.keymap().clone();
        let applied = keymap.apply_overrides(source)?;
        self.controller = InputController::new(keymap);
        Ok(applied)
    }
}

fn primitive_code(kind: PrimitiveKind) -> f32 {
    match kind {
        PrimitiveKind::Cube => 0.0,
        PrimitiveKind::Sphere => 1.0,
        PrimitiveKind::Cylinder => 2.0,
        PrimitiveKind::Torus => 3.0,
    }
}

fn push_matrix(out: &mut Vec<f32>, matrix: &Matrix4<f32>) {
    // Column-major, as WebGL uniforms expect
    out.extend_from_slice(matrix.as_slice());
}

/// Flatten recorded commands into tagged records:
/// viewport `[0, x, y, w, h]`, projection `[1, m0..m15]`,
/// draw `[2, primitive, mode, r, g, b, a, model_view.., normal..]`.
///
/// Viewports are recorded with a top-left origin; `y` is flipped against
/// `surface_height` to the bottom-left origin GL expects.
pub fn flatten(commands: &[DrawCommand], surface_height: u32) -> Vec<f32> {
    let mut out = Vec::new();
    for command in commands {
        match command {
            DrawCommand::Viewport(vp) => out.extend_from_slice(&[
                TAG_VIEWPORT,
                vp.x as f32,
                surface_height.saturating_sub(vp.y + vp.height) as f32,
                vp.width as f32,
                vp.height as f32,
            ]),
            DrawCommand::Projection(projection) => {
                out.push(TAG_PROJECTION);
                push_matrix(&mut out, projection);
            }
            DrawCommand::Draw {
                kind,
                model_view,
                normal,
                color,
                mode,
            } => {
                out.push(TAG_DRAW);
                out.push(primitive_code(*kind));
                out.push(match mode {
                    DrawMode::Outline => 0.0,
                    DrawMode::Fill => 1.0,
                });
                out.extend_from_slice(&color.to_array());
                push_matrix(&mut out, model_view);
                push_matrix(&mut out, normal);
            }
        }
    }
    out
}
