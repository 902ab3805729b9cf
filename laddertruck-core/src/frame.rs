/// Per-frame driver: viewport layout and traversal of every active view
use tracing::trace;

use crate::assembly::Assembly;
use crate::camera::ViewKind;
use crate::error::SceneError;
use crate::part::PartDrawer;
use crate::render::{validate_renderer, Renderer, Viewport};
use crate::state::{DisplayState, SceneState};
use crate::transform::TransformStack;

/// Viewports for the current display mode.
///
/// Quad mode places front top-left, left top-right, top bottom-left and
/// orbit bottom-right. Single mode gives the selected view the whole surface.
pub fn layout(display: &DisplayState) -> Vec<(ViewKind, Viewport)> {
    let (width, height) = (display.width, display.height);
    if !display.quad {
        return vec![(display.selected, Viewport::new(0, 0, width, height))];
    }

    let half_w = width / 2;
    let half_h = height / 2;
    let (rest_w, rest_h) = (width - half_w, height - half_h);
    vec![
        (ViewKind::Front, Viewport::new(0, 0, half_w, half_h)),
        (ViewKind::Left, Viewport::new(half_w, 0, rest_w, half_h)),
        (ViewKind::Top, Viewport::new(0, half_h, half_w, rest_h)),
        (ViewKind::Orbit, Viewport::new(half_w, half_h, rest_w, rest_h)),
    ]
}

/// The assembly plus the transform stack its traversal uses
#[derive(Debug, Clone, Default)]
pub struct Scene {
    assembly: Assembly,
    stack: TransformStack,
}

impl Scene {
    pub fn new(assembly: Assembly) -> Self {
        Self {
            assembly,
            stack: TransformStack::new(),
        }
    }

    pub fn assembly(&self) -> &Assembly {
        &self.assembly
    }

    /// Check at startup that `renderer` can draw every primitive in the scene
    pub fn validate<R: Renderer + ?Sized>(&self, renderer: &R) -> Result<(), SceneError> {
        validate_renderer(renderer, self.assembly.primitives())
    }

    /// Draw one frame: for every active viewport, reset the stack to that
    /// view and walk the assembly
    pub fn render<R: Renderer + ?Sized>(
        &mut self,
        state: &SceneState,
        renderer: &mut R,
        time_ms: f64,
    ) {
        let drawer = PartDrawer::new(&state.lights, state.display.wireframe_only, time_ms);
        let projection = state.camera.projection();

        for (view, viewport) in layout(&state.display) {
            renderer.set_viewport(viewport);
            renderer.set_projection(&projection);
            self.stack.load(*state.camera.view(view));
            self.assembly
                .draw(&mut self.stack, &state.pose, &drawer, renderer);
            assert_eq!(self.stack.depth(), 0, "unbalanced transform scopes");
            trace!(view = view.label(), ?viewport, "view drawn");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Color, CommandBuffer, DrawCommand, DrawMode};
    use crate::state::Side;

    #[test]
    fn test_quad_layout() {
        let display = DisplayState {
            width: 101,
            height: 51,
            ..DisplayState::default()
        };
        let views = layout(&display);
        assert_eq!(
            views,
            vec![
                (ViewKind::Front, Viewport::new(0, 0, 50, 25)),
                (ViewKind::Left, Viewport::new(50, 0, 51, 25)),
                (ViewKind::Top, Viewport::new(0, 25, 50, 26)),
                (ViewKind::Orbit, Viewport::new(50, 25, 51, 26)),
            ]
        );
    }

    #[test]
    fn test_single_layout() {
        let display = DisplayState {
            quad: false,
            selected: ViewKind::Top,
            width: 80,
            height: 24,
            ..DisplayState::default()
        };
        assert_eq!(layout(&display), vec![(ViewKind::Top, Viewport::new(0, 0, 80, 24))]);
    }

    #[test]
    fn test_render_quad_frame() {
        let mut scene = Scene::default();
        let mut state = SceneState::new();
        state.resize(200, 100);
        let mut buffer = CommandBuffer::new();
        scene.render(&state, &mut buffer, 0.0);

        let viewports = buffer
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Viewport(_)))
            .count();
        assert_eq!(viewports, 4);
        let parts = scene.assembly().parts().len();
        assert_eq!(buffer.draws().count(), 4 * parts * 2);
        assert_eq!(
            buffer.commands()[1],
            DrawCommand::Projection(state.camera.projection())
        );
    }

    #[test]
    fn test_wireframe_frame_has_no_fill() {
        let mut scene = Scene::default();
        let mut state = SceneState::new();
        state.display.quad = false;
        state.display.wireframe_only = true;
        let mut buffer = CommandBuffer::new();
        scene.render(&state, &mut buffer, 0.0);
        assert!(buffer
            .draws()
            .all(|c| matches!(c, DrawCommand::Draw { mode: DrawMode::Outline, .. })));
    }

    #[test]
    fn test_danger_overrides_single_blinker() {
        let mut scene = Scene::default();
        let mut state = SceneState::new();
        state.display.quad = false;
        state.lights.toggle_blinker(Side::Left);
        state.lights.danger = true;

        for time in [0.0, 1000.0] {
            let mut buffer = CommandBuffer::new();
            scene.render(&state, &mut buffer, time);
            let fills: Vec<Color> = scene
                .assembly()
                .parts()
                .iter()
                .zip(buffer.draws().skip(1).step_by(2))
                .filter(|(part, _)| part.name.ends_with("-blinker"))
                .map(|(_, command)| match command {
                    DrawCommand::Draw { color, .. } => *color,
                    _ => unreachable!(),
                })
                .collect();
            assert_eq!(fills.len(), 2);
            assert_eq!(fills[0], fills[1]);
        }
    }

    #[test]
    fn test_validate_against_command_buffer() {
        assert!(Scene::default().validate(&CommandBuffer::new()).is_ok());
    }
}
