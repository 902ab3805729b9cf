/// Rigid part descriptors and the two-pass part drawer
use crate::blink::{
    alternating_color, BEACON_COLORS, BEACON_FREQUENCY, BLINKER_COLORS, BLINKER_FREQUENCY,
};
use crate::render::{Color, DrawMode, PrimitiveKind, Renderer};
use crate::state::{Lights, Side};
use crate::transform::{Transform, TransformStack};

/// Per-frame override of a part's fill color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRule {
    /// Always the descriptor's fill color
    Fixed,
    /// Roof beacon, flashes white/blue while the beacon is on
    Beacon,
    /// Turn signal on one side, flashes white/amber while that side or the
    /// danger lights are on
    Blinker(Side),
}

/// Immutable description of a drawable rigid part
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartDescriptor {
    pub name: &'static str,
    pub primitive: PrimitiveKind,
    /// Local scale, applied innermost
    pub scale: [f32; 3],
    pub outline: Color,
    pub fill: Color,
    pub rule: ColorRule,
}

impl PartDescriptor {
    pub const fn new(
        name: &'static str,
        primitive: PrimitiveKind,
        scale: [f32; 3],
        outline: Color,
        fill: Color,
    ) -> Self {
        Self {
            name,
            primitive,
            scale,
            outline,
            fill,
            rule: ColorRule::Fixed,
        }
    }

    /// Box with a black outline
    pub const fn boxed(name: &'static str, scale: [f32; 3], fill: Color) -> Self {
        Self::new(name, PrimitiveKind::Cube, scale, Color::BLACK, fill)
    }

    pub const fn with_rule(self, rule: ColorRule) -> Self {
        Self { rule, ..self }
    }
}

/// Issues the outline and fill passes for parts
#[derive(Debug, Clone, Copy)]
pub struct PartDrawer<'a> {
    pub lights: &'a Lights,
    pub wireframe_only: bool,
    /// Wall-clock time the blink phases are derived from
    pub time_ms: f64,
}

impl<'a> PartDrawer<'a> {
    pub fn new(lights: &'a Lights, wireframe_only: bool, time_ms: f64) -> Self {
        Self {
            lights,
            wireframe_only,
            time_ms,
        }
    }

    /// Fill color of `part` for this frame
    pub fn fill_color(&self, part: &PartDescriptor) -> Color {
        match part.rule {
            ColorRule::Fixed => part.fill,
            ColorRule::Beacon if self.lights.beacon => {
                alternating_color(BEACON_COLORS, BEACON_FREQUENCY, self.time_ms)
            }
            ColorRule::Blinker(side) if self.lights.is_blinking(side) => {
                alternating_color(BLINKER_COLORS, BLINKER_FREQUENCY, self.time_ms)
            }
            ColorRule::Beacon | ColorRule::Blinker(_) => part.fill,
        }
    }

    /// Draw `part` under the stack's current transform. The part scale is
    /// composed locally; the stack itself is left untouched.
    pub fn draw<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        stack: &TransformStack,
        part: &PartDescriptor,
    ) {
        let [sx, sy, sz] = part.scale;
        let model_view = stack.current() * Transform::scale_matrix(sx, sy, sz);
        let normal = Transform::normal_matrix(&model_view);

        renderer.draw(
            part.primitive,
            &model_view,
            &normal,
            part.outline,
            DrawMode::Outline,
        );

        let mode = if self.wireframe_only {
            DrawMode::Outline
        } else {
            DrawMode::Fill
        };
        renderer.draw(part.primitive, &model_view, &normal, self.fill_color(part), mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{CommandBuffer, DrawCommand};
    use nalgebra::{Point3, Vector3};

    const BLINKER: PartDescriptor =
        PartDescriptor::boxed("blinker", [0.3, 0.3, 0.3], Color::WHITE)
            .with_rule(ColorRule::Blinker(Side::Left));

    fn passes(buffer: &CommandBuffer) -> Vec<(Color, DrawMode)> {
        buffer
            .draws()
            .map(|c| match c {
                DrawCommand::Draw { color, mode, .. } => (*color, *mode),
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn test_two_passes() {
        let lights = Lights::default();
        let part = PartDescriptor::boxed("cabin", [4.0, 5.0, 5.0], Color::RED);
        let mut buffer = CommandBuffer::new();
        let stack = TransformStack::new();

        PartDrawer::new(&lights, false, 0.0).draw(&mut buffer, &stack, &part);
        assert_eq!(
            passes(&buffer),
            vec![(Color::BLACK, DrawMode::Outline), (Color::RED, DrawMode::Fill)]
        );

        buffer.clear();
        PartDrawer::new(&lights, true, 0.0).draw(&mut buffer, &stack, &part);
        assert_eq!(
            passes(&buffer),
            vec![(Color::BLACK, DrawMode::Outline), (Color::RED, DrawMode::Outline)]
        );
    }

    #[test]
    fn test_scale_is_innermost_and_stack_untouched() {
        let lights = Lights::default();
        let part = PartDescriptor::boxed("rail", [10.0, 0.5, 0.5], Color::GREY);
        let mut stack = TransformStack::new();
        stack.translate(Vector3::new(-5.0, 0.75, 1.0));
        let before = *stack.current();

        let mut buffer = CommandBuffer::new();
        PartDrawer::new(&lights, false, 0.0).draw(&mut buffer, &stack, &part);
        assert_eq!(*stack.current(), before);

        let Some(DrawCommand::Draw { model_view, .. }) = buffer.draws().next() else {
            panic!("no draw recorded");
        };
        let end = model_view.transform_point(&Point3::new(0.5, 0.5, 0.0));
        assert!((end - Point3::new(0.0, 1.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_blinker_idle_and_active() {
        let mut lights = Lights::default();
        assert_eq!(PartDrawer::new(&lights, false, 0.0).fill_color(&BLINKER), Color::WHITE);

        // Phase 0 is the amber half of the cycle
        lights.toggle_blinker(Side::Left);
        assert_eq!(PartDrawer::new(&lights, false, 0.0).fill_color(&BLINKER), Color::AMBER);
        assert_eq!(PartDrawer::new(&lights, false, 1000.0).fill_color(&BLINKER), Color::WHITE);
    }

    #[test]
    fn test_danger_lights_blink_both_sides_in_sync() {
        let mut lights = Lights::default();
        lights.toggle_blinker(Side::Left);
        lights.danger = true;
        let right = BLINKER.with_rule(ColorRule::Blinker(Side::Right));

        for t in [0.0, 400.0, 1200.0, 5300.0] {
            let drawer = PartDrawer::new(&lights, false, t);
            assert_eq!(drawer.fill_color(&BLINKER), drawer.fill_color(&right));
        }
        assert_eq!(PartDrawer::new(&lights, false, 0.0).fill_color(&right), Color::AMBER);
    }

    #[test]
    fn test_beacon_rule() {
        let beacon = PartDescriptor::boxed("beacon", [1.0, 0.5, 1.0], Color::WHITE)
            .with_rule(ColorRule::Beacon);
        let mut lights = Lights::default();
        assert_eq!(PartDrawer::new(&lights, false, 0.0).fill_color(&beacon), Color::WHITE);
        lights.beacon = true;
        assert_eq!(PartDrawer::new(&lights, false, 0.0).fill_color(&beacon), Color::BLUE);
        assert_eq!(PartDrawer::new(&lights, false, 200.0).fill_color(&beacon), Color::WHITE);
    }
}
