/// Pose parameters, light toggles and display state shared by input and traversal
use std::ops::RangeInclusive;

use tracing::trace;

use crate::camera::{CameraRig, ViewKind};

pub const INCLINATION_RANGE: RangeInclusive<f32> = -45.0..=0.0;
/// Ladder extension range in tenths of a unit
pub const EXTENSION_STEPS_RANGE: RangeInclusive<i32> = -70..=0;
pub const EXTENSION_STEPS_PER_UNIT: f32 = 10.0;
pub const CHASSIS_RANGE: RangeInclusive<f32> = -5.5..=5.5;
/// Wheel spin per unit of chassis travel (45 degrees per half unit)
pub const WHEEL_DEGREES_PER_UNIT: f32 = 90.0;

/// Joint parameters of the truck
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pose {
    ladder_rotation: f32,
    ladder_inclination: f32,
    extension_steps: i32,
    chassis_position: f32,
    wheel_spin: f32,
}

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ladder yaw in degrees, unbounded
    pub fn ladder_rotation(&self) -> f32 {
        self.ladder_rotation
    }

    /// Ladder tilt in degrees, within `INCLINATION_RANGE`
    pub fn ladder_inclination(&self) -> f32 {
        self.ladder_inclination
    }

    /// Ladder extension in world units, within `[-7, 0]`
    pub fn ladder_extension(&self) -> f32 {
        self.extension_steps as f32 / EXTENSION_STEPS_PER_UNIT
    }

    pub fn chassis_position(&self) -> f32 {
        self.chassis_position
    }

    /// Wheel spin in degrees, unbounded and tied to chassis travel
    pub fn wheel_spin(&self) -> f32 {
        self.wheel_spin
    }

    pub fn rotate_ladder(&mut self, degrees: f32) {
        self.ladder_rotation += degrees;
    }

    /// Tilt the ladder. The delta is dropped when the result would leave
    /// `INCLINATION_RANGE`.
    pub fn tilt_ladder(&mut self, degrees: f32) -> bool {
        let next = self.ladder_inclination + degrees;
        if !INCLINATION_RANGE.contains(&next) {
            trace!(current = self.ladder_inclination, degrees, "ladder tilt dropped");
            return false;
        }
        self.ladder_inclination = next;
        true
    }

    /// Slide the upper ladder by tenths of a unit (negative extends).
    /// The delta is dropped when the result would leave the range.
    pub fn extend_ladder(&mut self, steps: i32) -> bool {
        let next = self.extension_steps + steps;
        if !EXTENSION_STEPS_RANGE.contains(&next) {
            trace!(current = self.extension_steps, steps, "ladder extension dropped");
            return false;
        }
        self.extension_steps = next;
        true
    }

    /// Move the chassis along X and spin the wheels to match. The delta is
    /// dropped when the result would leave `CHASSIS_RANGE`.
    pub fn drive(&mut self, distance: f32) -> bool {
        let next = self.chassis_position + distance;
        if !CHASSIS_RANGE.contains(&next) {
            trace!(current = self.chassis_position, distance, "chassis move dropped");
            return false;
        }
        self.chassis_position = next;
        self.wheel_spin += distance * WHEEL_DEGREES_PER_UNIT;
        true
    }
}

/// Sides of the truck that carry a blinker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Light toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lights {
    pub beacon: bool,
    pub danger: bool,
    left_blinker: bool,
    right_blinker: bool,
}

impl Lights {
    pub fn blinker(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left_blinker,
            Side::Right => self.right_blinker,
        }
    }

    /// Flip one blinker. Blinkers are mutually exclusive: the toggle is
    /// rejected while the other side is on.
    pub fn toggle_blinker(&mut self, side: Side) -> bool {
        let (this, other) = match side {
            Side::Left => (&mut self.left_blinker, self.right_blinker),
            Side::Right => (&mut self.right_blinker, self.left_blinker),
        };
        if other {
            trace!(?side, "blinker toggle rejected, other side is on");
            return false;
        }
        *this = !*this;
        true
    }

    /// Whether `side` blinks this frame; danger lights override both toggles
    pub fn is_blinking(&self, side: Side) -> bool {
        self.danger || self.blinker(side)
    }
}

/// Viewport arrangement and render flags
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    /// Four views at once, or only `selected`
    pub quad: bool,
    pub selected: ViewKind,
    pub wireframe_only: bool,
    pub show_help: bool,
    /// Surface size in renderer units
    pub width: u32,
    pub height: u32,
    /// Width over height of one renderer unit (1.0 for square pixels)
    pub pixel_aspect: f32,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            quad: true,
            selected: ViewKind::Front,
            wireframe_only: false,
            show_help: true,
            width: 1,
            height: 1,
            pixel_aspect: 1.0,
        }
    }
}

/// Everything input mutates and the traversal reads
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    pub pose: Pose,
    pub lights: Lights,
    pub camera: CameraRig,
    pub display: DisplayState,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new surface size and refresh the projection aspect
    pub fn resize(&mut self, width: u32, height: u32) {
        self.display.width = width;
        self.display.height = height;
        self.camera
            .resize(width as f32 * self.display.pixel_aspect, height as f32);
    }
}
