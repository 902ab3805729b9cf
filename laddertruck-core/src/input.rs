/// Input controller: maps key events to commands and commands to state changes
use tracing::{debug, info, trace};

use crate::camera::ViewKind;
use crate::keymap::Keymap;
use crate::state::{DisplayState, SceneState, Side};

pub const LADDER_YAW_STEP: f32 = 5.0;
pub const LADDER_TILT_STEP: f32 = 2.5;
/// Tenths of a unit per extend/retract event
pub const LADDER_EXTENSION_STEPS: i32 = 1;
pub const CHASSIS_STEP: f32 = 0.5;
pub const AZIMUTH_STEP: f32 = 1.0;
pub const ELEVATION_UP_STEP: f32 = 10.0;
pub const ELEVATION_DOWN_STEP: f32 = 1.0;

/// Everything a key can do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ToggleHelp,
    ToggleQuadView,
    FrontView,
    LeftView,
    TopView,
    OrbitView,
    ToggleWireframe,
    RotateLadderCcw,
    RotateLadderCw,
    RaiseLadder,
    LowerLadder,
    ExtendLadder,
    RetractLadder,
    MoveForward,
    MoveBackward,
    ResetView,
    AzimuthIncrease,
    AzimuthDecrease,
    ElevationIncrease,
    ElevationDecrease,
    ToggleBeacon,
    ToggleLeftBlinker,
    ToggleRightBlinker,
    ToggleDangerLights,
}

impl Command {
    pub const ALL: [Command; 24] = [
        Command::ToggleHelp,
        Command::ToggleQuadView,
        Command::FrontView,
        Command::LeftView,
        Command::TopView,
        Command::OrbitView,
        Command::ToggleWireframe,
        Command::RotateLadderCcw,
        Command::RotateLadderCw,
        Command::RaiseLadder,
        Command::LowerLadder,
        Command::ExtendLadder,
        Command::RetractLadder,
        Command::MoveForward,
        Command::MoveBackward,
        Command::ResetView,
        Command::AzimuthIncrease,
        Command::AzimuthDecrease,
        Command::ElevationIncrease,
        Command::ElevationDecrease,
        Command::ToggleBeacon,
        Command::ToggleLeftBlinker,
        Command::ToggleRightBlinker,
        Command::ToggleDangerLights,
    ];

    /// Name used in keymap files
    pub fn name(self) -> &'static str {
        match self {
            Command::ToggleHelp => "toggle_help",
            Command::ToggleQuadView => "toggle_quad_view",
            Command::FrontView => "front_view",
            Command::LeftView => "left_view",
            Command::TopView => "top_view",
            Command::OrbitView => "orbit_view",
            Command::ToggleWireframe => "toggle_wireframe",
            Command::RotateLadderCcw => "rotate_ladder_ccw",
            Command::RotateLadderCw => "rotate_ladder_cw",
            Command::RaiseLadder => "raise_ladder",
            Command::LowerLadder => "lower_ladder",
            Command::ExtendLadder => "extend_ladder",
            Command::RetractLadder => "retract_ladder",
            Command::MoveForward => "move_forward",
            Command::MoveBackward => "move_backward",
            Command::ResetView => "reset_view",
            Command::AzimuthIncrease => "azimuth_increase",
            Command::AzimuthDecrease => "azimuth_decrease",
            Command::ElevationIncrease => "elevation_increase",
            Command::ElevationDecrease => "elevation_decrease",
            Command::ToggleBeacon => "toggle_beacon",
            Command::ToggleLeftBlinker => "toggle_left_blinker",
            Command::ToggleRightBlinker => "toggle_right_blinker",
            Command::ToggleDangerLights => "toggle_danger_lights",
        }
    }

    /// Text for the help overlay
    pub fn description(self) -> &'static str {
        match self {
            Command::ToggleHelp => "Toggle this panel",
            Command::ToggleQuadView => "Toggle 1/4 views",
            Command::FrontView => "Front view",
            Command::LeftView => "Left view",
            Command::TopView => "Top view",
            Command::OrbitView => "Axonometric view",
            Command::ToggleWireframe => "Toggle wireframe/solid",
            Command::RotateLadderCcw => "Rotate ladder CCW",
            Command::RotateLadderCw => "Rotate ladder CW",
            Command::RaiseLadder => "Raise ladder",
            Command::LowerLadder => "Lower ladder",
            Command::ExtendLadder => "Extend ladder",
            Command::RetractLadder => "Reduce ladder",
            Command::MoveForward => "Move forward",
            Command::MoveBackward => "Move backward",
            Command::ResetView => "Reset view params",
            Command::AzimuthIncrease => "Increase theta",
            Command::AzimuthDecrease => "Decrease theta",
            Command::ElevationIncrease => "Increase gamma",
            Command::ElevationDecrease => "Decrease gamma",
            Command::ToggleBeacon => "Toggle top light",
            Command::ToggleLeftBlinker => "Toggle left blinker",
            Command::ToggleRightBlinker => "Toggle right blinker",
            Command::ToggleDangerLights => "Toggle danger lights",
        }
    }

    pub fn from_name(name: &str) -> Option<Command> {
        Command::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Events delivered by an input source
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Key press, by symbolic key name (`"q"`, `" "`, `"ArrowUp"`)
    Key(String),
    /// Scroll wheel, positive zooms out
    Wheel(f32),
    /// The output surface changed size
    Resize { width: u32, height: u32 },
}

/// Applies input events to a `SceneState`
#[derive(Debug, Clone, Default)]
pub struct InputController {
    keymap: Keymap,
}

impl InputController {
    pub fn new(keymap: Keymap) -> Self {
        Self { keymap }
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Apply one event. Returns the command a key press mapped to, if any.
    pub fn handle(&self, state: &mut SceneState, event: &InputEvent) -> Option<Command> {
        match event {
            InputEvent::Key(key) => {
                let Some(command) = self.keymap.lookup(key) else {
                    trace!(key = key.as_str(), "unbound key");
                    return None;
                };
                self.apply(state, command);
                Some(command)
            }
            InputEvent::Wheel(delta) => {
                state.camera.zoom_by(*delta);
                trace!(zoom = state.camera.zoom, "zoom changed");
                None
            }
            InputEvent::Resize { width, height } => {
                state.resize(*width, *height);
                info!(width, height, aspect = state.camera.aspect, "surface resized");
                None
            }
        }
    }

    /// Apply a command. Returns false when it was dropped (a clamped pose
    /// delta or a rejected blinker toggle).
    pub fn apply(&self, state: &mut SceneState, command: Command) -> bool {
        let display = &mut state.display;
        let pose = &mut state.pose;
        let camera = &mut state.camera;
        let lights = &mut state.lights;

        let applied = match command {
            Command::ToggleHelp => {
                display.show_help = !display.show_help;
                true
            }
            Command::ToggleQuadView => {
                display.quad = !display.quad;
                true
            }
            Command::FrontView => select(display, ViewKind::Front),
            Command::LeftView => select(display, ViewKind::Left),
            Command::TopView => select(display, ViewKind::Top),
            Command::OrbitView => select(display, ViewKind::Orbit),
            Command::ToggleWireframe => {
                display.wireframe_only = !display.wireframe_only;
                true
            }
            Command::RotateLadderCcw => {
                pose.rotate_ladder(LADDER_YAW_STEP);
                true
            }
            Command::RotateLadderCw => {
                pose.rotate_ladder(-LADDER_YAW_STEP);
                true
            }
            Command::RaiseLadder => pose.tilt_ladder(-LADDER_TILT_STEP),
            Command::LowerLadder => pose.tilt_ladder(LADDER_TILT_STEP),
            Command::ExtendLadder => pose.extend_ladder(-LADDER_EXTENSION_STEPS),
            Command::RetractLadder => pose.extend_ladder(LADDER_EXTENSION_STEPS),
            Command::MoveForward => pose.drive(-CHASSIS_STEP),
            Command::MoveBackward => pose.drive(CHASSIS_STEP),
            Command::ResetView => {
                camera.reset();
                true
            }
            Command::AzimuthIncrease => {
                camera.orbit(AZIMUTH_STEP, 0.0);
                true
            }
            Command::AzimuthDecrease => {
                camera.orbit(-AZIMUTH_STEP, 0.0);
                true
            }
            Command::ElevationIncrease => {
                camera.orbit(0.0, ELEVATION_UP_STEP);
                true
            }
            Command::ElevationDecrease => {
                camera.orbit(0.0, -ELEVATION_DOWN_STEP);
                true
            }
            Command::ToggleBeacon => {
                lights.beacon = !lights.beacon;
                true
            }
            Command::ToggleLeftBlinker => lights.toggle_blinker(Side::Left),
            Command::ToggleRightBlinker => lights.toggle_blinker(Side::Right),
            Command::ToggleDangerLights => {
                lights.danger = !lights.danger;
                true
            }
        };

        debug!(command = command.name(), applied, "command");
        applied
    }

    /// (keys, description) for every command, in help order
    pub fn help_lines(&self) -> Vec<(String, &'static str)> {
        Command::ALL
            .into_iter()
            .map(|command| {
                let keys = self
                    .keymap
                    .keys_for(command)
                    .into_iter()
                    .map(display_key)
                    .collect::<Vec<_>>()
                    .join(", ");
                (keys, command.description())
            })
            .collect()
    }
}

fn select(display: &mut DisplayState, view: ViewKind) -> bool {
    display.selected = view;
    true
}

/// Quote single-character keys the way the help panel shows them
fn display_key(key: &str) -> String {
    if key.chars().count() == 1 {
        format!("'{key}'")
    } else {
        key.to_string()
    }
}
