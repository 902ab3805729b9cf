/// Laddertruck Core Library - articulated truck scene, cameras and input
///
/// This library holds the renderer-agnostic part of the ladder truck viewer:
/// the scoped transform stack, the truck hierarchy and its joints, the
/// four-view camera rig and the key-driven state machine.

pub mod assembly;
pub mod blink;
pub mod camera;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod keymap;
pub mod part;
pub mod render;
pub mod state;
pub mod transform;

// Re-export commonly used types
pub use assembly::Assembly;
pub use blink::{Clock, FixedClock, SystemClock};
pub use camera::{CameraRig, ViewKind};
pub use error::SceneError;
pub use frame::Scene;
pub use geometry::{Mesh, Triangle, Vertex};
pub use input::{Command, InputController, InputEvent};
pub use keymap::Keymap;
pub use part::{PartDescriptor, PartDrawer};
pub use render::{Color, CommandBuffer, DrawCommand, DrawMode, PrimitiveKind, Renderer, Viewport};
pub use state::{Lights, Pose, SceneState, Side};
pub use transform::{Axis, Transform, TransformStack};
