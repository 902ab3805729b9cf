/// The fire truck as a fixed tree of scoped transforms
///
/// Every node opens a scope on the `TransformStack`, applies its steps in
/// order (translations, rotations, joints), draws its part if it has one,
/// visits its children and closes the scope. Part scales are applied by the
/// `PartDrawer` and never leak into children.
use std::collections::BTreeSet;

use nalgebra::{Matrix4, Vector3};

use crate::part::{ColorRule, PartDescriptor, PartDrawer};
use crate::render::{Color, PrimitiveKind, Renderer};
use crate::state::{Pose, Side};
use crate::transform::{Axis, TransformStack};

pub const LADDER_SEGMENTS: usize = 8;
/// Torus major radius of the wheels
pub const WHEEL_RADIUS: f32 = 0.8;
/// Torus tube radius of the wheels
pub const WHEEL_WIDTH: f32 = 0.2;
/// Floor tiles per side
pub const FLOOR_TILES: usize = 26;

const BASE_Y: f32 = 2.5;
const LOWER_Y: f32 = -1.0;
const WHEEL_Y: f32 = -1.5;
const FRONT_WHEEL_X: f32 = -3.0;
const BACK_WHEEL_X: f32 = 5.0;
const WHEEL_Z: f32 = 2.3;
const WINDOW_Y: f32 = 0.5;
const HUB_DIAMETER: f32 = (WHEEL_RADIUS - WHEEL_WIDTH) * 2.0;

const FLOOR_LIGHT: PartDescriptor =
    PartDescriptor::boxed("floor-tile", [1.0, 0.1, 1.0], Color::rgb(0.8, 0.8, 0.8));
const FLOOR_DARK: PartDescriptor =
    PartDescriptor::boxed("floor-tile", [1.0, 0.1, 1.0], Color::rgb(0.3, 0.3, 0.3));

const CHASSIS_BASE: PartDescriptor =
    PartDescriptor::boxed("chassis-base", [14.0, 0.5, 5.0], Color::RED);
const FRONT_BUMPER: PartDescriptor =
    PartDescriptor::boxed("front-bumper", [0.5, 1.5, 5.0], Color::WHITE);
const POST_BUMPER: PartDescriptor =
    PartDescriptor::boxed("post-bumper", [3.0, 1.5, 5.0], Color::WHITE);
const WHEEL_SUPPORT: PartDescriptor = PartDescriptor::boxed(
    "wheel-support",
    [2.0, 1.5, 5.0 - 2.0 * WHEEL_WIDTH],
    Color::RED,
);
const MIDDLE_PART: PartDescriptor =
    PartDescriptor::boxed("middle-part", [6.0, 1.5, 5.0], Color::WHITE);
const REAR_BUMPER: PartDescriptor =
    PartDescriptor::boxed("rear-bumper", [1.5, 1.5, 5.0], Color::WHITE);
const WHEEL: PartDescriptor = PartDescriptor::new(
    "wheel",
    PrimitiveKind::Torus,
    [1.0, 1.0, 1.0],
    Color::BLACK,
    Color::WHITE,
);
const HUB: PartDescriptor = PartDescriptor::new(
    "hub",
    PrimitiveKind::Cylinder,
    [HUB_DIAMETER, 5.0, HUB_DIAMETER],
    Color::BLACK,
    Color::GREY,
);

const CABIN: PartDescriptor = PartDescriptor::boxed("cabin-box", [4.0, 5.0, 5.0], Color::RED);
const MIRROR_SUPPORT: PartDescriptor =
    PartDescriptor::boxed("mirror-support", [0.3, 0.1, 0.6], Color::BLACK);
const MIRROR: PartDescriptor = PartDescriptor::boxed("mirror", [0.3, 0.3, 0.6], Color::BLACK);
const MIRROR_GLASS: PartDescriptor =
    PartDescriptor::boxed("mirror-glass", [0.09, 0.24, 0.6], Color::CYAN);
const BEACON: PartDescriptor =
    PartDescriptor::boxed("beacon", [1.0, 0.5, 1.0], Color::WHITE).with_rule(ColorRule::Beacon);
const FRONT_WINDOW: PartDescriptor =
    PartDescriptor::boxed("front-window", [0.1, 2.0, 4.5], Color::CYAN);
const SIDE_WINDOW: PartDescriptor =
    PartDescriptor::boxed("side-window", [1.5, 2.0, 0.1], Color::CYAN);
const HEADLIGHT: PartDescriptor = PartDescriptor::new(
    "headlight",
    PrimitiveKind::Sphere,
    [0.5, 0.5, 0.5],
    Color::YELLOW,
    Color::YELLOW,
);
const LEFT_BLINKER: PartDescriptor =
    PartDescriptor::boxed("left-blinker", [0.3, 0.3, 0.3], Color::WHITE)
        .with_rule(ColorRule::Blinker(Side::Left));
const RIGHT_BLINKER: PartDescriptor =
    PartDescriptor::boxed("right-blinker", [0.3, 0.3, 0.3], Color::WHITE)
        .with_rule(ColorRule::Blinker(Side::Right));

const LOAD_BED: PartDescriptor = PartDescriptor::boxed("load-bed", [9.0, 4.5, 4.5], Color::RED);
const PLATFORM: PartDescriptor = PartDescriptor::new(
    "platform",
    PrimitiveKind::Cylinder,
    [3.0, 1.0, 3.0],
    Color::BLACK,
    Color::ORANGE,
);
const SUPPORT_BOX: PartDescriptor =
    PartDescriptor::boxed("support-box", [2.0, 1.15, 2.0], Color::GREY);
const LOWER_RAIL: PartDescriptor =
    PartDescriptor::boxed("lower-rail", [10.0, 0.5, 0.5], Color::GREY);
const UPPER_RAIL: PartDescriptor =
    PartDescriptor::boxed("upper-rail", [10.0, 0.5, 0.5], Color::GREY);
const LOWER_RUNG: PartDescriptor =
    PartDescriptor::boxed("lower-rung", [0.25, 0.25, 2.0], Color::GREY);
const UPPER_RUNG: PartDescriptor =
    PartDescriptor::boxed("upper-rung", [0.25, 0.25, 2.0], Color::GREY);

/// Degrees of freedom driven by the pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    /// Translate along X by the chassis position
    ChassisTravel,
    /// Rotate about local Y by the wheel spin
    WheelSpin,
    /// Rotate about Y by the ladder base rotation
    LadderYaw,
    /// Rotate about Z by the ladder inclination
    LadderTilt,
    /// Translate along X by the ladder extension
    LadderExtension,
}

impl Joint {
    pub fn apply(self, stack: &mut TransformStack, pose: &Pose) {
        match self {
            Joint::ChassisTravel => {
                stack.translate(Vector3::new(pose.chassis_position(), 0.0, 0.0))
            }
            Joint::WheelSpin => stack.rotate(Axis::Y, pose.wheel_spin()),
            Joint::LadderYaw => stack.rotate(Axis::Y, pose.ladder_rotation()),
            Joint::LadderTilt => stack.rotate(Axis::Z, pose.ladder_inclination()),
            Joint::LadderExtension => {
                stack.translate(Vector3::new(pose.ladder_extension(), 0.0, 0.0))
            }
        }
    }
}

/// One local transform of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Translate([f32; 3]),
    Rotate(Axis, f32),
    Joint(Joint),
}

impl Step {
    fn apply(self, stack: &mut TransformStack, pose: &Pose) {
        match self {
            Step::Translate([x, y, z]) => stack.translate(Vector3::new(x, y, z)),
            Step::Rotate(axis, degrees) => stack.rotate(axis, degrees),
            Step::Joint(joint) => joint.apply(stack, pose),
        }
    }
}

/// A scope in the hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: &'static str,
    pub steps: Vec<Step>,
    pub part: Option<PartDescriptor>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn group(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
            part: None,
            children: Vec::new(),
        }
    }

    pub fn leaf(part: PartDescriptor) -> Self {
        Self {
            part: Some(part),
            ..Self::group(part.name)
        }
    }

    pub fn translate(mut self, x: f32, y: f32, z: f32) -> Self {
        self.steps.push(Step::Translate([x, y, z]));
        self
    }

    pub fn rotate(mut self, axis: Axis, degrees: f32) -> Self {
        self.steps.push(Step::Rotate(axis, degrees));
        self
    }

    pub fn joint(mut self, joint: Joint) -> Self {
        self.steps.push(Step::Joint(joint));
        self
    }

    pub fn with(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_all(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    fn visit<R: Renderer + ?Sized>(
        &self,
        stack: &mut TransformStack,
        pose: &Pose,
        drawer: &PartDrawer<'_>,
        renderer: &mut R,
    ) {
        stack.push();
        for step in &self.steps {
            step.apply(stack, pose);
        }
        if let Some(part) = &self.part {
            drawer.draw(renderer, stack, part);
        }
        for child in &self.children {
            child.visit(stack, pose, drawer, renderer);
        }
        stack.pop();
    }

    fn locate(&self, name: &str, stack: &mut TransformStack, pose: &Pose) -> Option<Matrix4<f32>> {
        stack.scoped(|stack| {
            for step in &self.steps {
                step.apply(stack, pose);
            }
            if self.name == name {
                return Some(*stack.current());
            }
            self.children
                .iter()
                .find_map(|child| child.locate(name, stack, pose))
        })
    }

    fn for_each<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for child in &self.children {
            child.for_each(f);
        }
    }
}

fn floor() -> Node {
    let half = (FLOOR_TILES - 1) as f32 / 2.0;
    let tiles = (0..FLOOR_TILES).flat_map(move |i| {
        (0..FLOOR_TILES).map(move |j| {
            let x = i as f32 - half;
            let z = j as f32 - half;
            let tile = if ((x + z) as i32).rem_euclid(2) == 0 {
                FLOOR_LIGHT
            } else {
                FLOOR_DARK
            };
            Node::leaf(tile).translate(x, 0.0, z)
        })
    });
    Node::group("floor").with_all(tiles)
}

fn wheel(x: f32, z: f32) -> Node {
    // Lay the torus on its side, then spin it about its own axle
    Node::leaf(WHEEL)
        .translate(x, WHEEL_Y, z)
        .rotate(Axis::X, 90.0)
        .joint(Joint::WheelSpin)
}

fn hub(x: f32) -> Node {
    Node::leaf(HUB).translate(x, WHEEL_Y, 0.0).rotate(Axis::X, 90.0)
}

fn chassis() -> Node {
    Node::group("chassis")
        .translate(0.0, BASE_Y, 0.0)
        .with(Node::leaf(CHASSIS_BASE))
        .with(Node::leaf(FRONT_BUMPER).translate(-7.3, LOWER_Y, 0.0))
        .with(Node::leaf(POST_BUMPER).translate(-5.5, LOWER_Y, 0.0))
        .with(Node::leaf(WHEEL_SUPPORT).translate(FRONT_WHEEL_X, LOWER_Y, 0.0))
        .with(Node::leaf(MIDDLE_PART).translate(1.0, LOWER_Y, 0.0))
        .with(Node::leaf(WHEEL_SUPPORT).translate(BACK_WHEEL_X, LOWER_Y, 0.0))
        .with(Node::leaf(REAR_BUMPER).translate(6.75, LOWER_Y, 0.0))
        .with(
            Node::group("wheels")
                .with(wheel(FRONT_WHEEL_X, WHEEL_Z))
                .with(wheel(FRONT_WHEEL_X, -WHEEL_Z))
                .with(wheel(BACK_WHEEL_X, -WHEEL_Z))
                .with(wheel(BACK_WHEEL_X, WHEEL_Z))
                .with(hub(FRONT_WHEEL_X))
                .with(hub(BACK_WHEEL_X)),
        )
}

/// Side mirror; `side` is -1 or 1 along Z
fn mirror(side: f32) -> Node {
    Node::group("mirror")
        .translate(-2.0, 0.0, 2.8 * side)
        .with(Node::leaf(MIRROR_SUPPORT))
        .with(
            Node::leaf(MIRROR)
                .translate(0.0, 0.0, 0.6 * side)
                .with(Node::leaf(MIRROR_GLASS).translate(0.3, 0.0, 0.0)),
        )
}

fn cabin() -> Node {
    Node::group("cabin")
        .translate(-4.75, 5.25, 0.0)
        .with(Node::leaf(CABIN))
        .with(mirror(-1.0))
        .with(mirror(1.0))
        .with(Node::leaf(BEACON).translate(-1.0, 2.75, 0.0))
        .with(Node::leaf(FRONT_WINDOW).translate(-2.0, WINDOW_Y, 0.0))
        .with(Node::leaf(SIDE_WINDOW).translate(-1.0, WINDOW_Y, 2.5))
        .with(Node::leaf(SIDE_WINDOW).translate(-1.0, WINDOW_Y, -2.5))
        .with(Node::leaf(HEADLIGHT).translate(-2.0, -1.5, -2.0))
        .with(Node::leaf(HEADLIGHT).translate(-2.0, -1.5, 2.0))
        .with(Node::leaf(LEFT_BLINKER).translate(-2.0, -2.25, -2.4))
        .with(Node::leaf(RIGHT_BLINKER).translate(-2.0, -2.25, 2.4))
}

fn rungs(part: PartDescriptor, first_x: f32, y: f32) -> impl Iterator<Item = Node> {
    (0..LADDER_SEGMENTS).map(move |i| Node::leaf(part).translate(first_x + i as f32, y, 0.0))
}

fn ladder() -> Node {
    let extension = Node::group("ladder-extension")
        .joint(Joint::LadderExtension)
        .with(Node::leaf(UPPER_RAIL).translate(-7.0, 1.25, 1.0))
        .with(Node::leaf(UPPER_RAIL).translate(-7.0, 1.25, -1.0))
        .with_all(rungs(UPPER_RUNG, -11.0, 1.25));

    let tilt = Node::group("ladder-tilt")
        .joint(Joint::LadderTilt)
        .with(Node::leaf(LOWER_RAIL).translate(-5.0, 0.75, 1.0))
        .with(Node::leaf(LOWER_RAIL).translate(-5.0, 0.75, -1.0))
        .with_all(rungs(LOWER_RUNG, -9.0, 0.75))
        .with(extension);

    Node::group("ladder-yaw")
        .translate(2.5, 2.75, 0.0)
        .joint(Joint::LadderYaw)
        .with(Node::leaf(PLATFORM).rotate(Axis::Y, 90.0))
        .with(Node::leaf(SUPPORT_BOX).translate(0.0, 1.1, 0.0))
        .with(tilt)
}

fn vehicle() -> Node {
    Node::group("vehicle")
        .joint(Joint::ChassisTravel)
        .with(chassis())
        .with(cabin())
        .with(
            Node::group("load-bed-group")
                .translate(2.25, 5.0, 0.0)
                .with(Node::leaf(LOAD_BED))
                .with(ladder()),
        )
}

/// The scene hierarchy: floor plus vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    root: Node,
}

impl Assembly {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Checkerboard floor and the ladder truck
    pub fn fire_truck() -> Self {
        Self::new(Node::group("scene").with(floor()).with(vehicle()))
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Walk the hierarchy and draw every part. The stack comes back at the
    /// depth it had on entry.
    pub fn draw<R: Renderer + ?Sized>(
        &self,
        stack: &mut TransformStack,
        pose: &Pose,
        drawer: &PartDrawer<'_>,
        renderer: &mut R,
    ) {
        self.root.visit(stack, pose, drawer, renderer);
    }

    /// Primitive kinds the hierarchy draws
    pub fn primitives(&self) -> BTreeSet<PrimitiveKind> {
        self.parts().into_iter().map(|p| p.primitive).collect()
    }

    /// Parts in draw order
    pub fn parts(&self) -> Vec<&PartDescriptor> {
        let mut parts = Vec::new();
        self.root.for_each(&mut |node| {
            if let Some(part) = &node.part {
                parts.push(part);
            }
        });
        parts
    }

    /// Transform in effect inside the first node called `name` (after its
    /// own steps, before its part scale), relative to the scene root
    pub fn transform_of(&self, name: &str, pose: &Pose) -> Option<Matrix4<f32>> {
        let mut stack = TransformStack::new();
        self.root.locate(name, &mut stack, pose)
    }
}

impl Default for Assembly {
    fn default() -> Self {
        Self::fire_truck()
    }
}
