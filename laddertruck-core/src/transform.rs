/// 3D transformation matrices and the scoped transform stack
use nalgebra::{Matrix4, Unit, Vector3};

/// Principal axis for elementary rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Unit<Vector3<f32>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

/// Transform builder for elementary 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation about a principal axis, counter-clockwise when looking down
    /// the positive axis toward the origin (right-handed)
    pub fn rotation_matrix(axis: Axis, degrees: f32) -> Matrix4<f32> {
        Matrix4::from_axis_angle(&axis.unit(), degrees.to_radians())
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Inverse-transpose of a model-view matrix, used to carry normals.
    /// Singular inputs (a zero scale) fall back to the identity.
    pub fn normal_matrix(model_view: &Matrix4<f32>) -> Matrix4<f32> {
        model_view
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity)
    }
}

/// LIFO stack of composed transforms.
///
/// Every composition operator right-multiplies the current matrix, so the
/// operation issued last is the one applied first to a primitive's vertices.
/// A node therefore issues translate, then rotate, then scale.
#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Matrix4<f32>,
    saved: Vec<Matrix4<f32>>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            current: Matrix4::identity(),
            saved: Vec::with_capacity(16),
        }
    }

    /// Reset the stack to a single base matrix (usually a view matrix)
    pub fn load(&mut self, base: Matrix4<f32>) {
        self.current = base;
        self.saved.clear();
    }

    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restore the matrix saved by the matching `push`.
    ///
    /// # Panics
    ///
    /// Panics when there is no outstanding `push`. An unbalanced pop means the
    /// traversal is wrong and the frame must not continue with corrupt geometry.
    pub fn pop(&mut self) {
        match self.saved.pop() {
            Some(previous) => self.current = previous,
            None => panic!("TransformStack::pop called without a matching push"),
        }
    }

    /// Number of outstanding pushes
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.current *= Matrix4::new_translation(&offset);
    }

    pub fn rotate(&mut self, axis: Axis, degrees: f32) {
        self.current *= Transform::rotation_matrix(axis, degrees);
    }

    pub fn scale(&mut self, factors: Vector3<f32>) {
        self.current *= Matrix4::new_nonuniform_scaling(&factors);
    }

    pub fn current(&self) -> &Matrix4<f32> {
        &self.current
    }

    /// Run `f` between a push and its matching pop
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push();
        let result = f(self);
        self.pop();
        result
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}
