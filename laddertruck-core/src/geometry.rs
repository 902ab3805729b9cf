/// Triangle meshes for the unit primitives
use std::f32::consts::{PI, TAU};

use nalgebra::{Point3, Vector3};

use crate::assembly::{WHEEL_RADIUS, WHEEL_WIDTH};
use crate::render::PrimitiveKind;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    fn from_parts(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }

    /// Average of the vertex normals, robust for degenerate pole triangles
    pub fn average_normal(&self) -> Vector3<f32> {
        let sum: Vector3<f32> = self.vertices.iter().map(|v| v.normal).sum();
        sum.try_normalize(1e-6).unwrap_or_else(Vector3::y)
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Two triangles for the quad a-b-c-d
    fn add_quad(&mut self, a: Vertex, b: Vertex, c: Vertex, d: Vertex) {
        self.add_triangle(Triangle::new(a, b, c));
        self.add_triangle(Triangle::new(a, c, d));
    }

    /// Mesh a renderer registers for `kind`
    pub fn for_primitive(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Cube => Self::cube(1.0),
            PrimitiveKind::Sphere => Self::sphere(0.5, 8, 12),
            PrimitiveKind::Cylinder => Self::cylinder(0.5, 1.0, 12),
            PrimitiveKind::Torus => Self::torus(WHEEL_RADIUS, WHEEL_WIDTH, 16, 8),
        }
    }

    /// Axis-aligned cube centred at the origin
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // (normal, two in-plane axes)
        let faces = [
            (Vector3::z(), Vector3::x(), Vector3::y()),
            (-Vector3::z(), Vector3::y(), Vector3::x()),
            (Vector3::y(), Vector3::z(), Vector3::x()),
            (-Vector3::y(), Vector3::x(), Vector3::z()),
            (Vector3::x(), Vector3::y(), Vector3::z()),
            (-Vector3::x(), Vector3::z(), Vector3::y()),
        ];
        for (normal, u, v) in faces {
            let centre = Point3::from(normal * half);
            let corner = |su: f32, sv: f32| {
                Vertex::from_parts(centre + u * (su * half) + v * (sv * half), normal)
            };
            mesh.add_quad(
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            );
        }

        mesh
    }

    /// UV sphere centred at the origin
    pub fn sphere(radius: f32, stacks: usize, slices: usize) -> Self {
        let mut mesh = Self::with_capacity(stacks * slices * 2);
        let vertex = |i: usize, j: usize| {
            let theta = PI * i as f32 / stacks as f32;
            let phi = TAU * j as f32 / slices as f32;
            let normal = Vector3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            Vertex::from_parts(Point3::from(normal * radius), normal)
        };
        for i in 0..stacks {
            for j in 0..slices {
                mesh.add_quad(vertex(i, j), vertex(i, j + 1), vertex(i + 1, j + 1), vertex(i + 1, j));
            }
        }
        mesh
    }

    /// Capped cylinder along Y, centred at the origin
    pub fn cylinder(radius: f32, height: f32, slices: usize) -> Self {
        let mut mesh = Self::with_capacity(slices * 4);
        let half = height / 2.0;
        let rim = |j: usize| {
            let phi = TAU * j as f32 / slices as f32;
            (phi.cos(), phi.sin())
        };
        for j in 0..slices {
            let (c0, s0) = rim(j);
            let (c1, s1) = rim(j + 1);
            let side = |c: f32, s: f32, y: f32| {
                Vertex::new(radius * c, y, radius * s, c, 0.0, s)
            };
            mesh.add_quad(side(c0, s0, -half), side(c1, s1, -half), side(c1, s1, half), side(c0, s0, half));

            for (y, ny) in [(half, 1.0), (-half, -1.0)] {
                mesh.add_triangle(Triangle::new(
                    Vertex::new(0.0, y, 0.0, 0.0, ny, 0.0),
                    Vertex::new(radius * c0, y, radius * s0, 0.0, ny, 0.0),
                    Vertex::new(radius * c1, y, radius * s1, 0.0, ny, 0.0),
                ));
            }
        }
        mesh
    }

    /// Torus around the Y axis, centred at the origin
    pub fn torus(major: f32, minor: f32, rings: usize, sides: usize) -> Self {
        let mut mesh = Self::with_capacity(rings * sides * 2);
        let vertex = |i: usize, j: usize| {
            let u = TAU * i as f32 / rings as f32;
            let v = TAU * j as f32 / sides as f32;
            let normal = Vector3::new(v.cos() * u.cos(), v.sin(), v.cos() * u.sin());
            let centre = Vector3::new(major * u.cos(), 0.0, major * u.sin());
            Vertex::from_parts(Point3::from(centre + normal * minor), normal)
        };
        for i in 0..rings {
            for j in 0..sides {
                mesh.add_quad(vertex(i, j), vertex(i + 1, j), vertex(i + 1, j + 1), vertex(i, j + 1));
            }
        }
        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
