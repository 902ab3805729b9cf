/// Camera rig: fixed and orbiting views sharing one orthographic projection
use nalgebra::{Matrix4, Point3, Vector3};

/// Distance of every camera eye from the origin
pub const DIST: f32 = 10.0;
pub const DEFAULT_ZOOM: f32 = 10.0;
pub const NEAR: f32 = -100.0;
pub const FAR: f32 = 100.0;
pub const MIN_ELEVATION: f32 = 0.0;
pub const MAX_ELEVATION: f32 = 89.0;

/// The four views the rig provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Front,
    Left,
    Top,
    Orbit,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [ViewKind::Front, ViewKind::Left, ViewKind::Top, ViewKind::Orbit];

    pub fn label(self) -> &'static str {
        match self {
            ViewKind::Front => "front",
            ViewKind::Left => "left",
            ViewKind::Top => "top",
            ViewKind::Orbit => "orbit",
        }
    }
}

/// View matrices for every `ViewKind` plus the shared projection state
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub zoom: f32,
    pub aspect: f32,
    azimuth: f32,
    elevation: f32,
    orbit_eye: Point3<f32>,
    front: Matrix4<f32>,
    left: Matrix4<f32>,
    top: Matrix4<f32>,
    orbit: Matrix4<f32>,
}

fn look_at(eye: Point3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::look_at_rh(&eye, &Point3::origin(), &up)
}

fn default_orbit_eye() -> Point3<f32> {
    Point3::new(DIST, DIST, DIST)
}

impl CameraRig {
    pub fn new() -> Self {
        let orbit_eye = default_orbit_eye();
        Self {
            zoom: DEFAULT_ZOOM,
            aspect: 1.0,
            azimuth: 0.0,
            elevation: 0.0,
            orbit_eye,
            front: look_at(Point3::new(0.0, 0.0, DIST), Vector3::y()),
            left: look_at(Point3::new(-DIST, 0.0, 0.0), Vector3::y()),
            top: look_at(Point3::new(0.0, DIST, 0.0), -Vector3::z()),
            orbit: look_at(orbit_eye, Vector3::y()),
        }
    }

    pub fn view(&self, kind: ViewKind) -> &Matrix4<f32> {
        match kind {
            ViewKind::Front => &self.front,
            ViewKind::Left => &self.left,
            ViewKind::Top => &self.top,
            ViewKind::Orbit => &self.orbit,
        }
    }

    /// Symmetric orthographic projection sized by zoom and aspect
    pub fn projection(&self) -> Matrix4<f32> {
        let half_height = self.zoom;
        let half_width = self.aspect * self.zoom;
        Matrix4::new_orthographic(-half_width, half_width, -half_height, half_height, NEAR, FAR)
    }

    /// Recompute the aspect ratio from surface dimensions
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Scale zoom by `1 + delta / 1000`. Deltas that would make the zoom
    /// non-positive are ignored.
    pub fn zoom_by(&mut self, delta: f32) {
        let zoom = self.zoom * (1.0 + delta / 1000.0);
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        }
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn orbit_eye(&self) -> Point3<f32> {
        self.orbit_eye
    }

    /// Move the orbit camera. Azimuth is unbounded, elevation is clamped to
    /// `[MIN_ELEVATION, MAX_ELEVATION]` so the eye never crosses the pole.
    pub fn orbit(&mut self, azimuth_delta: f32, elevation_delta: f32) {
        self.azimuth += azimuth_delta;
        self.elevation = (self.elevation + elevation_delta).clamp(MIN_ELEVATION, MAX_ELEVATION);

        let (az_sin, az_cos) = self.azimuth.to_radians().sin_cos();
        let el_sin = self.elevation.to_radians().sin();
        self.orbit_eye = Point3::new(DIST * az_sin, DIST * el_sin, DIST * az_cos);
        self.orbit = look_at(self.orbit_eye, Vector3::y());
    }

    /// Restore the default orbit eye, orbit angles and zoom
    pub fn reset(&mut self) {
        self.azimuth = 0.0;
        self.elevation = 0.0;
        self.zoom = DEFAULT_ZOOM;
        self.orbit_eye = default_orbit_eye();
        self.orbit = look_at(self.orbit_eye, Vector3::y());
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eye_of(view: &Matrix4<f32>) -> Point3<f32> {
        let inverse = view.try_inverse().unwrap();
        inverse.transform_point(&Point3::origin())
    }

    #[test]
    fn test_fixed_views_place_eye() {
        let rig = CameraRig::new();
        assert!((eye_of(rig.view(ViewKind::Front)) - Point3::new(0.0, 0.0, DIST)).norm() < 1e-4);
        assert!((eye_of(rig.view(ViewKind::Left)) - Point3::new(-DIST, 0.0, 0.0)).norm() < 1e-4);
        assert!((eye_of(rig.view(ViewKind::Top)) - Point3::new(0.0, DIST, 0.0)).norm() < 1e-4);
        assert!((eye_of(rig.view(ViewKind::Orbit)) - Point3::new(DIST, DIST, DIST)).norm() < 1e-3);
    }

    #[test]
    fn test_top_view_up_is_negative_z() {
        let rig = CameraRig::new();
        // A point toward -Z appears above the screen centre
        let p = rig.view(ViewKind::Top).transform_point(&Point3::new(0.0, 0.0, -1.0));
        assert!(p.y > 0.99);
    }

    #[test]
    fn test_projection_bounds() {
        let mut rig = CameraRig::new();
        rig.resize(200.0, 100.0);
        assert!((rig.aspect - 2.0).abs() < 1e-6);

        let projection = rig.projection();
        let corner = projection.transform_point(&Point3::new(20.0, 10.0, 0.0));
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_resize_ignores_empty_surface() {
        let mut rig = CameraRig::new();
        rig.resize(0.0, 0.0);
        assert_eq!(rig.aspect, 1.0);
    }

    #[test]
    fn test_zoom_by_wheel_delta() {
        let mut rig = CameraRig::new();
        rig.zoom_by(100.0);
        assert!((rig.zoom - 11.0).abs() < 1e-5);
        rig.zoom_by(-5000.0);
        assert!((rig.zoom - 11.0).abs() < 1e-5);
    }

    #[test]
    fn test_orbit_eye_follows_angles() {
        let mut rig = CameraRig::new();
        rig.orbit(90.0, 0.0);
        let eye = rig.orbit_eye();
        assert!((eye - Point3::new(DIST, 0.0, 0.0)).norm() < 1e-4);
        assert!((eye_of(rig.view(ViewKind::Orbit)) - eye).norm() < 1e-3);
    }

    #[test]
    fn test_elevation_clamps() {
        let mut rig = CameraRig::new();
        for _ in 0..20 {
            rig.orbit(0.0, 10.0);
        }
        assert_eq!(rig.elevation(), MAX_ELEVATION);
        rig.orbit(0.0, -200.0);
        assert_eq!(rig.elevation(), MIN_ELEVATION);
    }

    #[test]
    fn test_reset_after_azimuth_changes() {
        let mut rig = CameraRig::new();
        for _ in 0..5 {
            rig.orbit(1.0, 0.0);
        }
        rig.zoom_by(250.0);
        rig.reset();
        assert_eq!(rig.azimuth(), 0.0);
        assert_eq!(rig.elevation(), 0.0);
        assert_eq!(rig.zoom, DEFAULT_ZOOM);
        assert_eq!(rig.orbit_eye(), Point3::new(DIST, DIST, DIST));
    }

    proptest! {
        #[test]
        fn prop_elevation_stays_in_range(deltas in prop::collection::vec(
            prop_oneof![Just(10.0f32), Just(-1.0f32), -100.0f32..100.0], 0..200)
        ) {
            let mut rig = CameraRig::new();
            for d in deltas {
                rig.orbit(0.0, d);
                prop_assert!(rig.elevation() >= MIN_ELEVATION);
                prop_assert!(rig.elevation() <= MAX_ELEVATION);
            }
        }
    }
}
