//! Orbit camera using dolly
//!
//! Produces the eye/target pose compared by the accumulation controller and
//! the matrices that go into the renderer's frame uniforms. No smoothing
//! drivers are used: an untouched rig yields bit-identical poses every
//! frame, so idle frames keep accumulating.

use dolly::prelude::*;
use glam::{Mat4, Vec3};

use crate::accumulation::CameraPose;

const MIN_DISTANCE: f32 = 0.1;
const MAX_DISTANCE: f32 = 5000.0;

/// Orbit camera rig around a look-at target
pub struct OrbitCamera {
    rig: CameraRig,
    /// Vertical FOV in degrees
    pub fov: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
}

impl OrbitCamera {
    /// Camera at `eye` looking at `target`.
    pub fn look_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let dir = offset.normalize_or(Vec3::Z);
        let yaw = dir.x.atan2(dir.z).to_degrees();
        let pitch = (-dir.y).clamp(-1.0, 1.0).asin().to_degrees();

        let rig = CameraRig::builder()
            .with(Position::new(mint::Point3 { x: target.x, y: target.y, z: target.z }))
            .with(YawPitch::new().yaw_degrees(yaw).pitch_degrees(pitch))
            .with(Arm::new(mint::Vector3 { x: 0.0, y: 0.0, z: distance }))
            .build();

        Self {
            rig,
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Orbit around target (drag)
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        let sensitivity = 0.5;
        self.rig
            .driver_mut::<YawPitch>()
            .rotate_yaw_pitch(-delta_x * sensitivity, -delta_y * sensitivity);
    }

    /// Screen-space pan of the target (shift+drag)
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let right: Vec3 = self.rig.final_transform.right();
        let up: Vec3 = self.rig.final_transform.up();
        let sensitivity = 0.002 * self.distance();
        let offset = right * (-delta_x * sensitivity) + up * (delta_y * sensitivity);

        let position = &mut self.rig.driver_mut::<Position>().position;
        position.x += offset.x;
        position.y += offset.y;
        position.z += offset.z;
    }

    /// Zoom (scroll)
    pub fn zoom(&mut self, delta: f32) {
        let arm = self.rig.driver_mut::<Arm>();
        let current = arm.offset.z;
        let sensitivity = 0.0002 * current.max(1.0);
        let factor = 1.0 - delta * sensitivity;
        arm.offset.z = (current * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Current distance from target
    pub fn distance(&self) -> f32 {
        self.rig.driver::<Arm>().offset.z
    }

    /// Apply driver changes (call once per frame before reading the pose)
    pub fn update(&mut self, dt: f32) {
        self.rig.update(dt);
    }

    /// Camera position
    pub fn eye(&self) -> Vec3 {
        let p = self.rig.final_transform.position;
        Vec3::new(p.x, p.y, p.z)
    }

    /// Orbit pivot
    pub fn target(&self) -> Vec3 {
        let p = self.rig.driver::<Position>().position;
        Vec3::new(p.x, p.y, p.z)
    }

    /// Unit view direction
    pub fn forward(&self) -> Vec3 {
        self.rig.final_transform.forward()
    }

    /// Eye/target snapshot for change detection
    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.eye(), self.target())
    }

    /// View matrix
    pub fn view_matrix(&self) -> Mat4 {
        let t = &self.rig.final_transform;
        let pos = self.eye();
        let fwd: Vec3 = t.forward();
        let up: Vec3 = t.up();
        Mat4::look_at_rh(pos, pos + fwd, up)
    }

    /// Projection matrix (0..1 depth)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far)
    }

    /// Inverse of projection * view; maps clip space back to world space
    pub fn inverse_view_projection(&self, aspect: f32) -> Mat4 {
        (self.projection_matrix(aspect) * self.view_matrix()).inverse()
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::look_at(Vec3::new(-1.0, 4.0, 10.0), Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_at_places_eye() {
        let eye = Vec3::new(-1.0, 4.0, 10.0);
        let cam = OrbitCamera::look_at(eye, Vec3::ZERO);
        assert!((cam.eye() - eye).length() < 1e-3, "eye = {:?}", cam.eye());
        assert!((cam.forward() - (-eye).normalize()).length() < 1e-3);
        assert_eq!(cam.target(), Vec3::ZERO);
    }

    #[test]
    fn test_idle_pose_is_stable() {
        let mut cam = OrbitCamera::default();
        let before = cam.pose();
        for _ in 0..10 {
            cam.update(1.0 / 60.0);
        }
        assert!(cam.pose().same_as(&before));
    }

    #[test]
    fn test_orbit_moves_eye_not_target() {
        let mut cam = OrbitCamera::default();
        let before = cam.pose();
        cam.orbit(10.0, 0.0);
        cam.update(1.0 / 60.0);
        let after = cam.pose();
        assert!(!after.same_as(&before));
        assert_eq!(after.target, before.target);
        assert!((cam.distance() - (after.eye - after.target).length()).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut cam = OrbitCamera::default();
        cam.zoom(1.0e9);
        assert_eq!(cam.distance(), MIN_DISTANCE);
    }

    #[test]
    fn test_inverse_view_projection_center_ray() {
        let cam = OrbitCamera::default();
        let ivp = cam.inverse_view_projection(16.0 / 9.0);
        let near = ivp.project_point3(Vec3::new(0.0, 0.0, 0.0));
        let far = ivp.project_point3(Vec3::new(0.0, 0.0, 0.5));
        let dir = (far - near).normalize();
        assert!((dir - cam.forward()).length() < 1e-2);
    }
}
