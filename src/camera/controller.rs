use glam::{Quat, Vec2, Vec3};

use crate::camera::core::Camera;
use crate::input::CameraCommand;
use crate::options::CameraOptions;

/// Radians of orbit per pixel of drag at rotate speed 1.
const ROTATE_RADIANS_PER_PIXEL: f32 = 0.01;
/// Fraction of the orbit distance panned per pixel at pan speed 1.
const PAN_DISTANCE_PER_PIXEL: f32 = 0.002;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 1000.0;

/// Orbit camera around a focus point. The focus starts at the origin.
pub struct CameraController {
    orientation: Quat,
    distance: f32,
    focus_point: Vec3,

    /// Camera derived from the orbit state.
    pub camera: Camera,

    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
}

impl CameraController {
    /// Place the camera at `options.position`, looking at the origin.
    pub fn new(options: &CameraOptions, aspect: f32) -> Self {
        let focus_point = Vec3::ZERO;
        let offset = Vec3::from(options.position) - focus_point;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let orientation =
            Quat::from_rotation_arc(Vec3::Z, offset.normalize_or(Vec3::Z));

        let camera = Camera {
            eye: focus_point + offset,
            target: focus_point,
            up: Vec3::Y,
            aspect,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };

        let mut controller = Self {
            orientation,
            distance,
            focus_point,
            camera,
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
        };
        controller.update_camera_pos();
        controller
    }

    fn update_camera_pos(&mut self) {
        let dir = self.orientation * Vec3::Z;

        self.camera.eye = self.focus_point + (dir * self.distance);
        self.camera.target = self.focus_point;
        self.camera.up = self.orientation * Vec3::Y;
    }

    /// Set the aspect ratio (width / height).
    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.aspect = aspect;
    }

    /// Pick up speed and projection changes.
    pub fn apply_options(&mut self, options: &CameraOptions) {
        self.camera.fovy = options.fovy;
        self.camera.znear = options.znear;
        self.camera.zfar = options.zfar;
        self.rotate_speed = options.rotate_speed;
        self.pan_speed = options.pan_speed;
        self.zoom_speed = options.zoom_speed;
    }

    /// Apply one pointer gesture.
    pub fn apply(&mut self, command: CameraCommand) {
        match command {
            CameraCommand::Rotate { delta } => self.rotate(delta),
            CameraCommand::Pan { delta } => self.pan(delta),
            CameraCommand::Zoom { delta } => self.zoom(delta),
        }
    }

    /// Orbit by a drag delta in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        let step = ROTATE_RADIANS_PER_PIXEL * self.rotate_speed;

        // Horizontal rotation around camera's up vector
        let up = self.orientation * Vec3::Y;
        self.orientation =
            Quat::from_axis_angle(up, -delta.x * step) * self.orientation;

        // Vertical rotation around camera's right vector
        let right = self.orientation * Vec3::X;
        self.orientation = (Quat::from_axis_angle(right, -delta.y * step)
            * self.orientation)
            .normalize();

        self.update_camera_pos();
    }

    /// Slide the focus point by a drag delta in pixels.
    pub fn pan(&mut self, delta: Vec2) {
        let right = self.orientation * Vec3::X;
        let up = self.orientation * Vec3::Y;
        let scale = self.distance * PAN_DISTANCE_PER_PIXEL * self.pan_speed;

        self.focus_point += right * (-delta.x * scale) + up * (delta.y * scale);
        self.update_camera_pos();
    }

    /// Dolly towards (positive) or away from the focus point.
    pub fn zoom(&mut self, delta: f32) {
        self.distance *= 1.0 - delta * self.zoom_speed;
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.update_camera_pos();
    }

    /// Eye position.
    pub fn position(&self) -> Vec3 {
        self.camera.eye
    }

    /// Unit view direction.
    pub fn view_direction(&self) -> Vec3 {
        self.camera.forward()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CameraController {
        CameraController::new(&CameraOptions::default(), 1.5)
    }

    #[test]
    fn starts_at_configured_position() {
        let c = controller();
        assert!((c.position() - Vec3::new(0.0, 0.0, 8.151_238)).length() < 1e-4);
        assert!((c.view_direction() - Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(c.camera.aspect, 1.5);
    }

    #[test]
    fn resize_feeds_viewport_aspect_into_projection() {
        let vp = crate::viewport::Viewport::new(1280, 720, 3.0).unwrap();
        let mut c = controller();
        c.set_aspect(vp.aspect());
        assert_eq!(c.camera.aspect, 1280.0 / 720.0);
        let expected = glam::Mat4::perspective_rh(
            75f32.to_radians(),
            1280.0 / 720.0,
            0.1,
            10_000.0,
        );
        assert!(c.camera.build_projection().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn rotation_keeps_orbit_distance() {
        let mut c = controller();
        let before = c.position().length();
        c.rotate(Vec2::new(40.0, -25.0));
        assert!((c.position().length() - before).abs() < 1e-3);
        assert!((c.view_direction() + c.position().normalize()).length() < 1e-4);
    }

    #[test]
    fn zoom_in_moves_closer_and_clamps() {
        let mut c = controller();
        let before = c.position().length();
        c.zoom(1.0);
        assert!(c.position().length() < before);
        for _ in 0..200 {
            c.zoom(5.0);
        }
        assert!(c.position().length() >= MIN_DISTANCE - 1e-5);
    }

    #[test]
    fn pan_moves_target() {
        let mut c = controller();
        c.apply(CameraCommand::Pan {
            delta: Vec2::new(10.0, 0.0),
        });
        assert!(c.camera.target.x < 0.0);
        assert!((c.view_direction() - Vec3::NEG_Z).length() < 1e-5);
    }
}
