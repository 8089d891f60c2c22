use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

use crate::input::InputSnapshot;
use crate::options::CameraOptions;
use crate::picking::frustum::Perspective;

/// Keeps the eye off the poles, where `look_at` degenerates.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Orbit camera around a target point.
///
/// `theta` is the yaw around +Y, `phi` the elevation above the XZ plane.
/// With both zero the eye sits on +Z looking down -Z.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    /// Eye distance from the target.
    pub distance: f32,
    /// Yaw in radians.
    pub theta: f32,
    /// Elevation in radians, clamped short of the poles.
    pub phi: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    perspective: Perspective,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitCamera {
    /// Camera configured from options.
    pub fn new(options: &CameraOptions, aspect: f32) -> Self {
        Self {
            target: Vec3::from_array(options.target),
            distance: options.distance,
            theta: options.yaw_degrees.to_radians(),
            phi: options
                .pitch_degrees
                .to_radians()
                .clamp(-PITCH_LIMIT, PITCH_LIMIT),
            aspect,
            perspective: Perspective {
                fovy_radians: options.fovy.to_radians(),
                near: options.znear,
                far: options.zfar,
            },
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
            min_distance: options.min_distance,
            max_distance: options.max_distance,
        }
    }

    /// Re-read tunables from options, keeping the current pose.
    pub fn set_options(&mut self, options: &CameraOptions) {
        self.perspective = Perspective {
            fovy_radians: options.fovy.to_radians(),
            near: options.znear,
            far: options.zfar,
        };
        self.rotate_speed = options.rotate_speed;
        self.pan_speed = options.pan_speed;
        self.zoom_speed = options.zoom_speed;
        self.min_distance = options.min_distance;
        self.max_distance = options.max_distance;
        self.distance =
            self.distance.clamp(self.min_distance, self.max_distance);
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Vec3 {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        self.target
            + self.distance
                * Vec3::new(cos_phi * sin_theta, sin_phi, cos_phi * cos_theta)
    }

    /// Perspective parameters, shared with the pick pass.
    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    /// World-to-view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    /// Full-viewport projection (`[0, 1]` depth).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.perspective.fovy_radians,
            self.aspect,
            self.perspective.near,
            self.perspective.far,
        )
    }

    /// The view matrix with its translation removed, as used for the sky.
    pub fn view_direction_matrix(&self) -> Mat4 {
        let mut view = self.view_matrix();
        view.w_axis = glam::Vec4::W;
        view
    }

    /// Apply one frame of accumulated input.
    pub fn apply(&mut self, snapshot: &InputSnapshot) {
        self.theta += snapshot.rotation.x * self.rotate_speed;
        self.phi = (self.phi + snapshot.rotation.y * self.rotate_speed)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);

        if snapshot.pan != glam::Vec2::ZERO {
            let view = self.view_matrix();
            let right = Vec3::new(view.x_axis.x, view.y_axis.x, view.z_axis.x);
            let up = Vec3::new(view.x_axis.y, view.y_axis.y, view.z_axis.y);
            let scale = self.pan_speed * self.distance;
            self.target += (-right * snapshot.pan.x + up * snapshot.pan.y) * scale;
        }

        if snapshot.zoom != 0.0 {
            self.distance = (self.distance
                * snapshot.zoom.mul_add(-self.zoom_speed, 1.0).max(0.01))
            .clamp(self.min_distance, self.max_distance);
        }
    }
}
