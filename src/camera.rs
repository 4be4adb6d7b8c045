//! Damped orbit camera for the tornado scene.
//!
//! Dragging feeds angular velocity; every frame the camera integrates that
//! velocity and bleeds it off by the damping factor. Zoom is disabled, the
//! radius never changes after construction.

use std::f32::consts::PI;

use glam::{Mat4, Vec3};

const POLE_MARGIN: f32 = 1e-3;

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Azimuth around +y.
    pub theta: f32,
    /// Polar angle from +y, kept off the poles.
    pub phi: f32,
    pub radius: f32,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    /// Fraction of velocity removed per frame.
    pub damping: f32,
    /// Radians of rotation per pixel dragged.
    pub sensitivity: f32,
    velocity_theta: f32,
    velocity_phi: f32,
}

impl OrbitCamera {
    /// Camera at `eye`, looking at the origin.
    pub fn looking_at_origin(eye: Vec3, aspect: f32) -> Self {
        let radius = eye.length().max(1e-4);
        Self {
            theta: eye.x.atan2(eye.z),
            phi: (eye.y / radius).clamp(-1.0, 1.0).acos(),
            radius,
            fov_y: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            aspect,
            damping: 0.05,
            sensitivity: 0.005,
            velocity_theta: 0.0,
            velocity_phi: 0.0,
        }
    }

    /// The tornado's starting view.
    pub fn tornado(aspect: f32) -> Self {
        Self::looking_at_origin(Vec3::new(1.2, -0.5, -0.1), aspect)
    }

    pub fn eye(&self) -> Vec3 {
        let (sp, cp) = self.phi.sin_cos();
        let (st, ct) = self.theta.sin_cos();
        Vec3::new(sp * st, cp, sp * ct) * self.radius
    }

    /// Feed a pointer drag in pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.velocity_theta -= dx * self.sensitivity;
        self.velocity_phi -= dy * self.sensitivity;
    }

    /// Integrate one frame of damped motion.
    pub fn update(&mut self) {
        self.theta += self.velocity_theta;
        self.phi = (self.phi + self.velocity_phi).clamp(POLE_MARGIN, PI - POLE_MARGIN);
        let keep = 1.0 - self.damping;
        self.velocity_theta *= keep;
        self.velocity_phi *= keep;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}
