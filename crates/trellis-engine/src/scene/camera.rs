use glam::{Mat4, Vec3};

/// Orbit camera around the origin with an orthographic box.
///
/// `theta` lifts the eye, `phi` swings it around the Y axis:
/// `eye = (r·sin φ, r·sin θ, r·cos φ)`, looking at the origin with +Y up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    pub radius: f32,
    /// Radians.
    pub theta: f32,
    /// Radians.
    pub phi: f32,
    pub half_width: f32,
    pub half_height: f32,
    pub half_depth: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: 1.0,
            theta: 0.0,
            phi: 0.0,
            half_width: 1.0,
            half_height: 1.0,
            half_depth: 1.0,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.radius * self.phi.sin(),
            self.radius * self.theta.sin(),
            self.radius * self.phi.cos(),
        )
    }

    /// World-to-view transform. Degenerate eyes (at the origin, or straight above it)
    /// fall back to the identity.
    pub fn model_view(&self) -> Mat4 {
        let eye = self.eye();
        let dir = -eye;
        if dir.length_squared() <= f32::EPSILON || dir.cross(Vec3::Y).length_squared() <= f32::EPSILON {
            return Mat4::IDENTITY;
        }
        Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y)
    }

    /// Orthographic box `[-w, w] × [-h, h]` with near/far at `∓d`. Depth maps to `[0, 1]`.
    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(
            -self.half_width,
            self.half_width,
            -self.half_height,
            self.half_height,
            -self.half_depth,
            self.half_depth,
        )
    }
}
