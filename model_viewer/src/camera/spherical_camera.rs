/// SphericalCamera: orbiting viewpoint around the origin.
///
/// The state is a Cartesian position plus the angles derived from it:
/// radius `R = |position|`, elevation `phi = asin(y / R)` and azimuth
/// `theta`, with
///
/// ```text
/// x =  R cos(theta) cos(phi)
/// y =  R sin(phi)
/// z = -R sin(theta) cos(phi)
/// ```
///
/// Orbit and zoom only change the state. The translation and rotation
/// matrices are refreshed explicitly with `set_translation()` and
/// `set_rotation()`, so a caller can batch several moves before paying
/// for the trigonometry.

use std::f32::consts::FRAC_PI_2;
use glam::{Mat4, Vec3};
use crate::error::{Error, Result};

/// Elevation stays this far from the poles, where theta is undefined.
pub const PHI_MARGIN: f32 = 1.0e-3;

/// Largest elevation an orbit can reach
pub const PHI_LIMIT: f32 = FRAC_PI_2 - PHI_MARGIN;

/// Construction parameters for a SphericalCamera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCameraDesc {
    /// Initial position; its length is the initial radius
    pub position: Vec3,
    /// Zoom never brings the camera closer than this
    pub minimum_radius: f32,
    /// Radians per input unit for orbit, world units per wheel unit for zoom
    pub sensitivity: f32,
}

impl Default for SphericalCameraDesc {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            minimum_radius: 1.0,
            sensitivity: 0.01,
        }
    }
}

/// Camera orbiting the origin on a sphere of variable radius.
#[derive(Debug, Clone)]
pub struct SphericalCamera {
    position: Vec3,
    radius: f32,
    phi: f32,
    theta: f32,
    minimum_radius: f32,
    sensitivity: f32,
    translation: Mat4,
    rotation: Mat4,
}

impl SphericalCamera {
    /// Create a camera and compute its initial matrices.
    ///
    /// Fails with `InvalidCameraConfiguration` when the position is at the
    /// origin, the radius is below `minimum_radius`, or any value is not finite.
    pub fn new(desc: SphericalCameraDesc) -> Result<Self> {
        let SphericalCameraDesc { position, minimum_radius, sensitivity } = desc;

        if !position.is_finite() || !minimum_radius.is_finite() || !sensitivity.is_finite() {
            return Err(Error::InvalidCameraConfiguration(format!(
                "non-finite parameter (position {}, minimum radius {}, sensitivity {})",
                position, minimum_radius, sensitivity
            )));
        }
        if minimum_radius <= 0.0 {
            return Err(Error::InvalidCameraConfiguration(format!(
                "minimum radius must be positive, got {}",
                minimum_radius
            )));
        }

        let radius = position.length();
        if radius < minimum_radius {
            return Err(Error::InvalidCameraConfiguration(format!(
                "distance from the origin {} is less than the minimum radius {}",
                radius, minimum_radius
            )));
        }

        let (phi, theta) = derive_angles(position, radius);
        let mut camera = Self {
            position,
            radius,
            phi,
            theta,
            minimum_radius,
            sensitivity,
            translation: Mat4::IDENTITY,
            rotation: Mat4::IDENTITY,
        };
        camera.set_translation();
        camera.set_rotation();
        Ok(camera)
    }

    // ===== MOVEMENT =====

    /// Orbit around the origin by a pointer delta, keeping the radius.
    ///
    /// `theta -= sensitivity * delta_x`, `phi -= sensitivity * delta_y`.
    /// The elevation is clamped short of the poles. Matrices are not refreshed.
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        let theta = self.theta - self.sensitivity * delta_x;
        let phi = (self.phi - self.sensitivity * delta_y).clamp(-PHI_LIMIT, PHI_LIMIT);

        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        self.position = Vec3::new(
            self.radius * cos_theta * cos_phi,
            self.radius * sin_phi,
            -self.radius * sin_theta * cos_phi,
        );

        let (phi, theta) = derive_angles(self.position, self.radius);
        self.phi = phi;
        self.theta = theta;
    }

    /// Move along the view direction by `delta_radius`.
    ///
    /// The new radius never drops below the minimum radius. Angles are
    /// unchanged. Returns the resulting radius. Matrices are not refreshed.
    pub fn zoom(&mut self, delta_radius: f32) -> f32 {
        if !delta_radius.is_finite() {
            return self.radius;
        }
        let radius = (self.radius + delta_radius).max(self.minimum_radius);
        self.position *= radius / self.radius;
        self.radius = radius;
        radius
    }

    // ===== MATRIX REFRESH =====

    /// Write the current position into the translation column: `(-x, -y, z)`.
    pub fn set_translation(&mut self) {
        self.translation.w_axis.x = -self.position.x;
        self.translation.w_axis.y = -self.position.y;
        self.translation.w_axis.z = self.position.z;
    }

    /// Write the current angles into the 3×3 rotation block.
    ///
    /// ```text
    /// | -cos(t)         0        -sin(t)        |
    /// | -cos(t) sin(p)  cos(p)    sin(t) sin(p) |
    /// | -cos(t) cos(p) -sin(p)    sin(t) cos(p) |
    /// ```
    pub fn set_rotation(&mut self) {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let r = &mut self.rotation;

        r.x_axis.x = -cos_theta;
        r.y_axis.x = 0.0;
        r.z_axis.x = -sin_theta;

        r.x_axis.y = -cos_theta * sin_phi;
        r.y_axis.y = cos_phi;
        r.z_axis.y = sin_theta * sin_phi;

        r.x_axis.z = -cos_theta * cos_phi;
        r.y_axis.z = -sin_phi;
        r.z_axis.z = sin_theta * cos_phi;
    }

    /// Refresh both matrices
    pub fn refresh_matrices(&mut self) {
        self.set_translation();
        self.set_rotation();
    }

    // ===== GETTERS =====

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Elevation in radians
    pub fn phi(&self) -> f32 {
        self.phi
    }

    /// Azimuth in radians
    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn minimum_radius(&self) -> f32 {
        self.minimum_radius
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Translation matrix as of the last `set_translation()`
    pub fn translation(&self) -> &Mat4 {
        &self.translation
    }

    /// Rotation matrix as of the last `set_rotation()`
    pub fn rotation(&self) -> &Mat4 {
        &self.rotation
    }

    /// Combined view matrix (rotation * translation).
    pub fn view_matrix(&self) -> Mat4 {
        self.rotation * self.translation
    }

    // ===== SETTERS =====

    /// Change the input sensitivity. Non-finite values are ignored.
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        if sensitivity.is_finite() {
            self.sensitivity = sensitivity;
        }
    }
}

/// Recover `(phi, theta)` from a position on a sphere of `radius`.
///
/// `theta` uses `atan2(-z, x)`, which agrees with `asin(-z / (R cos(phi)))`
/// on `[-pi/2, pi/2]` and keeps the quadrant outside it.
fn derive_angles(position: Vec3, radius: f32) -> (f32, f32) {
    let phi = (position.y / radius).clamp(-1.0, 1.0).asin();
    let theta = (-position.z).atan2(position.x);
    (phi, theta)
}

#[cfg(test)]
#[path = "spherical_camera_tests.rs"]
mod tests;
