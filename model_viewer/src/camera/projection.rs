/// Projection strategies.
///
/// A projection is recomputed on demand from its parameters; nothing is
/// cached, so changing a field takes effect at the next call.

use glam::Mat4;

/// Produces the projection matrix uploaded alongside the view matrices.
pub trait Projection {
    /// Clip-space projection for the current parameters
    fn projection_matrix(&self) -> Mat4;
}

/// Perspective projection with a vertical field of view in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveProjection {
    /// Vertical field of view, degrees
    pub fov: f32,
    /// Width / height
    pub aspect_ratio: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl PerspectiveProjection {
    pub fn new(fov: f32, aspect_ratio: f32, near_plane: f32, far_plane: f32) -> Self {
        Self { fov, aspect_ratio, near_plane, far_plane }
    }

    /// Set the aspect ratio from a surface size. A zero height is ignored.
    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect_ratio = width as f32 / height as f32;
    }
}

impl Default for PerspectiveProjection {
    fn default() -> Self {
        Self {
            fov: 45.0,
            aspect_ratio: 1.0,
            near_plane: 0.1,
            far_plane: 100.0,
        }
    }
}

impl Projection for PerspectiveProjection {
    /// OpenGL-style clip space (depth in [-1, 1]).
    fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near_plane,
            self.far_plane,
        )
    }
}

#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;
