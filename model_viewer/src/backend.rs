/// ViewerBackend trait - the GPU side of the viewer
///
/// The viewer decides what to draw and when; a backend turns those
/// decisions into API calls (buffer uploads, uniform writes, draw calls).
/// Parts are identified by their ComponentKey, which stays stable for the
/// lifetime of a scene.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use crate::error::Result;
use crate::light::Light;
use crate::scene::ComponentKey;

// ============================================================================
// Backend trait
// ============================================================================

/// Rendering backend driven by the Viewer.
///
/// Every call may fail with `Error::BackendError`; the viewer logs and
/// propagates it.
pub trait ViewerBackend {
    /// Upload (or replace) the geometry of a part from the model table
    fn upload_model(&mut self, part: ComponentKey, model_id: u32) -> Result<()>;

    /// Set the view translation and rotation matrices
    fn set_view(&mut self, translation: &Mat4, rotation: &Mat4) -> Result<()>;

    /// Set the projection matrix
    fn set_projection(&mut self, projection: &Mat4) -> Result<()>;

    /// Set the light colors (the ambient color is also the clear color)
    fn set_light(&mut self, light: &Light) -> Result<()>;

    /// Draw one part with its transform and color
    fn draw_part(&mut self, part: ComponentKey, transform: &Mat4, color: Vec4) -> Result<()>;
}

// ============================================================================
// Uniform packing
// ============================================================================

/// Camera matrices laid out for a single uniform buffer write.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ViewUniforms {
    pub translation: Mat4,
    pub rotation: Mat4,
    pub projection: Mat4,
}

impl ViewUniforms {
    /// Size in bytes of the packed uniforms
    pub const SIZE: usize = std::mem::size_of::<ViewUniforms>();

    pub fn new(translation: Mat4, rotation: Mat4, projection: Mat4) -> Self {
        Self { translation, rotation, projection }
    }

    /// Raw bytes, column-major, in field order
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
