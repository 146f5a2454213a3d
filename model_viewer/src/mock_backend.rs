/// Mock backend for unit tests (no GPU required)
///
/// Records every call in order so tests can assert on what the viewer
/// pushed and when. Uploads can be made to fail to exercise error paths.

#[cfg(test)]
use glam::{Mat4, Vec4};
#[cfg(test)]
use crate::backend::ViewerBackend;
#[cfg(test)]
use crate::error::{Error, Result};
#[cfg(test)]
use crate::light::Light;
#[cfg(test)]
use crate::scene::ComponentKey;

// ============================================================================
// Recorded calls
// ============================================================================

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    UploadModel { part: ComponentKey, model_id: u32 },
    SetView { translation: Mat4, rotation: Mat4 },
    SetProjection(Mat4),
    SetLight(Light),
    DrawPart { part: ComponentKey, transform: Mat4, color: Vec4 },
}

// ============================================================================
// Mock Backend
// ============================================================================

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockBackend {
    pub calls: Vec<BackendCall>,
    pub fail_uploads: bool,
}

#[cfg(test)]
impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Parts uploaded, in call order
    pub fn uploads(&self) -> Vec<ComponentKey> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::UploadModel { part, .. } => Some(*part),
                _ => None,
            })
            .collect()
    }

    /// Parts drawn, in call order
    pub fn draws(&self) -> Vec<ComponentKey> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::DrawPart { part, .. } => Some(*part),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }
}

#[cfg(test)]
impl ViewerBackend for MockBackend {
    fn upload_model(&mut self, part: ComponentKey, model_id: u32) -> Result<()> {
        if self.fail_uploads {
            return Err(Error::BackendError(format!("mock upload of model {} refused", model_id)));
        }
        self.calls.push(BackendCall::UploadModel { part, model_id });
        Ok(())
    }

    fn set_view(&mut self, translation: &Mat4, rotation: &Mat4) -> Result<()> {
        self.calls.push(BackendCall::SetView {
            translation: *translation,
            rotation: *rotation,
        });
        Ok(())
    }

    fn set_projection(&mut self, projection: &Mat4) -> Result<()> {
        self.calls.push(BackendCall::SetProjection(*projection));
        Ok(())
    }

    fn set_light(&mut self, light: &Light) -> Result<()> {
        self.calls.push(BackendCall::SetLight(*light));
        Ok(())
    }

    fn draw_part(&mut self, part: ComponentKey, transform: &Mat4, color: Vec4) -> Result<()> {
        self.calls.push(BackendCall::DrawPart {
            part,
            transform: *transform,
            color,
        });
        Ok(())
    }
}
