/// Viewer - owns a decoded scene and drives a backend frame by frame
///
/// Every derived artifact (visibility lists, camera uniforms, light
/// uniforms) has one pending flag. Mutations only raise flags; the work is
/// done once in `render_frame()`, no matter how many mutations happened in
/// between. Pointer input is the exception: orbit and zoom refresh the
/// camera matrices and push them immediately.
///
/// Geometry upload is split in two. Parts visible at creation are uploaded
/// right away, hidden parts are queued and uploaded after the first frame
/// has been drawn.

use bitflags::bitflags;
use rustc_hash::FxHashSet;
use crate::backend::{ViewerBackend, ViewUniforms};
use crate::camera::{PerspectiveProjection, Projection, SphericalCamera, SphericalCameraDesc};
use crate::error::{Error, Result};
use crate::light::Light;
use crate::scene::{self, ComponentKey, ComponentPatch, ComponentTree, PatchReport, VisibilityIndex};

bitflags! {
    /// Derived state that must be recomputed or re-sent at the next frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FrameInvalidation: u8 {
        /// Visible/hidden part lists are stale
        const VISIBILITY = 1 << 0;
        /// Projection and view matrices must be re-sent
        const CAMERA     = 1 << 1;
        /// Light colors must be re-sent
        const LIGHT      = 1 << 2;
    }
}

// ============================================================================
// ViewerDesc
// ============================================================================

/// Everything needed to create a Viewer
#[derive(Debug, Clone)]
pub struct ViewerDesc {
    /// Decoded component hierarchy
    pub scene: ComponentTree,
    /// Number of entries in the geometry table; every leaf must index into it
    pub model_count: u32,
    pub camera: SphericalCameraDesc,
    pub projection: PerspectiveProjection,
    pub light: Light,
}

impl ViewerDesc {
    /// Scene and model table with default camera, projection and light
    pub fn new(scene: ComponentTree, model_count: u32) -> Self {
        Self {
            scene,
            model_count,
            camera: SphericalCameraDesc::default(),
            projection: PerspectiveProjection::default(),
            light: Light::default(),
        }
    }
}

// ============================================================================
// Viewer
// ============================================================================

/// Interactive viewer over one scene and one backend.
pub struct Viewer<B: ViewerBackend> {
    backend: B,
    tree: ComponentTree,
    model_count: u32,
    visibility: VisibilityIndex,
    camera: SphericalCamera,
    projection: PerspectiveProjection,
    light: Light,
    pending: FrameInvalidation,
    pending_uploads: FxHashSet<ComponentKey>,
    frame_count: u64,
}

impl<B: ViewerBackend> Viewer<B> {
    /// Create a viewer and push its initial state to the backend.
    ///
    /// Sends light, projection and view, uploads every visible part, and
    /// queues the hidden ones. Fails if a leaf references a model outside
    /// the table or the camera description is invalid.
    pub fn new(desc: ViewerDesc, mut backend: B) -> Result<Self> {
        let ViewerDesc { scene, model_count, camera, projection, light } = desc;

        validate_models(&scene, model_count).map_err(Self::log_and_return_error)?;
        let camera = SphericalCamera::new(camera).map_err(Self::log_and_return_error)?;

        let mut visibility = VisibilityIndex::new();
        visibility.refresh(&scene);

        backend.set_light(&light).map_err(Self::log_and_return_error)?;
        backend
            .set_projection(&projection.projection_matrix())
            .map_err(Self::log_and_return_error)?;
        backend
            .set_view(camera.translation(), camera.rotation())
            .map_err(Self::log_and_return_error)?;

        for &key in visibility.visible() {
            if let Some(component) = scene.get(key) {
                backend
                    .upload_model(key, component.model_id())
                    .map_err(Self::log_and_return_error)?;
            }
        }
        let pending_uploads: FxHashSet<ComponentKey> = visibility.hidden().iter().copied().collect();

        crate::mv_info!(
            "mv::Viewer",
            "Viewer created: {} components, {} visible parts, {} deferred uploads",
            scene.len(),
            visibility.visible().len(),
            pending_uploads.len()
        );

        Ok(Self {
            backend,
            tree: scene,
            model_count,
            visibility,
            camera,
            projection,
            light,
            pending: FrameInvalidation::empty(),
            pending_uploads,
            frame_count: 0,
        })
    }

    /// Swap in a new scene. Every leaf is uploaded again during the next frame.
    pub fn replace_scene(&mut self, scene: ComponentTree) -> Result<()> {
        validate_models(&scene, self.model_count).map_err(Self::log_and_return_error)?;

        self.pending_uploads = scene.leaves().collect();
        self.tree = scene;
        self.visibility = VisibilityIndex::new();
        self.pending |= FrameInvalidation::VISIBILITY;

        crate::mv_info!("mv::Viewer", "Scene replaced: {} components", self.tree.len());
        Ok(())
    }

    // ===== SCENE MUTATION =====

    /// Apply a batch of property patches.
    ///
    /// Failed entries are reported, not fatal. A hidden-flag change raises
    /// VISIBILITY; a model change queues the part for re-upload.
    pub fn apply_patches<I, P>(&mut self, batch: I) -> PatchReport
    where
        I: IntoIterator<Item = (P, ComponentPatch)>,
        P: AsRef<str>,
    {
        let report = scene::apply_patches(
            &mut self.tree,
            &mut self.visibility,
            batch,
            Some(self.model_count),
        );

        if report.needs_visibility_rebuild() {
            self.pending |= FrameInvalidation::VISIBILITY;
        }

        for key in report.model_changes() {
            let is_leaf = self.tree.get(key).is_some_and(|component| component.is_leaf());
            if is_leaf {
                self.pending_uploads.insert(key);
            }
        }

        report
    }

    // ===== CAMERA INPUT =====

    /// Orbit by a pointer delta and push the new view matrices.
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) -> Result<()> {
        self.camera.orbit(delta_x, delta_y);
        self.camera.refresh_matrices();
        self.push_view().map_err(Self::log_and_return_error)
    }

    /// Zoom by a wheel delta and push the new view matrices.
    ///
    /// A positive delta moves the camera closer. Returns the new radius.
    pub fn zoom(&mut self, wheel_delta: f32) -> Result<f32> {
        let delta_radius = -wheel_delta * self.camera.sensitivity();
        let radius = self.camera.zoom(delta_radius);
        self.camera.set_translation();
        self.push_view().map_err(Self::log_and_return_error)?;
        Ok(radius)
    }

    // ===== INVALIDATION =====

    /// Re-send projection and view at the next frame
    pub fn update_camera(&mut self) {
        self.pending |= FrameInvalidation::CAMERA;
    }

    /// Re-send the light at the next frame
    pub fn update_light(&mut self) {
        self.pending |= FrameInvalidation::LIGHT;
    }

    pub fn set_light(&mut self, light: Light) {
        self.light = light;
        self.update_light();
    }

    pub fn set_projection(&mut self, projection: PerspectiveProjection) {
        self.projection = projection;
        self.update_camera();
    }

    /// Follow a surface resize
    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        self.projection.set_aspect_ratio(width, height);
        self.update_camera();
    }

    // ===== FRAME =====

    /// Process pending invalidations, draw the visible parts, then drain
    /// deferred uploads. Returns the invalidations handled by this frame.
    ///
    /// On a backend error the invalidations stay pending for the next frame.
    pub fn render_frame(&mut self) -> Result<FrameInvalidation> {
        let processed = std::mem::take(&mut self.pending);

        if let Err(error) = self.process_frame(processed) {
            self.pending |= processed;
            return Err(Self::log_and_return_error(error));
        }

        self.frame_count += 1;
        crate::mv_trace!(
            "mv::Viewer",
            "Frame {}: {} parts drawn, processed {:?}",
            self.frame_count,
            self.visibility.visible().len(),
            processed
        );
        Ok(processed)
    }

    fn process_frame(&mut self, processed: FrameInvalidation) -> Result<()> {
        if processed.contains(FrameInvalidation::VISIBILITY) {
            self.visibility.mark_dirty();
        }
        self.visibility.refresh(&self.tree);

        if processed.contains(FrameInvalidation::CAMERA) {
            self.backend.set_projection(&self.projection.projection_matrix())?;
            self.push_view()?;
        }
        if processed.contains(FrameInvalidation::LIGHT) {
            self.backend.set_light(&self.light)?;
        }

        // Visible parts must have geometry before they are drawn
        for &key in self.visibility.visible() {
            if self.pending_uploads.contains(&key) {
                upload(&mut self.backend, &self.tree, key)?;
                self.pending_uploads.remove(&key);
            }
        }

        for &key in self.visibility.visible() {
            if let Some(component) = self.tree.get(key) {
                self.backend
                    .draw_part(key, component.transform(), component.color())?;
            }
        }

        if !self.pending_uploads.is_empty() {
            let deferred: Vec<ComponentKey> = self
                .tree
                .leaves()
                .filter(|key| self.pending_uploads.contains(key))
                .collect();
            for key in deferred {
                upload(&mut self.backend, &self.tree, key)?;
                self.pending_uploads.remove(&key);
            }
            // Keys left over no longer belong to the tree
            self.pending_uploads.clear();
        }

        Ok(())
    }

    fn push_view(&mut self) -> Result<()> {
        self.backend.set_view(self.camera.translation(), self.camera.rotation())
    }

    // ===== GETTERS =====

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn visibility(&self) -> &VisibilityIndex {
        &self.visibility
    }

    pub fn camera(&self) -> &SphericalCamera {
        &self.camera
    }

    pub fn projection(&self) -> &PerspectiveProjection {
        &self.projection
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn model_count(&self) -> u32 {
        self.model_count
    }

    /// Invalidations waiting for the next frame
    pub fn pending(&self) -> FrameInvalidation {
        self.pending
    }

    /// Number of parts whose geometry upload is still deferred
    pub fn pending_upload_count(&self) -> usize {
        self.pending_uploads.len()
    }

    /// Whether `key` is waiting for a geometry upload
    pub fn is_upload_pending(&self, key: ComponentKey) -> bool {
        self.pending_uploads.contains(&key)
    }

    /// Frames rendered successfully so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Current camera matrices packed for a uniform buffer
    pub fn view_uniforms(&self) -> ViewUniforms {
        ViewUniforms::new(
            *self.camera.translation(),
            *self.camera.rotation(),
            self.projection.projection_matrix(),
        )
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consume the viewer and hand back the backend
    pub fn into_backend(self) -> B {
        self.backend
    }

    // ===== ERROR HANDLING =====

    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::BackendError(msg) => {
                crate::mv_error!("mv::Viewer", "Backend error: {}", msg);
            }
            _ => {
                crate::mv_error!("mv::Viewer", "Viewer error: {}", error);
            }
        }
        error
    }
}

/// Every leaf must reference a model inside the geometry table
fn validate_models(tree: &ComponentTree, model_count: u32) -> Result<()> {
    for key in tree.leaves() {
        if let Some(component) = tree.get(key) {
            let model_id = component.model_id();
            if model_id >= model_count {
                return Err(Error::ModelOutOfRange { model_id, model_count });
            }
        }
    }
    Ok(())
}

fn upload<B: ViewerBackend>(backend: &mut B, tree: &ComponentTree, key: ComponentKey) -> Result<()> {
    match tree.get(key) {
        Some(component) => backend.upload_model(key, component.model_id()),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "viewer_tests.rs"]
mod tests;
