/// Property patches: path-addressed in-place updates of components.
///
/// A patch batch maps component paths to a set of optional properties.
/// Every entry is resolved and applied independently: a path that does not
/// resolve (or a model ID outside the geometry table) fails that entry only,
/// the rest of the batch is still applied.
///
/// Only a change of the hidden flag affects visibility membership. When any
/// entry carries one, the VisibilityIndex is marked dirty; the rebuild itself
/// is left to the next frame.

use bitflags::bitflags;
use glam::Vec4;
use crate::error::{Error, Result};
use super::component::{transform_from_rows, ComponentKey, TRANSFORM_FLOAT_COUNT};
use super::component_tree::ComponentTree;
use super::visibility::VisibilityIndex;

bitflags! {
    /// What a patch (or a batch of patches) touched
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PatchEffects: u8 {
        /// Hidden flag set: visibility membership may have changed
        const VISIBILITY = 1 << 0;
        /// Color overwritten
        const COLOR      = 1 << 1;
        /// Transform overwritten
        const TRANSFORM  = 1 << 2;
        /// Model reference overwritten: geometry must be re-uploaded
        const MODEL      = 1 << 3;
    }
}

/// Optional property overrides for one component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentPatch {
    /// New geometry table index
    pub model_id: Option<u32>,
    /// New RGBA color (clamped into [0, 1] on apply)
    pub color: Option<Vec4>,
    /// New transform as a row-major 3×4 block (same layout as the wire format)
    pub transform: Option<[f32; TRANSFORM_FLOAT_COUNT]>,
    /// New hidden flag
    pub is_hidden: Option<bool>,
}

impl ComponentPatch {
    /// Empty patch (touches nothing)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model_id(mut self, model_id: u32) -> Self {
        self.model_id = Some(model_id);
        self
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_transform(mut self, rows: [f32; TRANSFORM_FLOAT_COUNT]) -> Self {
        self.transform = Some(rows);
        self
    }

    pub fn with_hidden(mut self, is_hidden: bool) -> Self {
        self.is_hidden = Some(is_hidden);
        self
    }

    /// Effects this patch has when applied
    pub fn effects(&self) -> PatchEffects {
        let mut effects = PatchEffects::empty();
        effects.set(PatchEffects::MODEL, self.model_id.is_some());
        effects.set(PatchEffects::COLOR, self.color.is_some());
        effects.set(PatchEffects::TRANSFORM, self.transform.is_some());
        effects.set(PatchEffects::VISIBILITY, self.is_hidden.is_some());
        effects
    }

    /// Whether the patch carries no property at all
    pub fn is_empty(&self) -> bool {
        self.effects().is_empty()
    }
}

/// One batch entry that could not be applied
#[derive(Debug, Clone, PartialEq)]
pub struct PatchFailure {
    /// Path as given in the batch
    pub path: String,
    /// Why the entry was rejected
    pub error: Error,
}

/// Outcome of a patch batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchReport {
    /// Union of the effects of every applied entry
    pub effects: PatchEffects,
    /// Components that were patched, with the effects of their entry
    pub applied: Vec<(ComponentKey, PatchEffects)>,
    /// Entries that were rejected
    pub failures: Vec<PatchFailure>,
}

impl PatchReport {
    /// True exactly when an applied entry set a hidden flag
    pub fn needs_visibility_rebuild(&self) -> bool {
        self.effects.contains(PatchEffects::VISIBILITY)
    }

    /// Whether every entry was applied
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Components whose model reference changed
    pub fn model_changes(&self) -> impl Iterator<Item = ComponentKey> + '_ {
        self.applied
            .iter()
            .filter(|(_, effects)| effects.contains(PatchEffects::MODEL))
            .map(|&(key, _)| key)
    }
}

/// Apply one patch to the component at `path`.
///
/// With `model_count`, a model ID outside `0..model_count` rejects the
/// whole entry before anything is written.
pub fn apply_patch(
    tree: &mut ComponentTree,
    path: &str,
    patch: &ComponentPatch,
    model_count: Option<u32>,
) -> Result<(ComponentKey, PatchEffects)> {
    let key = tree.resolve(path)?;

    if let (Some(model_id), Some(model_count)) = (patch.model_id, model_count) {
        if model_id >= model_count {
            return Err(Error::ModelOutOfRange { model_id, model_count });
        }
    }

    let component = tree
        .get_mut(key)
        .ok_or_else(|| Error::PathNotFound(path.to_string()))?;

    if let Some(model_id) = patch.model_id {
        component.set_model_id(model_id);
    }
    if let Some(color) = patch.color {
        component.set_color(color);
    }
    if let Some(rows) = &patch.transform {
        component.set_transform(transform_from_rows(rows));
    }
    if let Some(is_hidden) = patch.is_hidden {
        component.set_hidden(is_hidden);
    }

    Ok((key, patch.effects()))
}

/// Apply a batch of patches and invalidate `visibility` if needed.
///
/// Entries are applied in iteration order; later entries for the same path
/// overwrite earlier ones.
pub fn apply_patches<I, P>(
    tree: &mut ComponentTree,
    visibility: &mut VisibilityIndex,
    batch: I,
    model_count: Option<u32>,
) -> PatchReport
where
    I: IntoIterator<Item = (P, ComponentPatch)>,
    P: AsRef<str>,
{
    let mut report = PatchReport::default();

    for (path, patch) in batch {
        let path = path.as_ref();
        match apply_patch(tree, path, &patch, model_count) {
            Ok((key, effects)) => {
                report.effects |= effects;
                report.applied.push((key, effects));
            }
            Err(error) => {
                crate::mv_warn!("mv::Patch", "Skipping patch for '{}': {}", path, error);
                report.failures.push(PatchFailure {
                    path: path.to_string(),
                    error,
                });
            }
        }
    }

    if report.needs_visibility_rebuild() {
        visibility.mark_dirty();
    }

    crate::mv_debug!(
        "mv::Patch",
        "Applied {} patches ({} failed), effects {:?}",
        report.applied.len(),
        report.failures.len(),
        report.effects
    );

    report
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;
