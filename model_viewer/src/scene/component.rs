/// Component: one part or assembly of the scene tree.
///
/// A component with no children is a part (a renderable leaf); a component
/// with children is an assembly. Components live in the `ComponentTree`
/// arena and reference each other through `ComponentKey`s: the children
/// list is the only ownership path, the parent key is a plain back-reference.

use glam::{Mat4, Vec4};
use slotmap::new_key_type;

new_key_type! {
    /// Stable key for a Component within a ComponentTree.
    ///
    /// Keys stay valid for the lifetime of the tree they were issued by.
    pub struct ComponentKey;
}

/// Number of floats in a wire/patch transform (row-major 3×4 affine block)
pub const TRANSFORM_FLOAT_COUNT: usize = 12;

/// Build a 4×4 transform from a row-major 3×4 affine block.
///
/// ```text
/// [ r0, r1, r2, tx ]
/// [ r3, r4, r5, ty ]
/// [ r6, r7, r8, tz ]
/// [  0,  0,  0,  1 ]   <- implicit
/// ```
pub fn transform_from_rows(rows: &[f32; TRANSFORM_FLOAT_COUNT]) -> Mat4 {
    let mut values = [0.0f32; 16];
    values[..TRANSFORM_FLOAT_COUNT].copy_from_slice(rows);
    values[15] = 1.0;
    // Fed as columns, the rows land transposed
    Mat4::from_cols_array(&values).transpose()
}

/// An instance of a part or an assembly.
#[derive(Debug, Clone)]
pub struct Component {
    name: String,
    model_id: u32,
    color: Vec4,
    transform: Mat4,
    is_hidden: bool,
    parent: Option<ComponentKey>,
    children: Vec<ComponentKey>,
}

impl Component {
    /// Create a detached component (no parent, no children).
    pub(crate) fn new(
        name: impl Into<String>,
        model_id: u32,
        color: Vec4,
        transform: Mat4,
        is_hidden: bool,
    ) -> Self {
        Self {
            name: name.into(),
            model_id,
            color,
            transform,
            is_hidden,
            parent: None,
            children: Vec::new(),
        }
    }

    // ===== ACCESSORS =====

    /// Name in the feature tree (unique among siblings)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index into the external geometry table (meaningful on leaves only)
    pub fn model_id(&self) -> u32 {
        self.model_id
    }

    /// RGBA color, each channel in [0, 1]
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// World-space transform (rotation and translation, computed upstream)
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// The component's own hidden flag (ancestors are not consulted)
    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    /// Parent key, `None` for the root
    pub fn parent(&self) -> Option<ComponentKey> {
        self.parent
    }

    /// Child keys in document order
    pub fn children(&self) -> &[ComponentKey] {
        &self.children
    }

    /// Whether this component is a part (no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    // ===== MUTATORS (tree construction and patches) =====

    pub(crate) fn set_parent(&mut self, parent: ComponentKey) {
        self.parent = Some(parent);
    }

    pub(crate) fn push_child(&mut self, child: ComponentKey) {
        self.children.push(child);
    }

    pub(crate) fn reserve_children(&mut self, additional: usize) {
        self.children.reserve_exact(additional);
    }

    pub(crate) fn set_model_id(&mut self, model_id: u32) {
        self.model_id = model_id;
    }

    /// Store a color, clamping every channel into [0, 1].
    pub(crate) fn set_color(&mut self, color: Vec4) {
        self.color = color.clamp(Vec4::ZERO, Vec4::ONE);
    }

    pub(crate) fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    pub(crate) fn set_hidden(&mut self, is_hidden: bool) {
        self.is_hidden = is_hidden;
    }
}
