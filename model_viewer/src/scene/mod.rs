//! Scene module: the component hierarchy and everything that mutates it.
//!
//! Decoding the binary scene format, path addressing, visibility
//! classification, and property patches.

mod component;
mod component_tree;
mod decoder;
mod visibility;
mod patch;

pub use component::{Component, ComponentKey, transform_from_rows, TRANSFORM_FLOAT_COUNT};
pub use component_tree::{ComponentTree, DepthFirst, PATH_SEPARATOR};
pub use decoder::{
    decode_scene, SceneDecoder, DecoderConfig, ByteOrder,
    NODE_HEADER_SIZE, DEFAULT_MAX_DEPTH,
};
pub use visibility::VisibilityIndex;
pub use patch::{
    apply_patch, apply_patches,
    ComponentPatch, PatchEffects, PatchFailure, PatchReport,
};
