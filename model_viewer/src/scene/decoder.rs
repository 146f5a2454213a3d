//! Binary scene decoder.
//!
//! Turns the compact scene payload sent by the server into a
//! [`ComponentTree`]. The payload is a pre-order serialization of the tree;
//! every component is laid out as:
//!
//! ```text
//! modelID       u32                  4 bytes
//! name length   u8                   1 byte
//! name          bytes                0..=255 bytes
//! color         4 × u8 (RGBA / 255)  4 bytes
//! transform     12 × f32 (3×4 rows)  48 bytes
//! isHidden      u8 (1 = hidden)      1 byte
//! child count   u16                  2 bytes
//! children      child count components, recursively
//! ```
//!
//! Decoding is a single forward pass: the cursor only ever advances, and any
//! read past the end of the buffer fails with `Error::TruncatedInput`. No
//! partial tree is returned on failure.

use glam::{Mat4, Vec4};
use crate::error::{Error, Result};
use super::component::{transform_from_rows, Component, ComponentKey, TRANSFORM_FLOAT_COUNT};
use super::component_tree::ComponentTree;

/// Fixed-size part of an encoded component (everything except the name bytes
/// and the children)
pub const NODE_HEADER_SIZE: usize = 4 + 1 + 4 + TRANSFORM_FLOAT_COUNT * 4 + 1 + 2;

/// Default nesting limit (root = level 1)
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Byte order of multi-byte fields in the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Network order, as written by the scene server
    #[default]
    BigEndian,
    /// Little-endian producers
    LittleEndian,
}

/// Decoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Byte order of u16/u32/f32 fields (must match the producer)
    pub byte_order: ByteOrder,
    /// Maximum nesting depth; deeper payloads fail with `NestingTooDeep`
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Decode a scene payload with the default configuration
pub fn decode_scene(data: &[u8]) -> Result<ComponentTree> {
    SceneDecoder::new(data, DecoderConfig::default()).decode()
}

/// Explicit decoding context: the buffer and a forward-only cursor.
pub struct SceneDecoder<'a> {
    data: &'a [u8],
    cursor: usize,
    config: DecoderConfig,
}

impl<'a> SceneDecoder<'a> {
    /// Create a decoder positioned at the start of `data`
    pub fn new(data: &'a [u8], config: DecoderConfig) -> Self {
        Self { data, cursor: 0, config }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Decode the whole tree, consuming the decoder.
    pub fn decode(mut self) -> Result<ComponentTree> {
        match self.decode_tree() {
            Ok(tree) => {
                if self.remaining() > 0 {
                    crate::mv_warn!(
                        "mv::Decoder",
                        "Ignoring {} trailing bytes after the root component",
                        self.remaining()
                    );
                }
                crate::mv_debug!(
                    "mv::Decoder",
                    "Decoded {} components from {} bytes",
                    tree.len(),
                    self.cursor
                );
                Ok(tree)
            }
            Err(error) => {
                crate::mv_error!("mv::Decoder", "Scene decoding failed: {}", error);
                Err(error)
            }
        }
    }

    fn decode_tree(&mut self) -> Result<ComponentTree> {
        let (root, child_count) = self.read_component(1)?;
        let mut tree = ComponentTree::new(root);
        let root_key = tree.root();
        self.read_children(&mut tree, root_key, child_count, 1)?;
        Ok(tree)
    }

    fn read_children(
        &mut self,
        tree: &mut ComponentTree,
        parent: ComponentKey,
        child_count: usize,
        depth: usize,
    ) -> Result<()> {
        // Every declared child needs at least a full header
        self.require(child_count * NODE_HEADER_SIZE)?;
        tree.reserve_children(parent, child_count);

        for _ in 0..child_count {
            let (child, grandchildren) = self.read_component(depth + 1)?;
            let key = tree.add_child(parent, child);
            self.read_children(tree, key, grandchildren, depth + 1)?;
        }
        Ok(())
    }

    /// Read one component's own fields; returns it with its declared child count.
    fn read_component(&mut self, depth: usize) -> Result<(Component, usize)> {
        if depth > self.config.max_depth {
            return Err(Error::NestingTooDeep { limit: self.config.max_depth });
        }
        self.require(NODE_HEADER_SIZE)?;

        let model_id = self.read_u32()?;
        let name = self.read_name()?;
        let color = self.read_color()?;
        let transform = self.read_transform()?;
        let is_hidden = self.read_u8()? == 1;
        let child_count = self.read_u16()? as usize;

        crate::mv_trace!(
            "mv::Decoder",
            "Component '{}' (model {}, {} children) at depth {}",
            name, model_id, child_count, depth
        );

        Ok((Component::new(name, model_id, color, transform, is_hidden), child_count))
    }

    fn read_name(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        let bytes = self.take(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn read_color(&mut self) -> Result<Vec4> {
        let [r, g, b, a] = self.read_array::<4>()?;
        Ok(Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0)
    }

    fn read_transform(&mut self) -> Result<Mat4> {
        let mut rows = [0.0f32; TRANSFORM_FLOAT_COUNT];
        for value in rows.iter_mut() {
            *value = self.read_f32()?;
        }
        Ok(transform_from_rows(&rows))
    }

    // ===== PRIMITIVE READS =====

    /// Fail unless `len` bytes are available, without advancing
    fn require(&self, len: usize) -> Result<()> {
        let available = self.remaining();
        if len > available {
            return Err(Error::TruncatedInput {
                offset: self.cursor,
                needed: len,
                available,
            });
        }
        Ok(())
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        self.require(len)?;
        let data: &'a [u8] = self.data;
        let bytes = &data[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn read_u8(&mut self) -> Result<u8> {
        let [value] = self.read_array::<1>()?;
        Ok(value)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_array::<2>()?;
        Ok(match self.config.byte_order {
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
        })
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_array::<4>()?;
        Ok(match self.config.byte_order {
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
        })
    }

    fn read_f32(&mut self) -> Result<f32> {
        let bytes = self.read_array::<4>()?;
        Ok(match self.config.byte_order {
            ByteOrder::BigEndian => f32::from_be_bytes(bytes),
            ByteOrder::LittleEndian => f32::from_le_bytes(bytes),
        })
    }
}

#[cfg(test)]
#[path = "decoder_tests.rs"]
mod tests;
