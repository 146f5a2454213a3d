/// VisibilityIndex: cached classification of the tree's leaves.
///
/// Holds, in document order, the parts that should be drawn (not hidden, no
/// hidden ancestor) and the parts that are currently hidden. The index does
/// not own components; it stores keys into the ComponentTree.
///
/// A single dirty flag marks the cache stale. Whoever drives the frame loop
/// checks `is_dirty()` once per frame and calls `rebuild()` (or `refresh()`),
/// so any number of invalidations between two frames costs one rebuild.

use super::component::ComponentKey;
use super::component_tree::ComponentTree;

/// Visible/hidden leaf lists with a coalesced dirty flag.
#[derive(Debug, Clone)]
pub struct VisibilityIndex {
    visible: Vec<ComponentKey>,
    hidden: Vec<ComponentKey>,
    dirty: bool,
}

impl VisibilityIndex {
    /// Create an empty index, dirty so the first frame builds it
    pub fn new() -> Self {
        Self {
            visible: Vec::new(),
            hidden: Vec::new(),
            dirty: true,
        }
    }

    /// Recompute both lists from scratch.
    ///
    /// A hidden component excludes its whole subtree from the visible list,
    /// regardless of the descendants' own flags. Leaves excluded that way
    /// land in the hidden list. Does not touch the dirty flag.
    pub fn rebuild(&mut self, tree: &ComponentTree) {
        self.visible.clear();
        self.hidden.clear();

        let mut stack = vec![(tree.root(), false)];
        while let Some((key, hidden_by_ancestor)) = stack.pop() {
            let Some(component) = tree.get(key) else {
                continue;
            };
            let hidden = hidden_by_ancestor || component.is_hidden();

            if component.is_leaf() {
                if hidden {
                    self.hidden.push(key);
                } else {
                    self.visible.push(key);
                }
            } else {
                stack.extend(component.children().iter().rev().map(|&child| (child, hidden)));
            }
        }

        crate::mv_debug!(
            "mv::VisibilityIndex",
            "Rebuilt: {} visible, {} hidden parts",
            self.visible.len(),
            self.hidden.len()
        );
    }

    /// Rebuild if dirty, then clear the flag. Returns whether a rebuild happened.
    pub fn refresh(&mut self, tree: &ComponentTree) -> bool {
        if !self.dirty {
            return false;
        }
        self.rebuild(tree);
        self.dirty = false;
        true
    }

    // ===== DIRTY FLAG =====

    /// Whether the cached lists are stale
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the cached lists stale
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Mark the cached lists up to date
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    // ===== ACCESSORS =====

    /// Parts to draw, in document order
    pub fn visible(&self) -> &[ComponentKey] {
        &self.visible
    }

    /// Parts hidden directly or by an ancestor, in document order
    pub fn hidden(&self) -> &[ComponentKey] {
        &self.hidden
    }

    /// Whether `key` is in the visible list
    pub fn is_visible(&self, key: ComponentKey) -> bool {
        self.visible.contains(&key)
    }

    /// Whether `key` is classified at all (visible or hidden leaf)
    pub fn contains(&self, key: ComponentKey) -> bool {
        self.is_visible(key) || self.hidden.contains(&key)
    }
}

impl Default for VisibilityIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod tests;
