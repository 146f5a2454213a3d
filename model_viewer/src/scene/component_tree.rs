/// ComponentTree: arena holding every Component of a decoded scene.
///
/// Uses a SlotMap for stable keys. The tree is built once by the decoder;
/// afterwards components are only mutated in place (patches), never added
/// or removed. Discarding the tree discards every component at once.

use slotmap::SlotMap;
use crate::error::{Error, Result};
use super::component::{Component, ComponentKey};

/// Path separator used for component addressing
pub const PATH_SEPARATOR: char = '/';

/// Part/assembly tree with path-based addressing.
#[derive(Debug, Clone)]
pub struct ComponentTree {
    components: SlotMap<ComponentKey, Component>,
    root: ComponentKey,
}

impl ComponentTree {
    /// Create a tree holding a single root component.
    pub(crate) fn new(root: Component) -> Self {
        let mut components = SlotMap::with_key();
        let root = components.insert(root);
        Self { components, root }
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// `parent` must have been issued by this tree.
    pub(crate) fn add_child(&mut self, parent: ComponentKey, mut child: Component) -> ComponentKey {
        debug_assert!(self.components.contains_key(parent), "unknown parent key");
        child.set_parent(parent);
        let key = self.components.insert(child);
        if let Some(parent) = self.components.get_mut(parent) {
            parent.push_child(key);
        }
        key
    }

    pub(crate) fn reserve_children(&mut self, parent: ComponentKey, additional: usize) {
        if let Some(component) = self.components.get_mut(parent) {
            component.reserve_children(additional);
        }
    }

    // ===== ACCESSORS =====

    /// Key of the root component
    pub fn root(&self) -> ComponentKey {
        self.root
    }

    /// Number of components (the root included)
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Always false: a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Get a component by key
    pub fn get(&self, key: ComponentKey) -> Option<&Component> {
        self.components.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: ComponentKey) -> Option<&mut Component> {
        self.components.get_mut(key)
    }

    /// Parent of a component (`None` for the root or an unknown key)
    pub fn parent(&self, key: ComponentKey) -> Option<ComponentKey> {
        self.components.get(key).and_then(Component::parent)
    }

    /// Children of a component in document order (empty for unknown keys)
    pub fn children(&self, key: ComponentKey) -> &[ComponentKey] {
        self.components
            .get(key)
            .map(Component::children)
            .unwrap_or(&[])
    }

    // ===== PATH ADDRESSING =====

    /// Get the descendant of `from` that exists at the given path.
    ///
    /// Each `/`-separated segment is matched exactly against the names of the
    /// current component's children; the first matching child wins.
    /// An empty segment matches a child with an empty name.
    pub fn get_child(&self, from: ComponentKey, path: &str) -> Option<ComponentKey> {
        let mut current = from;
        let mut rest = path;
        loop {
            let (name, remainder) = match rest.split_once(PATH_SEPARATOR) {
                Some((name, remainder)) => (name, Some(remainder)),
                None => (rest, None),
            };

            current = self
                .children(current)
                .iter()
                .copied()
                .find(|&child| self.components[child].name() == name)?;

            match remainder {
                Some(remainder) => rest = remainder,
                None => return Some(current),
            }
        }
    }

    /// Get the component at `path`, relative to the root
    pub fn find(&self, path: &str) -> Option<ComponentKey> {
        self.get_child(self.root, path)
    }

    /// Like `find`, but reports a missing path as `Error::PathNotFound`
    pub fn resolve(&self, path: &str) -> Result<ComponentKey> {
        self.find(path)
            .ok_or_else(|| Error::PathNotFound(path.to_string()))
    }

    /// Path of `key` relative to the root (the root itself is `""`)
    pub fn path_of(&self, key: ComponentKey) -> Option<String> {
        let mut names = Vec::new();
        let mut current = key;
        loop {
            let component = self.components.get(current)?;
            match component.parent() {
                Some(parent) => {
                    names.push(component.name());
                    current = parent;
                }
                None => break,
            }
        }
        names.reverse();
        Some(names.join("/"))
    }

    // ===== TRAVERSAL =====

    /// Whether `key` or any of its ancestors is hidden
    pub fn is_effectively_hidden(&self, key: ComponentKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            match self.components.get(k) {
                Some(component) if component.is_hidden() => return true,
                Some(component) => current = component.parent(),
                None => return false,
            }
        }
        false
    }

    /// Pre-order, left-to-right iteration over every component key
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// Iterate over the leaves (parts) in document order
    pub fn leaves(&self) -> impl Iterator<Item = ComponentKey> + '_ {
        self.depth_first()
            .filter(move |&key| self.components[key].is_leaf())
    }
}

/// Depth-first iterator over a ComponentTree (document order).
pub struct DepthFirst<'a> {
    tree: &'a ComponentTree,
    stack: Vec<ComponentKey>,
}

impl Iterator for DepthFirst<'_> {
    type Item = ComponentKey;

    fn next(&mut self) -> Option<ComponentKey> {
        let key = self.stack.pop()?;
        self.stack.extend(self.tree.children(key).iter().rev().copied());
        Some(key)
    }
}

#[cfg(test)]
#[path = "component_tree_tests.rs"]
mod tests;
