/// Tests for ComponentTree
///
/// Path addressing, parent links, traversal order, and inherited hiding.

use super::*;
use glam::{Mat4, Vec4};

// ============================================================================
// Helper Functions
// ============================================================================

fn part(name: &str) -> Component {
    Component::new(name, 0, Vec4::ONE, Mat4::IDENTITY, false)
}

fn hidden(name: &str) -> Component {
    Component::new(name, 0, Vec4::ONE, Mat4::IDENTITY, true)
}

/// Root
/// ├── A
/// │   ├── B
/// │   │   └── C
/// │   └── D
/// └── E
struct Fixture {
    tree: ComponentTree,
    a: ComponentKey,
    b: ComponentKey,
    c: ComponentKey,
    d: ComponentKey,
    e: ComponentKey,
}

fn fixture() -> Fixture {
    let mut tree = ComponentTree::new(part("Root"));
    let root = tree.root();
    let a = tree.add_child(root, part("A"));
    let b = tree.add_child(a, part("B"));
    let c = tree.add_child(b, part("C"));
    let d = tree.add_child(a, part("D"));
    let e = tree.add_child(root, part("E"));
    Fixture { tree, a, b, c, d, e }
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_tree_has_only_root() {
    let tree = ComponentTree::new(part("Root"));
    assert_eq!(tree.len(), 1);
    assert!(!tree.is_empty());
    assert!(tree.parent(tree.root()).is_none());
    assert!(tree.children(tree.root()).is_empty());
}

#[test]
fn test_add_child_links_parent_and_order() {
    let f = fixture();
    let root = f.tree.root();

    assert_eq!(f.tree.children(root), &[f.a, f.e]);
    assert_eq!(f.tree.children(f.a), &[f.b, f.d]);
    assert_eq!(f.tree.parent(f.c), Some(f.b));
    assert_eq!(f.tree.get(f.b).unwrap().parent(), Some(f.a));
    assert!(!f.tree.get(f.a).unwrap().is_leaf());
    assert!(f.tree.get(f.c).unwrap().is_leaf());
}

// ============================================================================
// Path addressing
// ============================================================================

#[test]
fn test_find_single_segment() {
    let f = fixture();
    assert_eq!(f.tree.find("A"), Some(f.a));
    assert_eq!(f.tree.find("E"), Some(f.e));
}

#[test]
fn test_find_nested_path() {
    let f = fixture();
    assert_eq!(f.tree.find("A/B"), Some(f.b));
    assert_eq!(f.tree.find("A/B/C"), Some(f.c));
    assert_eq!(f.tree.find("A/D"), Some(f.d));
}

#[test]
fn test_find_missing_segment() {
    let f = fixture();
    assert_eq!(f.tree.find("A/Z"), None);
    assert_eq!(f.tree.find("Z"), None);
    assert_eq!(f.tree.find("A/B/C/D"), None);
    // Names only resolve among direct children
    assert_eq!(f.tree.find("B"), None);
}

#[test]
fn test_find_is_case_sensitive() {
    let f = fixture();
    assert_eq!(f.tree.find("a"), None);
    assert_eq!(f.tree.find("A/b"), None);
}

#[test]
fn test_get_child_relative_to_node() {
    let f = fixture();
    assert_eq!(f.tree.get_child(f.a, "B/C"), Some(f.c));
    assert_eq!(f.tree.get_child(f.b, "C"), Some(f.c));
    assert_eq!(f.tree.get_child(f.c, "C"), None);
}

#[test]
fn test_empty_segment_matches_empty_name() {
    let mut tree = ComponentTree::new(part("Root"));
    let root = tree.root();
    let unnamed = tree.add_child(root, part(""));
    let inner = tree.add_child(unnamed, part("Inner"));

    assert_eq!(tree.find(""), Some(unnamed));
    assert_eq!(tree.find("/Inner"), Some(inner));

    // Without an empty-named child, the empty path resolves to nothing
    let f = fixture();
    assert_eq!(f.tree.find(""), None);
    assert_eq!(f.tree.find("A/"), None);
}

#[test]
fn test_duplicate_names_resolve_to_first_match() {
    let mut tree = ComponentTree::new(part("Root"));
    let root = tree.root();
    let first = tree.add_child(root, part("Bolt"));
    let _second = tree.add_child(root, part("Bolt"));

    assert_eq!(tree.find("Bolt"), Some(first));
}

#[test]
fn test_resolve_reports_path_not_found() {
    let f = fixture();
    assert_eq!(f.tree.resolve("A/B"), Ok(f.b));
    assert_eq!(f.tree.resolve("A/Z"), Err(Error::PathNotFound("A/Z".to_string())));
}

#[test]
fn test_path_of_is_inverse_of_find() {
    let f = fixture();
    assert_eq!(f.tree.path_of(f.tree.root()).as_deref(), Some(""));
    assert_eq!(f.tree.path_of(f.c).as_deref(), Some("A/B/C"));

    for key in f.tree.depth_first().skip(1) {
        let path = f.tree.path_of(key).unwrap();
        assert_eq!(f.tree.find(&path), Some(key), "path '{}'", path);
    }
}

// ============================================================================
// Traversal
// ============================================================================

#[test]
fn test_depth_first_is_document_order() {
    let f = fixture();
    let order: Vec<ComponentKey> = f.tree.depth_first().collect();
    assert_eq!(order, vec![f.tree.root(), f.a, f.b, f.c, f.d, f.e]);
}

#[test]
fn test_leaves_in_document_order() {
    let f = fixture();
    let leaves: Vec<ComponentKey> = f.tree.leaves().collect();
    assert_eq!(leaves, vec![f.c, f.d, f.e]);
}

#[test]
fn test_is_effectively_hidden_inherits_from_ancestors() {
    let mut tree = ComponentTree::new(part("Root"));
    let root = tree.root();
    let assembly = tree.add_child(root, hidden("Assembly"));
    let inner = tree.add_child(assembly, part("Inner"));
    let sibling = tree.add_child(root, part("Sibling"));

    assert!(tree.is_effectively_hidden(assembly));
    assert!(tree.is_effectively_hidden(inner));
    assert!(!tree.get(inner).unwrap().is_hidden());
    assert!(!tree.is_effectively_hidden(sibling));
    assert!(!tree.is_effectively_hidden(root));
}
