//! Host element model: an arena of boxes addressed by stable ids
//!
//! Any node can act as a container for the nodes appended to it. The layout
//! passes only read container geometry and padding, read element preferred
//! sizes and margins, and write element bounds.

use std::fmt;

use super::constraint::{ConstraintSet, EdgeConstraint};
use super::error::LayoutError;
use super::types::{Edges, Rect, Side, Size};

/// Stable handle to a node in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A box in the scene, acting as an element, a container, or both
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: Option<String>,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    /// Position relative to the parent's origin and size, written by layout
    pub bounds: Rect,
    /// Intrinsic size, margins excluded
    pub preferred: Size,
    pub margin: Edges<i32>,
    pub padding: Edges<i32>,
    pub rtl: bool,
    pub constraint: Option<ConstraintSet>,
}

impl Node {
    /// Bounds grown by the margins
    pub fn outer_bounds(&self) -> Rect {
        self.bounds.expand(&self.margin)
    }

    /// Preferred size including margins
    pub fn outer_preferred(&self) -> Size {
        Size::new(
            self.preferred.width + self.margin.horizontal(),
            self.preferred.height + self.margin.vertical(),
        )
    }

    /// Name for diagnostics, falling back to the id
    pub fn label(&self, id: ElementId) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => id.to_string(),
        }
    }
}

/// Arena of nodes. Ids are never reused, so an id stays valid for the life of the scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<Node>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parentless node with the given layout size
    pub fn add_container(&mut self, width: i32, height: i32) -> ElementId {
        self.push(Node {
            bounds: Rect::new(0, 0, width, height),
            ..Node::default()
        })
    }

    /// Add a node with the given preferred size as the last child of `parent`
    pub fn add_element(&mut self, parent: ElementId, preferred: Size) -> ElementId {
        let id = self.push(Node {
            preferred,
            ..Node::default()
        });
        self.append_child(parent, id);
        id
    }

    /// Add a named node as the last child of `parent`
    pub fn add_named(
        &mut self,
        parent: ElementId,
        name: impl Into<String>,
        preferred: Size,
    ) -> ElementId {
        let id = self.add_element(parent, preferred);
        self.nodes[id.0].name = Some(name.into());
        id
    }

    fn push(&mut self, node: Node) -> ElementId {
        self.nodes.push(node);
        ElementId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn get(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Look up a node, failing for ids from another scene
    pub fn require(&self, id: ElementId) -> Result<&Node, LayoutError> {
        self.get(id).ok_or(LayoutError::UnknownElement { id })
    }

    /// Access a node by id.
    ///
    /// Panics if `id` was not produced by this scene.
    pub fn node(&self, id: ElementId) -> &Node {
        &self.nodes[id.0]
    }

    /// Mutable access to a node by id.
    ///
    /// Panics if `id` was not produced by this scene.
    pub fn node_mut(&mut self, id: ElementId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn child_at(&self, container: ElementId, index: usize) -> Option<ElementId> {
        self.children(container).get(index).copied()
    }

    /// Position of `id` among its parent's children
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// First child of `container` carrying `name`
    pub fn find_child_by_name(&self, container: ElementId, name: &str) -> Option<ElementId> {
        self.children(container)
            .iter()
            .copied()
            .find(|c| self.node(*c).name.as_deref() == Some(name))
    }

    /// Append `child` to `parent`, removing it from its previous parent first.
    ///
    /// Panics if either id was not produced by this scene.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Move `child` into another container
    pub fn move_to(&mut self, child: ElementId, new_parent: ElementId) {
        self.append_child(new_parent, child);
    }

    /// Remove `id` from its parent. The node and its constraint stay in the arena.
    ///
    /// Panics if `id` was not produced by this scene.
    pub fn detach(&mut self, id: ElementId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
    }

    // The setters below panic on ids from another scene, like `node_mut`.

    pub fn set_name(&mut self, id: ElementId, name: impl Into<String>) {
        self.node_mut(id).name = Some(name.into());
    }

    pub fn set_margin(&mut self, id: ElementId, margin: Edges<i32>) {
        self.node_mut(id).margin = margin;
    }

    pub fn set_padding(&mut self, id: ElementId, padding: Edges<i32>) {
        self.node_mut(id).padding = padding;
    }

    pub fn constraint(&self, id: ElementId) -> Option<&ConstraintSet> {
        self.get(id).and_then(|n| n.constraint.as_ref())
    }

    pub fn constraint_mut(&mut self, id: ElementId) -> Option<&mut ConstraintSet> {
        self.get_mut(id).and_then(|n| n.constraint.as_mut())
    }

    /// The element's constraint set, created with default insets on first access.
    ///
    /// Panics if `id` was not produced by this scene.
    pub fn get_or_create_constraint(&mut self, id: ElementId) -> &mut ConstraintSet {
        self.node_mut(id)
            .constraint
            .get_or_insert_with(ConstraintSet::default)
    }

    /// Attach a constraint set to an element, replacing any previous one.
    ///
    /// The set is moved in; to give two elements the same constraints, clone it.
    /// Panics if `id` was not produced by this scene.
    pub fn install_constraint(&mut self, id: ElementId, constraint: ConstraintSet) {
        self.node_mut(id).constraint = Some(constraint);
    }

    /// Remove and return the element's constraint set
    pub fn take_constraint(&mut self, id: ElementId) -> Option<ConstraintSet> {
        self.get_mut(id).and_then(|n| n.constraint.take())
    }

    /// One edge of the element's constraint, created on first access.
    ///
    /// Panics if `id` was not produced by this scene.
    pub fn edge_mut(&mut self, id: ElementId, side: Side) -> &mut EdgeConstraint {
        self.get_or_create_constraint(id).edge_mut(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_index() {
        let mut scene = Scene::new();
        let root = scene.add_container(100, 100);
        let a = scene.add_element(root, Size::new(10, 10));
        let b = scene.add_named(root, "b", Size::new(10, 10));

        assert_eq!(scene.children(root), &[a, b]);
        assert_eq!(scene.index_of(b), Some(1));
        assert_eq!(scene.find_child_by_name(root, "b"), Some(b));
        assert_eq!(scene.find_child_by_name(root, "c"), None);
    }

    #[test]
    fn test_move_between_containers() {
        let mut scene = Scene::new();
        let first = scene.add_container(100, 100);
        let second = scene.add_container(100, 100);
        let a = scene.add_element(first, Size::default());

        scene.move_to(a, second);
        assert!(scene.children(first).is_empty());
        assert_eq!(scene.parent(a), Some(second));
        assert_eq!(scene.index_of(a), Some(0));
    }

    #[test]
    fn test_detach_keeps_node() {
        let mut scene = Scene::new();
        let root = scene.add_container(10, 10);
        let a = scene.add_element(root, Size::default());
        scene.detach(a);
        assert_eq!(scene.parent(a), None);
        assert!(scene.contains(a));
        assert_eq!(scene.index_of(a), None);
    }

    #[test]
    fn test_constraint_created_lazily() {
        let mut scene = Scene::new();
        let root = scene.add_container(10, 10);
        let a = scene.add_element(root, Size::default());
        assert!(scene.constraint(a).is_none());
        scene.get_or_create_constraint(a);
        assert!(scene.constraint(a).is_some());
    }

    #[test]
    fn test_outer_geometry() {
        let mut scene = Scene::new();
        let root = scene.add_container(10, 10);
        let a = scene.add_element(root, Size::new(20, 10));
        scene.set_margin(a, Edges::all(2));
        scene.node_mut(a).bounds = Rect::new(5, 5, 20, 10);
        assert_eq!(scene.node(a).outer_bounds(), Rect::new(3, 3, 24, 14));
        assert_eq!(scene.node(a).outer_preferred(), Size::new(24, 14));
    }

    #[test]
    #[should_panic]
    fn test_edge_mut_panics_on_foreign_id() {
        let mut scene = Scene::new();
        scene.add_container(10, 10);
        scene.edge_mut(ElementId(5), Side::Top);
    }
}
