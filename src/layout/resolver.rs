//! Dependency ordering for anchored elements
//!
//! An element is resolved only after every sibling it anchors to. The
//! traversal is depth-first and visits each element at most once per pass.
//! A cycle is closed with whatever geometry the anchor currently holds
//! (zero on a fresh scene), unless cycle rejection is enabled.

use std::collections::HashSet;

use log::{debug, trace, warn};

use super::error::LayoutError;
use super::scene::{ElementId, Scene};
use super::types::Side;

/// Per-pass traversal state. Create one per layout or preferred-size pass.
#[derive(Debug, Default)]
pub(crate) struct Resolver {
    visited: HashSet<ElementId>,
    /// Elements whose anchors are still being resolved
    stack: Vec<ElementId>,
    reject_cycles: bool,
}

impl Resolver {
    pub(crate) fn new(reject_cycles: bool) -> Self {
        Self {
            reject_cycles,
            ..Self::default()
        }
    }

    /// Resolve `element`'s anchors, then call `resolve` on it. Does nothing
    /// if the element was already visited in this pass.
    pub(crate) fn visit<F>(
        &mut self,
        scene: &mut Scene,
        container: ElementId,
        element: ElementId,
        resolve: &mut F,
    ) -> Result<(), LayoutError>
    where
        F: FnMut(&mut Scene, ElementId) -> Result<(), LayoutError>,
    {
        if self.visited.contains(&element) {
            if let Some(start) = self.stack.iter().position(|e| *e == element) {
                let mut cycle: Vec<String> = self.stack[start..]
                    .iter()
                    .map(|id| scene.node(*id).label(*id))
                    .collect();
                cycle.push(scene.node(element).label(element));
                if self.reject_cycles {
                    return Err(LayoutError::circular(cycle));
                }
                warn!(
                    "anchor cycle {} resolved with unresolved geometry",
                    cycle.join(" -> ")
                );
            }
            return Ok(());
        }
        self.visited.insert(element);

        fix_anchors(scene, container, element);

        let anchors = scene
            .constraint(element)
            .map(|c| c.anchors())
            .unwrap_or_default();
        self.stack.push(element);
        for anchor in anchors {
            if scene.parent(anchor) == Some(container) {
                trace!("{} waits for anchor {}", element, anchor);
                self.visit(scene, container, anchor, resolve)?;
            }
        }
        self.stack.pop();

        resolve(scene, element)
    }
}

/// Point every anchor of `element` at a live child of `container`.
///
/// An anchor that moved to another container is replaced by the sibling with
/// the same name, then by the sibling at the same index, and dropped if
/// neither exists.
pub fn fix_anchors(scene: &mut Scene, container: ElementId, element: ElementId) {
    for side in Side::CLOCKWISE {
        let Some(anchor) = scene.constraint(element).and_then(|c| c.edge(side).anchor) else {
            continue;
        };
        if scene.parent(anchor) == Some(container) {
            continue;
        }

        let replacement = rehome(scene, container, anchor);
        debug!(
            "{} anchor of {} moved out of {}: now {:?}",
            side, element, container, replacement
        );
        if let Some(set) = scene.constraint_mut(element) {
            set.edge_mut(side).anchor = replacement;
        }
    }
}

fn rehome(scene: &Scene, container: ElementId, anchor: ElementId) -> Option<ElementId> {
    let node = scene.get(anchor)?;
    if let Some(name) = node.name.as_deref().filter(|n| !n.is_empty()) {
        if let Some(found) = scene.find_child_by_name(container, name) {
            return Some(found);
        }
    }
    let index = scene.index_of(anchor)?;
    scene.child_at(container, index)
}

/// All elements `element` depends on through anchors, transitively
pub fn dependencies(scene: &Scene, element: ElementId) -> HashSet<ElementId> {
    let mut deps = HashSet::new();
    collect_dependencies(scene, element, &mut deps);
    deps
}

fn collect_dependencies(scene: &Scene, element: ElementId, deps: &mut HashSet<ElementId>) {
    let Some(set) = scene.constraint(element) else {
        return;
    };
    for anchor in set.anchors() {
        if deps.insert(anchor) {
            collect_dependencies(scene, anchor, deps);
        }
    }
}

/// True if `element` depends on itself through its anchors
pub fn has_circular_dependency(scene: &Scene, element: ElementId) -> bool {
    dependencies(scene, element).contains(&element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::Size;

    fn visit_order(scene: &mut Scene, container: ElementId) -> Vec<ElementId> {
        let mut order = Vec::new();
        let mut resolver = Resolver::new(false);
        for child in scene.children(container).to_vec() {
            resolver
                .visit(scene, container, child, &mut |_, e| {
                    order.push(e);
                    Ok(())
                })
                .unwrap();
        }
        order
    }

    #[test]
    fn test_anchor_resolved_first() {
        let mut scene = Scene::new();
        let root = scene.add_container(100, 100);
        let a = scene.add_element(root, Size::default());
        let b = scene.add_element(root, Size::default());
        scene.edge_mut(a, Side::Left).anchor(Some(b));

        assert_eq!(visit_order(&mut scene, root), vec![b, a]);
    }

    #[test]
    fn test_each_element_visited_once() {
        let mut scene = Scene::new();
        let root = scene.add_container(100, 100);
        let a = scene.add_element(root, Size::default());
        let b = scene.add_element(root, Size::default());
        let c = scene.add_element(root, Size::default());
        scene.edge_mut(b, Side::Top).anchor(Some(a));
        scene.edge_mut(c, Side::Top).anchor(Some(a));
        scene.edge_mut(c, Side::Left).anchor(Some(b));

        assert_eq!(visit_order(&mut scene, root), vec![a, b, c]);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut scene = Scene::new();
        let root = scene.add_container(100, 100);
        let a = scene.add_element(root, Size::default());
        let b = scene.add_element(root, Size::default());
        scene.edge_mut(a, Side::Left).anchor(Some(b));
        scene.edge_mut(b, Side::Left).anchor(Some(a));

        assert_eq!(visit_order(&mut scene, root), vec![b, a]);
        assert!(has_circular_dependency(&scene, a));
    }

    #[test]
    fn test_cycle_rejected_when_configured() {
        let mut scene = Scene::new();
        let root = scene.add_container(100, 100);
        let a = scene.add_named(root, "a", Size::default());
        let b = scene.add_named(root, "b", Size::default());
        scene.edge_mut(a, Side::Left).anchor(Some(b));
        scene.edge_mut(b, Side::Left).anchor(Some(a));

        let mut resolver = Resolver::new(true);
        let err = resolver
            .visit(&mut scene, root, a, &mut |_, _| Ok(()))
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::circular(vec!["a".into(), "b".into(), "a".into()])
        );
    }

    #[test]
    fn test_rehome_by_name() {
        let mut scene = Scene::new();
        let old = scene.add_container(100, 100);
        let root = scene.add_container(100, 100);
        let stale = scene.add_named(old, "header", Size::default());
        let _other = scene.add_element(root, Size::default());
        let header = scene.add_named(root, "header", Size::default());
        let a = scene.add_element(root, Size::default());
        scene.edge_mut(a, Side::Top).anchor(Some(stale));

        fix_anchors(&mut scene, root, a);
        assert_eq!(scene.constraint(a).unwrap().edge(Side::Top).anchor, Some(header));
    }

    #[test]
    fn test_rehome_by_index_then_drop() {
        let mut scene = Scene::new();
        let old = scene.add_container(100, 100);
        let root = scene.add_container(100, 100);
        let _first = scene.add_element(old, Size::default());
        let stale = scene.add_element(old, Size::default());
        let far = scene.add_element(old, Size::default());
        let _far_sibling = scene.add_element(old, Size::default());
        let target = scene.add_element(root, Size::default());
        let a = scene.add_element(root, Size::default());
        scene.edge_mut(a, Side::Top).anchor(Some(stale));
        scene.edge_mut(a, Side::Bottom).anchor(Some(far));

        fix_anchors(&mut scene, root, a);
        let set = scene.constraint(a).unwrap();
        // index 1 exists in `root` (it is `a` itself), index 2 does not
        assert_eq!(set.edge(Side::Top).anchor, Some(a));
        assert_eq!(set.edge(Side::Bottom).anchor, None);
        assert_ne!(set.edge(Side::Top).anchor, Some(target));
    }

    #[test]
    fn test_detached_anchor_dropped() {
        let mut scene = Scene::new();
        let root = scene.add_container(100, 100);
        let gone = scene.add_element(root, Size::default());
        let a = scene.add_element(root, Size::default());
        scene.edge_mut(a, Side::Left).anchor(Some(gone));
        scene.detach(gone);

        fix_anchors(&mut scene, root, a);
        assert_eq!(scene.constraint(a).unwrap().edge(Side::Left).anchor, None);
    }

    #[test]
    fn test_transitive_dependencies() {
        let mut scene = Scene::new();
        let root = scene.add_container(100, 100);
        let a = scene.add_element(root, Size::default());
        let b = scene.add_element(root, Size::default());
        let c = scene.add_element(root, Size::default());
        scene.edge_mut(c, Side::Top).anchor(Some(b));
        scene.edge_mut(b, Side::Top).anchor(Some(a));

        let deps = dependencies(&scene, c);
        assert_eq!(deps, HashSet::from([a, b]));
        assert!(!has_circular_dependency(&scene, c));
    }
}
