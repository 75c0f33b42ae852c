//! Layout pass: converts edge constraints into element bounds
//!
//! For each child of a container, in order, the dependency resolver lays out the
//! elements it anchors to first, then the four insets are resolved against
//! the container frame and written back as the element's bounds.
//!
//! ## Inset arithmetic
//!
//! Every inset is the distance from a container edge to the element's outer
//! (margin) edge. It is the sum of a *base value*, taken from the anchor
//! element or the container, and the inset's own contribution:
//!
//! - `px` / `mm`: `base + magnitude`
//! - `%`: `base + p/100 * (extent - base - opposite_base)`
//! - `auto` facing `auto`: the element is centered in the remaining space
//! - `auto` facing a fixed inset: absorbs whatever the preferred size leaves over
//!
//! Values computed along the way are kept in a [`PassCache`] that the pass
//! returns; the interactive mutations in [`super::mutation`] read it.

use std::collections::HashMap;

use log::debug;

use super::config::LayoutConfig;
use super::constraint::{ConstraintSet, EdgeConstraint, Inset};
use super::error::LayoutError;
use super::resolver::Resolver;
use super::scene::{ElementId, Node, Scene};
use super::types::{Axis, Edges, Rect, Side};

/// The inner box of a container (padding removed), in container coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
    pub rtl: bool,
}

impl Frame {
    /// Frame of a container node, honoring its right-to-left flag
    pub fn of(container: &Node) -> Self {
        let padding = &container.padding;
        let rtl = container.rtl;
        Self {
            top: padding.top,
            left: padding.leading(rtl),
            bottom: container.bounds.height - padding.bottom,
            right: container.bounds.width - padding.trailing(rtl),
            rtl,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width(),
            Axis::Vertical => self.height(),
        }
    }
}

/// Values computed for one edge during a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeState {
    /// Inset contribution to the container's preferred size
    pub preferred_value: i32,
    /// Offset the inset's own magnitude is added to
    pub base_value: i32,
    /// Final inset from the container edge
    pub resolved_value: i32,
    /// An auto inset ran out of space (or the element has no preferred
    /// extent) and was floored
    pub clipped: bool,
}

/// Scratch values of one pass, keyed by element and side
#[derive(Debug, Clone, Default)]
pub struct PassCache {
    edges: HashMap<(ElementId, Side), EdgeState>,
}

impl PassCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of an edge; all zero if the pass never touched it
    pub fn get(&self, element: ElementId, side: Side) -> EdgeState {
        self.edges.get(&(element, side)).copied().unwrap_or_default()
    }

    pub fn entry(&mut self, element: ElementId, side: Side) -> &mut EdgeState {
        self.edges.entry((element, side)).or_default()
    }

    /// Resolved insets of an element
    pub fn resolved(&self, element: ElementId) -> Edges<i32> {
        Edges::from_fn(|side| self.get(element, side).resolved_value)
    }

    pub fn is_clipped(&self, element: ElementId, side: Side) -> bool {
        self.get(element, side).clipped
    }

    pub fn contains(&self, element: ElementId) -> bool {
        Side::CLOCKWISE
            .iter()
            .any(|side| self.edges.contains_key(&(element, *side)))
    }
}

/// Resolves edge constraints against a container frame
pub(crate) struct EdgeCalculator<'a> {
    pub(crate) scene: &'a Scene,
    pub(crate) frame: Frame,
    pub(crate) config: &'a LayoutConfig,
}

impl<'a> EdgeCalculator<'a> {
    pub(crate) fn new(scene: &'a Scene, frame: Frame, config: &'a LayoutConfig) -> Self {
        Self {
            scene,
            frame,
            config,
        }
    }

    /// Offset an edge's magnitude is measured from.
    ///
    /// Anchored edges start at the anchor's outer edge on the same side,
    /// moved toward its opposite edge by `anchor_position`. Unanchored edges
    /// start at the container edge, moved inward by `anchor_position` of the extent.
    pub(crate) fn base_value(&self, edge: &EdgeConstraint) -> i32 {
        let side = edge.side();
        let position = edge.anchor_position;

        if let Some(anchor) = edge.anchor.and_then(|id| self.scene.get(id)) {
            let outer = anchor.outer_bounds();
            let f = &self.frame;
            return match side {
                Side::Top => outer.y + scaled(outer.height, position) - f.top,
                Side::Bottom => {
                    (f.bottom - outer.height - outer.y) + scaled(outer.height, position)
                }
                Side::Left => outer.x + scaled(outer.width, position) - f.left,
                Side::Right => (f.right - outer.width - outer.x) + scaled(outer.width, position),
            };
        }

        if position != 0.0 {
            scaled(self.frame.extent(side.axis()), position)
        } else {
            0
        }
    }

    /// Resolve one edge of `element`, recording base, resolved and clipped state
    pub(crate) fn resolve(
        &self,
        element: ElementId,
        set: &ConstraintSet,
        side: Side,
        cache: &mut PassCache,
    ) -> i32 {
        let edge = set.edge(side);
        let opposite = set.edge(side.opposite());
        let axis = side.axis();
        let extent = self.frame.extent(axis);
        let node = self.scene.node(element);

        let base = self.base_value(edge);
        let mut clipped = false;

        let value = match edge.inset {
            Inset::Px(px) => base + px,
            Inset::Mm(mm) => base + self.config.mm_to_px(mm),
            Inset::Percent(percent) => {
                let opposite_base = self.base_value(opposite);
                cache.entry(element, opposite.side()).base_value = opposite_base;
                percent_inset(base, extent - opposite_base - base, percent)
            }
            Inset::Auto => {
                let preferred = node.preferred.on_axis(axis);
                let preferred_outer = preferred + node.margin.on_axis(axis);

                let raw = if preferred <= 0 {
                    clipped = true;
                    base
                } else if opposite.is_flexible() {
                    let opposite_base = self.base_value(opposite);
                    cache.entry(element, opposite.side()).base_value = opposite_base;
                    base + (extent - opposite_base - base - preferred_outer) / 2
                } else {
                    extent - self.resolve(element, set, opposite.side(), cache) - preferred_outer
                };

                if raw < 0 {
                    clipped = true;
                }
                raw.max(0)
            }
        };

        let state = cache.entry(element, side);
        state.base_value = base;
        state.resolved_value = value;
        state.clipped = clipped;
        value
    }

    /// Bounds of `element` from its resolved insets
    pub(crate) fn place(&self, element: ElementId, insets: &Edges<i32>) -> Rect {
        let node = self.scene.node(element);
        let f = &self.frame;
        Rect::new(
            f.left + insets.left + node.margin.leading(f.rtl),
            f.top + insets.top + node.margin.top,
            f.width() - node.margin.horizontal() - insets.right - insets.left,
            f.height() - node.margin.vertical() - insets.bottom - insets.top,
        )
    }
}

/// Truncating `length * position`, the way anchor offsets are rounded
fn scaled(length: i32, position: f32) -> i32 {
    (length as f32 * position) as i32
}

/// Inset of a percent edge: `base` plus `percent` of `relative`, truncated
pub(crate) fn percent_inset(base: i32, relative: i32, percent: f32) -> i32 {
    (base as f32 + relative as f32 * percent / 100.0) as i32
}

/// Percentage of `relative` that [`percent_inset`] turns into `target`.
///
/// The plain ratio can land a hair below a whole pixel in `f32` and truncate
/// one short, so in that case the target is aimed at the middle of its pixel.
pub(crate) fn percent_for(base: i32, relative: i32, target: i32) -> f32 {
    let exact = (target - base) as f32 / relative as f32 * 100.0;
    if percent_inset(base, relative, exact) == target {
        return exact;
    }
    let middle = if target < 0 { -0.5 } else { 0.5 };
    ((target - base) as f32 + middle) / relative as f32 * 100.0
}

/// Layout engine for anchored inset constraints
#[derive(Debug, Clone, Default)]
pub struct LayeredLayout {
    pub config: LayoutConfig,
}

impl LayeredLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Lay out every child of `container`, writing their bounds.
    ///
    /// Returns the values computed for each edge; keep them if constraints
    /// will be edited interactively before the next pass.
    pub fn layout_container(
        &self,
        scene: &mut Scene,
        container: ElementId,
    ) -> Result<PassCache, LayoutError> {
        let frame = Frame::of(scene.require(container)?);
        let children = scene.children(container).to_vec();
        debug!(
            "layout {} ({} children) in frame {:?}",
            container,
            children.len(),
            frame
        );

        let mut cache = PassCache::new();
        let mut resolver = Resolver::new(self.config.reject_cycles);
        let config = &self.config;
        for child in children {
            resolver.visit(scene, container, child, &mut |scene, element| {
                let bounds = layout_element(scene, frame, config, element, &mut cache);
                scene.node_mut(element).bounds = bounds;
                Ok(())
            })?;
        }
        Ok(cache)
    }
}

fn layout_element(
    scene: &Scene,
    frame: Frame,
    config: &LayoutConfig,
    element: ElementId,
    cache: &mut PassCache,
) -> Rect {
    let calc = EdgeCalculator::new(scene, frame, config);
    let Some(set) = scene.constraint(element) else {
        return calc.place(element, &Edges::all(0));
    };

    let mut insets = Edges::all(0);
    for side in Side::EVALUATION_ORDER {
        *insets.get_mut(side) = calc.resolve(element, set, side, cache);
    }
    let bounds = calc.place(element, &insets);
    debug!("{} -> {} (insets {:?})", element, bounds, insets);
    bounds
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout::types::Size;

    fn scene_with(insets: &str, preferred: Size) -> (Scene, ElementId, ElementId) {
        let mut scene = Scene::new();
        let root = scene.add_container(100, 100);
        let a = scene.add_element(root, preferred);
        scene.install_constraint(a, ConstraintSet::from_insets(insets).unwrap());
        (scene, root, a)
    }

    #[test]
    fn test_fixed_insets() {
        let (mut scene, root, a) = scene_with("10px 20px 30px 40px", Size::default());
        LayeredLayout::default()
            .layout_container(&mut scene, root)
            .unwrap();
        assert_eq!(scene.node(a).bounds, Rect::new(40, 10, 40, 60));
    }

    #[test]
    fn test_mm_insets_use_density() {
        let (mut scene, root, a) = scene_with("1mm", Size::default());
        let layout = LayeredLayout::new(LayoutConfig::new().with_pixels_per_mm(5.0));
        let cache = layout.layout_container(&mut scene, root).unwrap();
        assert_eq!(cache.resolved(a), Edges::all(5));
        assert_eq!(scene.node(a).bounds, Rect::new(5, 5, 90, 90));
    }

    #[test]
    fn test_unconstrained_element_fills_frame() {
        let mut scene = Scene::new();
        let root = scene.add_container(100, 80);
        scene.set_padding(root, Edges::all(5));
        let a = scene.add_element(root, Size::new(10, 10));
        scene.set_margin(a, Edges::new(1, 2, 3, 4));

        LayeredLayout::default()
            .layout_container(&mut scene, root)
            .unwrap();
        assert_eq!(scene.node(a).bounds, Rect::new(9, 6, 84, 66));
    }

    #[test]
    fn test_auto_opposite_fixed() {
        let (mut scene, root, a) = scene_with("10px auto auto 10px", Size::new(20, 20));
        let cache = LayeredLayout::default()
            .layout_container(&mut scene, root)
            .unwrap();
        let bounds = scene.node(a).bounds;
        assert_eq!(
            (bounds.x, bounds.y, bounds.right(), bounds.bottom()),
            (10, 10, 30, 30)
        );
        assert!(!cache.is_clipped(a, Side::Right));
        assert!(!cache.is_clipped(a, Side::Bottom));
    }

    #[test]
    fn test_auto_pair_centers() {
        let (mut scene, root, a) = scene_with("auto", Size::new(20, 40));
        let cache = LayeredLayout::default()
            .layout_container(&mut scene, root)
            .unwrap();
        assert_eq!(scene.node(a).bounds, Rect::new(40, 30, 20, 40));
        assert_eq!(cache.get(a, Side::Left).resolved_value, 40);
        assert_eq!(cache.get(a, Side::Right).resolved_value, 40);
    }

    #[test]
    fn test_auto_pair_without_preferred_size_clips() {
        let (mut scene, root, a) = scene_with("auto", Size::new(0, 0));
        let cache = LayeredLayout::default()
            .layout_container(&mut scene, root)
            .unwrap();
        for side in Side::CLOCKWISE {
            let state = cache.get(a, side);
            assert_eq!(state.resolved_value, 0, "{side}");
            assert!(state.clipped, "{side}");
        }
    }

    #[test]
    fn test_auto_clips_when_too_large() {
        let (mut scene, root, a) = scene_with("0 auto 0 80px", Size::new(50, 10));
        let cache = LayeredLayout::default()
            .layout_container(&mut scene, root)
            .unwrap();
        assert!(cache.is_clipped(a, Side::Right));
        assert_eq!(cache.get(a, Side::Right).resolved_value, 0);
        assert_eq!(scene.node(a).bounds.width, 20);
    }

    #[test]
    fn test_percent_insets() {
        let (mut scene, root, a) = scene_with("10% 25% 10% 25%", Size::default());
        LayeredLayout::default()
            .layout_container(&mut scene, root)
            .unwrap();
        assert_eq!(scene.node(a).bounds, Rect::new(25, 10, 50, 80));
    }

    #[test]
    fn test_unanchored_position_offsets_base() {
        let (mut scene, root, a) = scene_with("0 0 auto 0", Size::new(10, 10));
        scene.constraint_mut(a).unwrap().top().anchor_position(0.5);
        let cache = LayeredLayout::default()
            .layout_container(&mut scene, root)
            .unwrap();
        assert_eq!(cache.get(a, Side::Top).base_value, 50);
        assert_eq!(scene.node(a).bounds.y, 50);
    }

    #[test]
    fn test_padding_and_margin() {
        let (mut scene, root, a) = scene_with("10px", Size::default());
        scene.set_padding(root, Edges::all(5));
        scene.set_margin(a, Edges::all(2));
        LayeredLayout::default()
            .layout_container(&mut scene, root)
            .unwrap();
        assert_eq!(scene.node(a).bounds, Rect::new(17, 17, 66, 66));
    }

    #[test]
    fn test_rtl_frame_uses_right_padding_as_leading() {
        let (mut scene, root, a) = scene_with("0", Size::default());
        scene.set_padding(root, Edges::new(0, 10, 0, 2));
        scene.node_mut(root).rtl = true;
        LayeredLayout::default()
            .layout_container(&mut scene, root)
            .unwrap();
        assert_eq!(scene.node(a).bounds, Rect::new(10, 0, 88, 100));
    }

    #[test]
    fn test_unknown_container() {
        let mut scene = Scene::new();
        let err = LayeredLayout::default()
            .layout_container(&mut scene, ElementId(7))
            .unwrap_err();
        assert_eq!(err, LayoutError::UnknownElement { id: ElementId(7) });
    }

    #[test]
    fn test_rtl_element_uses_right_margin_as_leading() {
        let (mut scene, root, a) = scene_with("0", Size::default());
        scene.set_margin(a, Edges::new(0, 7, 0, 3));
        scene.node_mut(root).rtl = true;
        LayeredLayout::default()
            .layout_container(&mut scene, root)
            .unwrap();
        assert_eq!(scene.node(a).bounds, Rect::new(7, 0, 90, 100));
    }

    #[test]
    fn test_percent_for_lands_on_every_pixel() {
        for relative in [300, 700, 900, 1100, 1300] {
            for base in [0, 13] {
                for target in base..base + relative {
                    let percent = percent_for(base, relative, target);
                    assert_eq!(
                        percent_inset(base, relative, percent),
                        target,
                        "{target}px of {relative}px from {base}"
                    );
                }
            }
        }
        assert_eq!(percent_for(0, 100, 72), 72.0);
        assert_eq!(percent_inset(100, 100, percent_for(100, 100, 50)), 50);
    }
}
