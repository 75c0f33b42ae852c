//! Interactive constraint editing
//!
//! These operations change how an element is constrained while keeping it
//! where the last layout pass put it: dragging an element by some pixels,
//! switching an inset to another unit, or anchoring an edge to a different
//! sibling. They read the [`PassCache`] returned by
//! [`LayeredLayout::layout_container`] and advance it, so several edits can be
//! applied between two passes.

use log::debug;

use crate::error::ConstraintError;
use crate::parser;

use super::constraint::{format_sides, Inset, Unit};
use super::engine::{percent_for, EdgeCalculator, Frame, LayeredLayout, PassCache};
use super::error::LayoutError;
use super::resolver::fix_anchors;
use super::scene::{ElementId, Scene};
use super::types::{Axis, Edges, Rect, Side};

impl LayeredLayout {
    /// Move an element by `dx`/`dy` pixels.
    ///
    /// Per axis: clipped auto edges are first pinned to their current value.
    /// If both edges are still auto, the one the element moves toward is
    /// pinned. Otherwise every fixed edge absorbs the delta.
    pub fn translate_pixels(
        &self,
        scene: &mut Scene,
        cache: &mut PassCache,
        element: ElementId,
        dx: i32,
        dy: i32,
        prefer_mm: bool,
    ) -> Result<(), LayoutError> {
        self.parent_frame(scene, element)?;
        for (axis, delta) in [(Axis::Vertical, dy), (Axis::Horizontal, dx)] {
            if delta != 0 {
                self.translate_axis(scene, cache, element, axis, delta, prefer_mm)?;
            }
        }
        Ok(())
    }

    /// [`Self::translate_pixels`] with deltas in millimetres
    pub fn translate_mm(
        &self,
        scene: &mut Scene,
        cache: &mut PassCache,
        element: ElementId,
        dx: f32,
        dy: f32,
        prefer_mm: bool,
    ) -> Result<(), LayoutError> {
        let dx = self.config.mm_to_px(dx);
        let dy = self.config.mm_to_px(dy);
        self.translate_pixels(scene, cache, element, dx, dy, prefer_mm)
    }

    fn translate_axis(
        &self,
        scene: &mut Scene,
        cache: &mut PassCache,
        element: ElementId,
        axis: Axis,
        delta: i32,
        prefer_mm: bool,
    ) -> Result<(), LayoutError> {
        let (leading, trailing) = axis.sides();
        let fixed_unit = if prefer_mm {
            Unit::Millimetres
        } else {
            Unit::Pixels
        };

        for side in [leading, trailing] {
            if scene.edge_mut(element, side).is_flexible() && cache.is_clipped(element, side) {
                self.change_units(scene, cache, element, side, fixed_unit)?;
            }
        }

        let set = scene.get_or_create_constraint(element);
        let leading_fixed = set.edge(leading).is_fixed();
        let trailing_fixed = set.edge(trailing).is_fixed();

        if !leading_fixed && !trailing_fixed {
            if delta > 0 {
                self.translate_edge(scene, cache, element, trailing, -delta, prefer_mm)?;
            } else {
                self.translate_edge(scene, cache, element, leading, delta, prefer_mm)?;
            }
            return Ok(());
        }
        if leading_fixed {
            self.translate_edge(scene, cache, element, leading, delta, prefer_mm)?;
        }
        if trailing_fixed {
            self.translate_edge(scene, cache, element, trailing, -delta, prefer_mm)?;
        }
        Ok(())
    }

    /// Grow one inset by `delta` pixels, keeping its unit.
    ///
    /// An auto inset becomes fixed (millimetres if `prefer_mm`) at its current
    /// resolved value plus `delta`. A percent inset is left untouched when the
    /// space it is a percentage of is under one pixel.
    pub fn translate_edge(
        &self,
        scene: &mut Scene,
        cache: &mut PassCache,
        element: ElementId,
        side: Side,
        delta: i32,
        prefer_mm: bool,
    ) -> Result<(), LayoutError> {
        let frame = self.parent_frame(scene, element)?;
        let state = cache.get(element, side);
        let opposite_base = cache.get(element, side.opposite()).base_value;
        let config = &self.config;

        let edge = scene.edge_mut(element, side);
        edge.inset = match edge.inset {
            Inset::Px(px) => Inset::Px(px + delta),
            Inset::Mm(mm) => Inset::Mm(mm + config.px_to_mm(delta as f32)),
            Inset::Percent(_) => {
                let relative = frame.extent(side.axis()) - state.base_value - opposite_base;
                if relative.abs() < 1 {
                    return Ok(());
                }
                let target = state.resolved_value + delta;
                Inset::Percent(percent_for(state.base_value, relative, target))
            }
            Inset::Auto => {
                let px = state.resolved_value + delta - state.base_value;
                if prefer_mm {
                    Inset::Mm(config.px_to_mm(px as f32))
                } else {
                    Inset::Px(px)
                }
            }
        };
        debug!("{} {} moved by {}px: {}", element, side, delta, edge);

        cache.entry(element, side).resolved_value += delta;
        Ok(())
    }

    /// Current magnitude of an inset in pixels. Percent and auto insets use
    /// the last resolved value minus its base.
    pub fn current_value_px(
        &self,
        scene: &Scene,
        cache: &PassCache,
        element: ElementId,
        side: Side,
    ) -> Result<i32, LayoutError> {
        scene.require(element)?;
        let Some(edge) = scene.constraint(element).map(|c| c.edge(side)) else {
            return Ok(0);
        };
        Ok(match edge.inset {
            Inset::Px(px) => px,
            Inset::Mm(mm) => self.config.mm_to_px(mm),
            Inset::Percent(_) | Inset::Auto => {
                let state = cache.get(element, side);
                state.resolved_value - state.base_value
            }
        })
    }

    /// [`Self::current_value_px`] in millimetres
    pub fn current_value_mm(
        &self,
        scene: &Scene,
        cache: &PassCache,
        element: ElementId,
        side: Side,
    ) -> Result<f32, LayoutError> {
        if let Some(Inset::Mm(mm)) = scene.constraint(element).map(|c| c.edge(side).inset) {
            return Ok(mm);
        }
        let px = self.current_value_px(scene, cache, element, side)?;
        Ok(self.config.px_to_mm(px as f32))
    }

    /// Switch an inset to another unit without moving the edge
    pub fn change_units(
        &self,
        scene: &mut Scene,
        cache: &PassCache,
        element: ElementId,
        side: Side,
        unit: Unit,
    ) -> Result<(), LayoutError> {
        let frame = self.parent_frame(scene, element)?;
        if scene.edge_mut(element, side).inset.unit() == unit {
            return Ok(());
        }

        let inset = match unit {
            Unit::Pixels => Inset::Px(self.current_value_px(scene, cache, element, side)?),
            Unit::Millimetres => Inset::Mm(self.current_value_mm(scene, cache, element, side)?),
            Unit::Percent => {
                let state = cache.get(element, side);
                let opposite_base = cache.get(element, side.opposite()).base_value;
                let relative = frame.extent(side.axis()) - state.base_value - opposite_base;
                if relative.abs() < 1 {
                    Inset::Percent(0.0)
                } else {
                    Inset::Percent(percent_for(state.base_value, relative, state.resolved_value))
                }
            }
            Unit::Auto => Inset::Auto,
        };
        debug!("{} {} converted to {}", element, side, inset);
        scene.edge_mut(element, side).inset = inset;
        Ok(())
    }

    /// Anchor an edge to `anchor` (or the container) at `position`.
    ///
    /// Fixed insets are adjusted by the difference between the old and new
    /// base values, so the edge stays where it was. Percent insets are
    /// recomputed against the space left by the new base. Auto insets just
    /// take the new anchor.
    pub fn change_reference(
        &self,
        scene: &mut Scene,
        cache: &mut PassCache,
        element: ElementId,
        side: Side,
        anchor: Option<ElementId>,
        position: f32,
    ) -> Result<(), LayoutError> {
        let frame = self.parent_frame(scene, element)?;
        if let Some(anchor) = anchor {
            scene.require(anchor)?;
        }

        let edge = scene.edge_mut(element, side);
        if edge.is_flexible() {
            edge.anchor(anchor).anchor_position(position);
            return Ok(());
        }
        if edge.anchor == anchor && edge.anchor_position == position {
            return Ok(());
        }

        let current = edge.clone();
        let mut moved = current.clone();
        moved.anchor(anchor).anchor_position(position);

        let calc = EdgeCalculator::new(scene, frame, &self.config);
        let new_base = calc.base_value(&moved);

        if let Inset::Percent(_) = current.inset {
            let opposite = scene.constraint(element).map(|c| c.edge(side.opposite()));
            let opposite_base = opposite.map_or(0, |edge| calc.base_value(edge));
            let relative = frame.extent(side.axis()) - new_base - opposite_base;
            let resolved = cache.get(element, side).resolved_value;
            let percent = if relative.abs() < 1 {
                0.0
            } else {
                percent_for(new_base, relative, resolved)
            };
            debug!(
                "{} {} re-anchored to {:?} at {}: {}%",
                element, side, anchor, position, percent
            );
            scene
                .edge_mut(element, side)
                .percent(percent)
                .anchor(anchor)
                .anchor_position(position);
            cache.entry(element, side).base_value = new_base;
            return Ok(());
        }

        let delta = calc.base_value(&current) - new_base;
        debug!(
            "{} {} re-anchored to {:?} at {}: shift {}px",
            element, side, anchor, position, delta
        );

        self.translate_edge(scene, cache, element, side, delta, true)?;
        scene
            .edge_mut(element, side)
            .anchor(anchor)
            .anchor_position(position);
        Ok(())
    }

    /// The inset an edge resolves to against the current geometry, without a layout pass
    pub fn absolute_pixels(
        &self,
        scene: &Scene,
        element: ElementId,
        side: Side,
    ) -> Result<i32, LayoutError> {
        let frame = self.parent_frame(scene, element)?;
        let Some(set) = scene.constraint(element) else {
            return Ok(0);
        };
        let calc = EdgeCalculator::new(scene, frame, &self.config);
        Ok(calc.resolve(element, set, side, &mut PassCache::new()))
    }

    /// Box bounded by an element's anchors, or by the container's inner
    /// edges on unanchored sides
    pub fn reference_box(&self, scene: &Scene, element: ElementId) -> Result<Rect, LayoutError> {
        let parent = self.parent_of(scene, element)?;
        let container = scene.node(parent);
        let padding = &container.padding;
        let anchor_of = |side: Side| {
            scene
                .constraint(element)
                .map(|c| c.edge(side))
                .and_then(|e| Some((scene.get(e.anchor?)?.outer_bounds(), e.anchor_position)))
        };

        let y = match anchor_of(Side::Top) {
            Some((outer, pos)) => (outer.y as f32 + pos * outer.height as f32) as i32,
            None => padding.top,
        };
        let x = match anchor_of(Side::Left) {
            Some((outer, pos)) => (outer.x as f32 + pos * outer.width as f32) as i32,
            None => padding.left,
        };
        let width = match anchor_of(Side::Right) {
            Some((outer, pos)) => {
                (outer.right() as f32 - pos * outer.width as f32) as i32 - x
            }
            None => container.bounds.width - x - padding.right,
        };
        let height = match anchor_of(Side::Bottom) {
            Some((outer, pos)) => {
                (outer.bottom() as f32 - pos * outer.height as f32) as i32 - y
            }
            None => container.bounds.height - y - padding.bottom,
        };
        Ok(Rect::new(x, y, width, height))
    }

    /// Set anchors from sibling indices, e.g. `"-1 0"` or `"left:2; top:-1"`.
    ///
    /// Nothing is changed if the text does not parse or an index is out of range.
    pub fn set_anchor_indices(
        &self,
        scene: &mut Scene,
        element: ElementId,
        indices: &str,
    ) -> Result<(), ConstraintError> {
        let parent = self.parent_of(scene, element)?;
        let list = parser::parse_anchor_indices(indices)?;

        let len = scene.children(parent).len();
        let mut anchors = Vec::new();
        for (side, index) in list.assignments() {
            let anchor = match index {
                Some(index) => Some(
                    scene
                        .child_at(parent, index)
                        .ok_or(LayoutError::AnchorIndexOutOfRange { index, len })?,
                ),
                None => None,
            };
            anchors.push((side, anchor));
        }

        for (side, anchor) in anchors {
            scene.edge_mut(element, side).anchor(anchor);
        }
        Ok(())
    }

    /// Anchors as sibling indices in top, right, bottom, left order; `-1` where unanchored
    pub fn anchor_indices_to_string(
        &self,
        scene: &mut Scene,
        element: ElementId,
        labeled: bool,
    ) -> Result<String, LayoutError> {
        let parent = self.parent_of(scene, element)?;
        fix_anchors(scene, parent, element);

        let indices = Edges::from_fn(|side| {
            scene
                .constraint(element)
                .and_then(|c| c.edge(side).anchor)
                .and_then(|anchor| scene.index_of(anchor))
                .map_or(-1, |index| index as i64)
        });
        Ok(format_sides(&indices, labeled, |index| index.to_string()))
    }

    fn parent_of(&self, scene: &Scene, element: ElementId) -> Result<ElementId, LayoutError> {
        scene
            .require(element)?
            .parent
            .ok_or(LayoutError::Detached { id: element })
    }

    fn parent_frame(&self, scene: &Scene, element: ElementId) -> Result<Frame, LayoutError> {
        let parent = self.parent_of(scene, element)?;
        Ok(Frame::of(scene.node(parent)))
    }
}
