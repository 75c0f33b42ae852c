//! Edge constraints: how far each side of an element sits from its anchor
//!
//! A [`ConstraintSet`] holds one [`EdgeConstraint`] per side. Each edge is an
//! [`Inset`] (pixels, millimetres, percent or auto) measured from either the
//! container or another element of the same container.

use std::fmt;

use crate::error::ParseError;
use crate::parser::{self, SideList};

use super::scene::ElementId;
use super::types::{Edges, Side};

/// Unit kind of an inset, without its magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Pixels,
    Millimetres,
    Percent,
    Auto,
}

/// The offset of one edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inset {
    /// Device pixels
    Px(i32),
    /// Physical length, converted through the configured pixel density
    Mm(f32),
    /// Percentage of the space left between this edge's base and the opposite edge's base
    Percent(f32),
    /// Derived from the preferred size and the remaining space
    Auto,
}

impl Default for Inset {
    fn default() -> Self {
        Inset::Px(0)
    }
}

impl Inset {
    pub fn unit(&self) -> Unit {
        match self {
            Inset::Px(_) => Unit::Pixels,
            Inset::Mm(_) => Unit::Millimetres,
            Inset::Percent(_) => Unit::Percent,
            Inset::Auto => Unit::Auto,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Inset::Auto)
    }
}

impl fmt::Display for Inset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inset::Px(v) => write!(f, "{}px", v),
            Inset::Mm(v) => write!(f, "{}mm", v),
            Inset::Percent(v) => write!(f, "{}%", v),
            Inset::Auto => f.write_str("auto"),
        }
    }
}

/// Constraint for a single side of an element
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeConstraint {
    side: Side,
    pub inset: Inset,
    /// Element the inset is measured from; `None` measures from the container
    pub anchor: Option<ElementId>,
    /// 0 measures from the anchor's same-named side, 1 from its opposite side
    pub anchor_position: f32,
}

impl EdgeConstraint {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            inset: Inset::default(),
            anchor: None,
            anchor_position: 0.0,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Flexible edges are resolved from the preferred size at layout time
    pub fn is_flexible(&self) -> bool {
        self.inset.is_auto()
    }

    pub fn is_fixed(&self) -> bool {
        !self.is_flexible()
    }

    pub fn set(&mut self, inset: Inset) -> &mut Self {
        self.inset = inset;
        self
    }

    pub fn px(&mut self, px: i32) -> &mut Self {
        self.set(Inset::Px(px))
    }

    pub fn mm(&mut self, mm: f32) -> &mut Self {
        self.set(Inset::Mm(mm))
    }

    pub fn percent(&mut self, percent: f32) -> &mut Self {
        self.set(Inset::Percent(percent))
    }

    pub fn auto(&mut self) -> &mut Self {
        self.set(Inset::Auto)
    }

    pub fn anchor(&mut self, anchor: Option<ElementId>) -> &mut Self {
        self.anchor = anchor;
        self
    }

    pub fn anchor_position(&mut self, position: f32) -> &mut Self {
        self.anchor_position = position;
        self
    }

    /// Set the inset from its text form, e.g. `2mm`, `10px`, `25%`, `auto`
    pub fn set_value(&mut self, value: &str) -> Result<&mut Self, Vec<ParseError>> {
        let inset = parser::parse_inset(value)?;
        Ok(self.set(inset))
    }
}

impl fmt::Display for EdgeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.side, self.inset)
    }
}

/// The four edge constraints of one element
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSet {
    edges: Edges<EdgeConstraint>,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self {
            edges: Edges::from_fn(EdgeConstraint::new),
        }
    }
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from the inset text format
    pub fn from_insets(insets: &str) -> Result<Self, Vec<ParseError>> {
        let mut set = Self::default();
        set.set_insets(insets)?;
        Ok(set)
    }

    pub fn edges(&self) -> &Edges<EdgeConstraint> {
        &self.edges
    }

    pub fn edge(&self, side: Side) -> &EdgeConstraint {
        self.edges.get(side)
    }

    pub fn edge_mut(&mut self, side: Side) -> &mut EdgeConstraint {
        self.edges.get_mut(side)
    }

    pub fn top(&mut self) -> &mut EdgeConstraint {
        &mut self.edges.top
    }

    pub fn left(&mut self) -> &mut EdgeConstraint {
        &mut self.edges.left
    }

    pub fn bottom(&mut self) -> &mut EdgeConstraint {
        &mut self.edges.bottom
    }

    pub fn right(&mut self) -> &mut EdgeConstraint {
        &mut self.edges.right
    }

    /// Anchors of all four edges, in top, left, bottom, right order
    pub fn anchors(&self) -> Vec<ElementId> {
        [Side::Top, Side::Left, Side::Bottom, Side::Right]
            .iter()
            .filter_map(|side| self.edge(*side).anchor)
            .collect()
    }

    /// Edges with a fixed (non-auto) inset
    pub fn fixed_edges(&self) -> impl Iterator<Item = &EdgeConstraint> {
        self.edges.iter().map(|(_, e)| e).filter(|e| e.is_fixed())
    }

    /// Edges with an auto inset
    pub fn flexible_edges(&self) -> impl Iterator<Item = &EdgeConstraint> {
        self.edges.iter().map(|(_, e)| e).filter(|e| e.is_flexible())
    }

    /// Set insets from text: `"2mm"`, `"1mm auto"`, `"0 auto 10%"`, `"1 2 3 4"`,
    /// or labeled `"top:2mm; left:auto"`.
    ///
    /// Nothing is changed if the string does not parse.
    pub fn set_insets(&mut self, insets: &str) -> Result<&mut Self, Vec<ParseError>> {
        let list = parser::parse_insets(insets)?;
        Ok(self.set_insets_from(&list))
    }

    pub fn set_insets_from(&mut self, list: &SideList<Inset>) -> &mut Self {
        for (side, inset) in list.assignments() {
            self.edge_mut(side).inset = inset;
        }
        self
    }

    /// Set anchor positions from text, using the same 1-4 value or labeled forms as insets
    pub fn set_anchor_positions(&mut self, positions: &str) -> Result<&mut Self, Vec<ParseError>> {
        let list = parser::parse_anchor_positions(positions)?;
        for (side, position) in list.assignments() {
            self.edge_mut(side).anchor_position = position;
        }
        Ok(self)
    }

    /// Set anchor positions from 1 to 4 values (all / vertical horizontal /
    /// top horizontal bottom / top right bottom left). Other lengths are ignored.
    pub fn set_anchor_position_values(&mut self, positions: &[f32]) -> &mut Self {
        if let Some(list) = SideList::positional(positions.to_vec()) {
            for (side, position) in list.assignments() {
                self.edge_mut(side).anchor_position = position;
            }
        }
        self
    }

    /// Set anchors from 1 to 4 values with the same expansion as [`Self::set_anchor_position_values`]
    pub fn set_anchors(&mut self, anchors: &[Option<ElementId>]) -> &mut Self {
        if let Some(list) = SideList::positional(anchors.to_vec()) {
            for (side, anchor) in list.assignments() {
                self.edge_mut(side).anchor = anchor;
            }
        }
        self
    }

    /// Insets as text, e.g. `top:2mm; right:0px; bottom:auto; left:25%`
    /// or unlabeled `2mm 0px auto 25%`
    pub fn insets_to_string(&self, labeled: bool) -> String {
        format_sides(&self.edges, labeled, |e| e.inset.to_string())
    }

    /// Anchor positions as text in the same layout as [`Self::insets_to_string`]
    pub fn anchor_positions_to_string(&self, labeled: bool) -> String {
        format_sides(&self.edges, labeled, |e| format!("{:?}", e.anchor_position))
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.insets_to_string(true))
    }
}

/// Join per-side values in top, right, bottom, left order
pub(crate) fn format_sides<T>(
    edges: &Edges<T>,
    labeled: bool,
    mut value: impl FnMut(&T) -> String,
) -> String {
    let parts: Vec<String> = edges
        .iter()
        .map(|(side, v)| {
            if labeled {
                format!("{}:{}", side, value(v))
            } else {
                value(v)
            }
        })
        .collect();
    parts.join(if labeled { "; " } else { " " })
}
