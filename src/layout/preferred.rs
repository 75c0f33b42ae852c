//! Preferred-size pass
//!
//! Computes how large a container wants to be so that every child fits at its
//! preferred size with its fixed insets. Anchored insets stack on top of the
//! anchor's own preferred inset, so a chain of anchored elements adds up.
//! Percent and auto insets contribute nothing of their own.

use log::debug;

use super::config::LayoutConfig;
use super::constraint::{EdgeConstraint, Inset};
use super::engine::PassCache;
use super::error::LayoutError;
use super::resolver::Resolver;
use super::scene::{ElementId, Scene};
use super::types::{Side, Size};

/// Result of a preferred-size pass
#[derive(Debug, Clone)]
pub struct Preferred {
    /// Preferred size of the container, padding included
    pub size: Size,
    /// Per-edge `preferred_value`s of the children
    pub cache: PassCache,
}

/// Preferred size of `container` from its children's preferred sizes and insets
pub fn preferred_size(
    scene: &mut Scene,
    container: ElementId,
    config: &LayoutConfig,
) -> Result<Preferred, LayoutError> {
    scene.require(container)?;
    let children = scene.children(container).to_vec();

    let mut cache = PassCache::new();
    let mut resolver = Resolver::new(config.reject_cycles);
    let mut max = Size::default();

    for child in children {
        resolver.visit(scene, container, child, &mut |scene, element| {
            calc_preferred_values(scene, config, element, &mut cache);
            Ok(())
        })?;

        let node = scene.node(child);
        let insets = |side: Side| {
            if node.constraint.is_some() {
                cache.get(child, side).preferred_value
            } else {
                0
            }
        };
        let outer = node.outer_preferred();
        max.width = max
            .width
            .max(outer.width + insets(Side::Left) + insets(Side::Right));
        max.height = max
            .height
            .max(outer.height + insets(Side::Top) + insets(Side::Bottom));
    }

    let padding = &scene.node(container).padding;
    let size = Size::new(
        max.width + padding.horizontal(),
        max.height + padding.vertical(),
    );
    debug!("preferred size of {}: {:?}", container, size);
    Ok(Preferred { size, cache })
}

fn calc_preferred_values(
    scene: &Scene,
    config: &LayoutConfig,
    element: ElementId,
    cache: &mut PassCache,
) {
    let Some(set) = scene.constraint(element) else {
        return;
    };
    for side in [Side::Top, Side::Left, Side::Bottom, Side::Right] {
        let value = preferred_value(scene, config, set.edge(side), cache);
        cache.entry(element, side).preferred_value = value;
    }
}

fn preferred_value(
    scene: &Scene,
    config: &LayoutConfig,
    edge: &EdgeConstraint,
    cache: &PassCache,
) -> i32 {
    let own = match edge.inset {
        Inset::Px(px) => px,
        Inset::Mm(mm) => config.mm_to_px(mm),
        Inset::Percent(_) | Inset::Auto => 0,
    };

    let Some(anchor) = edge.anchor.filter(|id| scene.contains(*id)) else {
        return own;
    };

    let side = edge.side();
    let mut base = if scene.constraint(anchor).is_some() {
        cache.get(anchor, side).preferred_value
    } else {
        0
    };
    if edge.anchor_position != 0.0 {
        let extent = scene.node(anchor).outer_preferred().on_axis(side.axis());
        base = (base as f32 + extent as f32 * edge.anchor_position) as i32;
    }
    base + own
}
