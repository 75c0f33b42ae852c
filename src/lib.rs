//! Layered Layout - anchored inset box layout
//!
//! This library positions boxes inside a container from four independent
//! edge constraints per box. Each edge is an inset in pixels, millimetres,
//! percent or `auto`, measured from the container or from an edge of a
//! sibling box.
//!
//! # Example
//!
//! ```rust
//! use layered_layout::{ConstraintSet, LayeredLayout, Rect, Scene, Size};
//!
//! let mut scene = Scene::new();
//! let root = scene.add_container(100, 100);
//! let badge = scene.add_element(root, Size::new(20, 20));
//! let insets = ConstraintSet::from_insets("top:10px; left:10px; bottom:auto; right:auto").unwrap();
//! scene.install_constraint(badge, insets);
//!
//! LayeredLayout::default().layout_container(&mut scene, root).unwrap();
//! assert_eq!(scene.node(badge).bounds, Rect::new(10, 10, 20, 20));
//! ```

pub mod error;
pub mod layout;
pub mod parser;
pub mod scene_file;

pub use error::{ConstraintError, ParseError};
pub use layout::{
    preferred_size, ConstraintSet, EdgeConstraint, Edges, ElementId, Inset, LayeredLayout,
    LayoutConfig, LayoutError, PassCache, Preferred, Rect, Scene, Side, Size, Unit,
};
pub use scene_file::{SceneError, SceneFile};
