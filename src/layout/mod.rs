//! Layout engine for anchored inset constraints
//!
//! Every element of a container carries up to four edge constraints. The
//! [`LayeredLayout`] turns them into bounds in a single pass, resolving the
//! siblings an element is anchored to before the element itself. A separate
//! pass computes the container's preferred size, and the editing operations
//! in [`mutation`] move or re-anchor edges without moving the element.

pub mod config;
pub mod constraint;
pub mod engine;
pub mod error;
pub mod mutation;
pub mod preferred;
pub mod resolver;
pub mod scene;
pub mod types;

pub use config::LayoutConfig;
pub use constraint::{ConstraintSet, EdgeConstraint, Inset, Unit};
pub use engine::{EdgeState, Frame, LayeredLayout, PassCache};
pub use error::LayoutError;
pub use preferred::{preferred_size, Preferred};
pub use resolver::{dependencies, fix_anchors, has_circular_dependency};
pub use scene::{ElementId, Node, Scene};
pub use types::*;
