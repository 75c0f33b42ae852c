//! Error types for the layout engine

use thiserror::Error;

use super::scene::ElementId;

/// Errors that can occur during layout computation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// Id not produced by this scene
    #[error("unknown element {id}")]
    UnknownElement { id: ElementId },

    /// Operation needs the element's container but it has none
    #[error("element {id} is not inside a container")]
    Detached { id: ElementId },

    /// Anchor index outside the container's children
    #[error("anchor index {index} out of range for container with {len} children")]
    AnchorIndexOutOfRange { index: usize, len: usize },

    /// Anchors form a cycle (only reported when cycle rejection is enabled)
    #[error("circular anchor dependency: {}", cycle.join(" -> "))]
    CircularAnchor { cycle: Vec<String> },
}

impl LayoutError {
    /// Create a circular anchor error
    pub fn circular(cycle: Vec<String>) -> Self {
        Self::CircularAnchor { cycle }
    }
}
