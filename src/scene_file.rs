//! Scene files: a container and its children described in TOML
//!
//! ```toml
//! [container]
//! width = 100
//! height = 100
//! padding = "4px"
//!
//! [[element]]
//! name = "badge"
//! preferred = [20, 20]
//! insets = "top:10px; left:10px; bottom:auto; right:auto"
//! ```
//!
//! Element constraints use the compact text format of [`crate::parser`];
//! `anchors` are sibling indices in file order.

use std::fmt::Write as _;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::{ConstraintError, ParseError};
use crate::layout::{
    ConstraintSet, Edges, ElementId, Inset, LayeredLayout, LayoutConfig, PassCache, Scene, Side,
    Size,
};
use crate::parser;

/// Errors that can occur when loading a scene file
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse scene TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("{owner}: invalid {field} '{value}': {source}")]
    Invalid {
        owner: String,
        field: &'static str,
        value: String,
        source: ConstraintError,
    },
}

/// TOML structure of a scene file
#[derive(Debug, Clone, Deserialize)]
pub struct SceneFile {
    pub container: ContainerSpec,
    #[serde(default, rename = "element")]
    pub elements: Vec<ElementSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContainerSpec {
    pub width: i32,
    pub height: i32,
    pub padding: Option<String>,
    #[serde(default)]
    pub rtl: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementSpec {
    pub name: Option<String>,
    #[serde(default)]
    pub preferred: [i32; 2],
    pub margin: Option<String>,
    pub insets: Option<String>,
    pub anchors: Option<String>,
    pub positions: Option<String>,
}

/// A scene built from a [`SceneFile`]
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub scene: Scene,
    pub container: ElementId,
    /// Children in file order
    pub elements: Vec<ElementId>,
}

impl SceneFile {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a scene from a TOML string
    pub fn from_str(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    /// Create the container and its children, then apply their constraints
    pub fn build(&self, config: &LayoutConfig) -> Result<LoadedScene, SceneError> {
        let mut scene = Scene::new();
        let root = &self.container;
        let container = scene.add_container(root.width, root.height);
        scene.node_mut(container).rtl = root.rtl;
        if let Some(padding) = &root.padding {
            let padding = box_edges(padding, config)
                .map_err(|e| invalid("container", "padding", padding, e))?;
            scene.set_padding(container, padding);
        }

        let elements: Vec<ElementId> = self
            .elements
            .iter()
            .map(|element| {
                let [width, height] = element.preferred;
                let id = scene.add_element(container, Size::new(width, height));
                if let Some(name) = &element.name {
                    scene.set_name(id, name.clone());
                }
                id
            })
            .collect();

        // Anchors may point forward, so constraints go on once every element exists
        let layout = LayeredLayout::new(config.clone());
        for (element, &id) in self.elements.iter().zip(&elements) {
            let owner = scene.node(id).label(id);
            if let Some(margin) = &element.margin {
                let margin = box_edges(margin, config)
                    .map_err(|e| invalid(&owner, "margin", margin, e))?;
                scene.set_margin(id, margin);
            }
            if let Some(insets) = &element.insets {
                let set = ConstraintSet::from_insets(insets)
                    .map_err(|e| invalid(&owner, "insets", insets, e.into()))?;
                scene.install_constraint(id, set);
            }
            if let Some(positions) = &element.positions {
                scene
                    .get_or_create_constraint(id)
                    .set_anchor_positions(positions)
                    .map_err(|e| invalid(&owner, "positions", positions, e.into()))?;
            }
            if let Some(anchors) = &element.anchors {
                layout
                    .set_anchor_indices(&mut scene, id, anchors)
                    .map_err(|e| invalid(&owner, "anchors", anchors, e))?;
            }
        }

        Ok(LoadedScene {
            scene,
            container,
            elements,
        })
    }
}

impl LoadedScene {
    /// One line per element: `name: x y width height`, followed by the
    /// sides whose auto inset was clipped in the given pass
    pub fn report(&self, cache: &PassCache) -> String {
        let mut out = String::new();
        for &id in &self.elements {
            let node = self.scene.node(id);
            let _ = write!(out, "{}: {}", node.label(id), node.bounds);
            let clipped: Vec<&str> = Side::CLOCKWISE
                .iter()
                .filter(|side| cache.is_clipped(id, **side))
                .map(|side| side.as_str())
                .collect();
            if !clipped.is_empty() {
                let _ = write!(out, " (clipped: {})", clipped.join(", "));
            }
            out.push('\n');
        }
        out
    }

    /// Each element's constraint in labeled form, with anchor indices and positions
    pub fn constraints(&mut self, layout: &LayeredLayout) -> String {
        let mut out = String::new();
        for &id in &self.elements {
            let label = self.scene.node(id).label(id);
            let Some(set) = self.scene.constraint(id) else {
                let _ = writeln!(out, "{}: fill", label);
                continue;
            };
            let insets = set.insets_to_string(true);
            let positions = set.anchor_positions_to_string(false);
            let anchors = layout
                .anchor_indices_to_string(&mut self.scene, id, false)
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "{}: {} | anchors {} | positions {}",
                label, insets, anchors, positions
            );
        }
        out
    }
}

/// Margin or padding from 1-4 values; only px and mm are meaningful here
fn box_edges(text: &str, config: &LayoutConfig) -> Result<Edges<i32>, ConstraintError> {
    let list = parser::parse_insets(text)?;
    let mut edges = Edges::all(0);
    for (side, inset) in list.assignments() {
        *edges.get_mut(side) = match inset {
            Inset::Px(px) => px,
            Inset::Mm(mm) => config.mm_to_px(mm),
            Inset::Percent(_) | Inset::Auto => {
                return Err(ConstraintError::Parse(vec![ParseError::Syntax {
                    span: 0..text.len(),
                    message: format!("{} must be in px or mm", inset),
                    expected: vec!["px".to_string(), "mm".to_string()],
                }]))
            }
        };
    }
    Ok(edges)
}

fn invalid(owner: &str, field: &'static str, value: &str, source: ConstraintError) -> SceneError {
    SceneError::Invalid {
        owner: owner.to_string(),
        field,
        value: value.to_string(),
        source,
    }
}
