//! Volume-based selection of loose mesh parts.
//!
//! The selection pipeline has four steps, each in its own module:
//!
//! - [`parts`]: split the mesh into loose (edge-connected) parts
//! - [`volume`]: measure each part's world-space bounding-box volume
//! - [`range`]: test volumes against threshold ranges with optional Min/Max
//! - [`apply`]: write vertex / edge / face selection flags for matching parts
//!
//! # Example
//!
//! ```no_run
//! use volsel::prelude::*;
//!
//! let mut mesh: EditMesh = volsel::io::load("scene.obj").unwrap();
//!
//! let ranges: Vec<ThresholdRange> = vec![":0.01".parse().unwrap(), "1:".parse().unwrap()];
//! let options = SelectOptions::default().with_mode(SelectMode::FACES);
//! let report = select_by_ranges(&mut mesh, &ranges, &options).unwrap();
//! println!("{} of {} parts selected", report.num_matched(), report.parts.len());
//! ```

pub mod apply;
pub mod parts;
pub mod progress;
pub mod range;
pub mod volume;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MeshError;
use crate::mesh::ElementKind;

pub use apply::{select_by_ranges, select_by_ranges_with_progress, PartReport, SelectionReport};
pub use parts::{find_loose_parts, LoosePart, LooseParts};
pub use progress::Progress;
pub use range::{first_match, matches_any, Direction, RangeList, ThresholdRange};
pub use volume::{part_bounds, part_volume, part_volumes, Aabb};

/// Which element kinds a selection pass writes.
///
/// Several kinds may be enabled at once, as in a modelling tool's element
/// selection toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectMode {
    /// Write vertex selection.
    pub vertices: bool,
    /// Write edge selection.
    pub edges: bool,
    /// Write face selection.
    pub faces: bool,
}

impl SelectMode {
    /// No kinds enabled.
    pub const NONE: Self = Self {
        vertices: false,
        edges: false,
        faces: false,
    };
    /// Vertices only.
    pub const VERTICES: Self = Self {
        vertices: true,
        edges: false,
        faces: false,
    };
    /// Edges only.
    pub const EDGES: Self = Self {
        vertices: false,
        edges: true,
        faces: false,
    };
    /// Faces only.
    pub const FACES: Self = Self {
        vertices: false,
        edges: false,
        faces: true,
    };
    /// All three kinds.
    pub const ALL: Self = Self {
        vertices: true,
        edges: true,
        faces: true,
    };

    /// Check if no kind is enabled.
    pub fn is_empty(&self) -> bool {
        !(self.vertices || self.edges || self.faces)
    }

    /// Check whether a kind is enabled.
    pub fn contains(&self, kind: ElementKind) -> bool {
        match kind {
            ElementKind::Vertex => self.vertices,
            ElementKind::Edge => self.edges,
            ElementKind::Face => self.faces,
        }
    }

    /// Iterate over the enabled kinds.
    pub fn kinds(self) -> impl Iterator<Item = ElementKind> {
        [ElementKind::Vertex, ElementKind::Edge, ElementKind::Face]
            .into_iter()
            .filter(move |&k| self.contains(k))
    }

    /// Combine two modes.
    pub fn union(self, other: Self) -> Self {
        Self {
            vertices: self.vertices || other.vertices,
            edges: self.edges || other.edges,
            faces: self.faces || other.faces,
        }
    }
}

impl Default for SelectMode {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for SelectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = self
            .kinds()
            .map(|k| match k {
                ElementKind::Vertex => "vert",
                ElementKind::Edge => "edge",
                ElementKind::Face => "face",
            })
            .collect();
        write!(f, "{}", names.join(","))
    }
}

/// Parses a comma-separated list such as `vert,face`, `e`, or `all`.
impl FromStr for SelectMode {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mode = SelectMode::NONE;
        for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let kind = match token.to_lowercase().as_str() {
                "v" | "vert" | "verts" | "vertex" | "vertices" => SelectMode::VERTICES,
                "e" | "edge" | "edges" => SelectMode::EDGES,
                "f" | "face" | "faces" => SelectMode::FACES,
                "all" => SelectMode::ALL,
                _ => {
                    return Err(MeshError::invalid_param(
                        "mode",
                        token,
                        "expected vert, edge, face, or all",
                    ))
                }
            };
            mode = mode.union(kind);
        }
        if mode.is_empty() {
            return Err(MeshError::invalid_param("mode", s, "no element kind given"));
        }
        Ok(mode)
    }
}

/// Options for a selection pass.
#[derive(Debug, Clone)]
pub struct SelectOptions {
    /// Element kinds to write.
    pub mode: SelectMode,

    /// Whether to measure parts in parallel (default: true).
    pub parallel: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            mode: SelectMode::default(),
            parallel: true,
        }
    }
}

impl SelectOptions {
    /// Set the element kinds to write.
    pub fn with_mode(mut self, mode: SelectMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!("vert".parse::<SelectMode>().unwrap(), SelectMode::VERTICES);
        assert_eq!(
            "v, F".parse::<SelectMode>().unwrap(),
            SelectMode::VERTICES.union(SelectMode::FACES)
        );
        assert_eq!("all".parse::<SelectMode>().unwrap(), SelectMode::ALL);
        assert!("".parse::<SelectMode>().is_err());
        assert!("vert,loop".parse::<SelectMode>().is_err());
    }

    #[test]
    fn test_display_mode() {
        assert_eq!(SelectMode::ALL.to_string(), "vert,edge,face");
        assert_eq!(SelectMode::EDGES.to_string(), "edge");
        assert_eq!(SelectMode::NONE.to_string(), "none");
    }

    #[test]
    fn test_kinds() {
        let kinds: Vec<ElementKind> = SelectMode::EDGES.union(SelectMode::FACES).kinds().collect();
        assert_eq!(kinds, vec![ElementKind::Edge, ElementKind::Face]);
    }
}
