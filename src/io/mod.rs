//! Mesh file I/O.
//!
//! This module provides functions for loading and saving meshes in various formats.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Loose edges | Notes |
//! |--------|-----------|------|------|-------------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | ✓ (`l`) | N-gons kept |
//! | PLY | `.ply` | ✓ | ✓ | ✓ (`edge`) | ASCII save |
//! | STL | `.stl` | ✓ | ✓ | ✗ | Triangles only, binary save |
//! | glTF | `.gltf`, `.glb` | ✓ | ✗ | ✓ (lines) | Node transforms baked |
//!
//! Selection reports are written as JSON by [`report`].
//!
//! # Usage
//!
//! ```no_run
//! use volsel::io::{load, save};
//! use volsel::mesh::EditMesh;
//!
//! // Load with automatic format detection
//! let mesh: EditMesh = load("scene.obj").unwrap();
//!
//! // Save with automatic format detection
//! save(&mesh, "output.ply").unwrap();
//! ```

pub mod gltf;
pub mod obj;
pub mod ply;
pub mod report;
pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{EditMesh, MeshIndex};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
    /// glTF format.
    Gltf,
    /// glTF binary format.
    Glb,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            "gltf" => Some(Format::Gltf),
            "glb" => Some(Format::Glb),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension. The loaded mesh has an
/// identity transform; glTF node transforms are already applied to positions.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<EditMesh<I>> {
    let path = path.as_ref();
    let mesh = match detect(path)? {
        Format::Obj => obj::load(path),
        Format::Stl => stl::load(path),
        Format::Ply => ply::load(path),
        Format::Gltf | Format::Glb => gltf::load(path),
    }?;

    log::debug!(
        "loaded {}: {} vertices, {} edges, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_edges(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Save a mesh to a file with automatic format detection.
///
/// Positions are written in object space; call
/// [`EditMesh::apply_transform`] first to write world-space positions.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &EditMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
        Format::Gltf | Format::Glb => Err(MeshError::SaveError {
            path: path.to_path_buf(),
            message: "glTF saving is not supported".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/scene.OBJ"), Some(Format::Obj));
        assert_eq!(Format::from_path("model.glb"), Some(Format::Glb));
        assert_eq!(Format::from_path("notes.txt"), None);
        assert_eq!(Format::from_path("noext"), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let result: Result<EditMesh> = load("scene.fbx");
        assert!(matches!(
            result,
            Err(MeshError::UnsupportedFormat { extension }) if extension == "fbx"
        ));
    }
}
