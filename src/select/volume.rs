//! World-space bounding-box volumes of loose parts.
//!
//! The volume of a part is the product of the extents of the axis-aligned box
//! around its vertices after the mesh transform has been applied to each
//! vertex. Rotating an object therefore changes the volume of its parts, as
//! the box is re-fitted in world axes.
//!
//! Parts with no extent along some axis (a lone vertex, a straight wire, a flat
//! plate) have volume zero.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use super::parts::{LoosePart, LooseParts};
use crate::mesh::{EditMesh, MeshIndex};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Box around a single point.
    pub fn from_point(p: Point3<f64>) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest box containing all points, or `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = Point3<f64>>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut aabb = Self::from_point(points.next()?);
        for p in points {
            aabb.grow(&p);
        }
        Some(aabb)
    }

    /// Extend the box to contain `p`.
    #[inline]
    pub fn grow(&mut self, p: &Point3<f64>) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    /// Edge lengths along X, Y, and Z.
    #[inline]
    pub fn extent(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Absolute product of the extents.
    #[inline]
    pub fn volume(&self) -> f64 {
        let size = self.extent();
        (size.x * size.y * size.z).abs()
    }

    /// Center of the box.
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// World-space bounding box of a part, or `None` for an empty part.
pub fn part_bounds<I: MeshIndex>(mesh: &EditMesh<I>, part: &LoosePart<I>) -> Option<Aabb> {
    Aabb::from_points(part.vertices.iter().map(|&v| mesh.world_position(v)))
}

/// World-space bounding-box volume of a part. Empty parts have volume zero.
pub fn part_volume<I: MeshIndex>(mesh: &EditMesh<I>, part: &LoosePart<I>) -> f64 {
    part_bounds(mesh, part).map_or(0.0, |b| b.volume())
}

/// World-space bounding boxes of all parts, indexed like `parts`.
pub fn part_bounds_all<I: MeshIndex>(
    mesh: &EditMesh<I>,
    parts: &LooseParts<I>,
    parallel: bool,
) -> Vec<Option<Aabb>> {
    if parallel {
        parts
            .parts()
            .par_iter()
            .map(|part| part_bounds(mesh, part))
            .collect()
    } else {
        parts.iter().map(|part| part_bounds(mesh, part)).collect()
    }
}

/// World-space bounding-box volumes of all parts, indexed like `parts`.
pub fn part_volumes<I: MeshIndex>(
    mesh: &EditMesh<I>,
    parts: &LooseParts<I>,
    parallel: bool,
) -> Vec<f64> {
    part_bounds_all(mesh, parts, parallel)
        .into_iter()
        .map(|b| b.map_or(0.0, |b| b.volume()))
        .collect()
}
