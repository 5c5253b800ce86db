// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry kernel contract
//!
//! The preprocessing code never builds or mutates geometry on its own. Every
//! geometric fact it needs (boundary lists, centers of mass, parametric
//! evaluation, inside tests, booleans) is asked from a [`Kernel`]
//! implementation. [`aabb::AabbKernel`] is a small reference implementation
//! for axis-aligned boxes.

pub mod aabb;

use crate::error::Result;
use crate::geometry::{BoundingBox, SymmetryPlane};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Parametric rectangle `(u_min, u_max, v_min, v_max)` of a face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub u_min: f64,
    pub u_max: f64,
    pub v_min: f64,
    pub v_max: f64,
}

impl ParameterRange {
    pub fn new(u_min: f64, u_max: f64, v_min: f64, v_max: f64) -> Self {
        Self {
            u_min,
            u_max,
            v_min,
            v_max,
        }
    }

    pub fn u_len(&self) -> f64 {
        self.u_max - self.u_min
    }

    pub fn v_len(&self) -> f64 {
        self.v_max - self.v_min
    }
}

/// How the input solids are combined before building the compound filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundMode {
    /// Plain compound: shared faces stay duplicated, one per input solid
    Plain,
    /// Boolean fragments: coincident geometry is split and shared
    BooleanFragments,
    /// Symmetric difference: regions covered by an even number of solids
    /// are removed, shared faces are split as for fragments
    Xor,
}

/// Which side of a symmetry plane survives a half-space cut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfSpace {
    /// Keep coordinates below the plane (the tool box is cut away)
    Negative,
    /// Keep coordinates above the plane (common with the tool box)
    Positive,
}

/// Oracle interface to a CAD geometry kernel
pub trait Kernel {
    type Edge: Clone + Debug;
    type Face: Clone + Debug;
    type Solid: Clone + Debug;

    /// End points of an edge, in kernel order
    fn edge_vertices(&self, edge: &Self::Edge) -> Vec<Point3<f64>>;

    fn face_vertices(&self, face: &Self::Face) -> Vec<Point3<f64>>;
    fn face_edges(&self, face: &Self::Face) -> Vec<Self::Edge>;
    fn face_center_of_mass(&self, face: &Self::Face) -> Point3<f64>;
    fn face_parameter_range(&self, face: &Self::Face) -> ParameterRange;
    fn face_value_at(&self, face: &Self::Face, u: f64, v: f64) -> Point3<f64>;
    fn face_is_part_of_domain(&self, face: &Self::Face, u: f64, v: f64) -> bool;

    /// Inside test on a face; the boundary counts as inside
    fn face_contains(&self, face: &Self::Face, point: &Point3<f64>, tolerance: f64) -> bool;

    /// Shortest distance from a point to an edge
    fn distance_to_edge(&self, point: &Point3<f64>, edge: &Self::Edge) -> f64;

    fn solid_faces(&self, solid: &Self::Solid) -> Vec<Self::Face>;
    fn solid_edges(&self, solid: &Self::Solid) -> Vec<Self::Edge>;
    fn solid_bounding_box(&self, solid: &Self::Solid) -> BoundingBox;

    fn solid_contains(
        &self,
        solid: &Self::Solid,
        point: &Point3<f64>,
        tolerance: f64,
        include_boundary: bool,
    ) -> bool;

    /// Volume of the boolean common of two solids
    fn common_volume(&self, a: &Self::Solid, b: &Self::Solid) -> f64;

    /// Cut a solid with a symmetry plane, keeping one side
    fn half_space(
        &self,
        solid: &Self::Solid,
        plane: SymmetryPlane,
        keep: HalfSpace,
    ) -> Result<Self::Solid>;

    /// Combine solids and renumber the result into a compound filter
    fn compound_filter(
        &self,
        solids: &[Self::Solid],
        mode: CompoundMode,
    ) -> Result<CompoundFilter<Self>>;
}

/// Renumbered geometry produced from a set of input solids.
///
/// Entities are only addressable by their 1-based position.
#[derive(Debug, Clone)]
pub struct CompoundFilter<K: Kernel + ?Sized> {
    faces: Vec<K::Face>,
    solids: Vec<K::Solid>,
    edges: Vec<K::Edge>,
}

impl<K: Kernel + ?Sized> CompoundFilter<K> {
    pub fn new(faces: Vec<K::Face>, solids: Vec<K::Solid>, edges: Vec<K::Edge>) -> Self {
        Self {
            faces,
            solids,
            edges,
        }
    }

    pub fn faces(&self) -> &[K::Face] {
        &self.faces
    }

    pub fn solids(&self) -> &[K::Solid] {
        &self.solids
    }

    pub fn edges(&self) -> &[K::Edge] {
        &self.edges
    }

    /// Face by 1-based index
    pub fn face(&self, index: usize) -> Option<&K::Face> {
        index.checked_sub(1).and_then(|i| self.faces.get(i))
    }

    /// Solid by 1-based index
    pub fn solid(&self, index: usize) -> Option<&K::Solid> {
        index.checked_sub(1).and_then(|i| self.solids.get(i))
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }
}
