// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - tolerance rules, comparisons and witness points

mod bbox;
pub mod compare;
mod symmetry;
mod tolerance;
pub mod witness;

pub use bbox::BoundingBox;
pub use compare::{
    compound_solid_in_solid, contains_face, edge_in_solid, edges_equal, face_in_face,
    face_in_solid, faces_equal, faces_have_same_vertices, faces_same_center_of_mass,
    point_in_face, point_in_solid, remove_matching_face, remove_matching_faces, solids_equal,
};
pub use symmetry::{faces_in_symmetry_plane, reduce_half_symmetry, SymmetryPlane};
pub use tolerance::{is_close, points_equal, vertices_equal, DEFAULT_TOLERANCE};
pub use witness::{face_witness_point, point_in_solid_rounded, solid_witness_point};
