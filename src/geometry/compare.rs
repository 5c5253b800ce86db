// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tolerance-based identity and containment of kernel entities
//!
//! None of these predicates is transitive. Two distinct near-coincident
//! entities may both match a third one without matching each other.

use super::tolerance::{points_equal, vertices_equal};
use super::witness::{
    face_witness_point, point_in_solid_rounded, solid_witness_point, DEFAULT_ROUND_DIGITS,
};
use crate::error::{FemError, Result};
use crate::kernel::Kernel;
use nalgebra::Point3;

/// Undirected edge identity: end points match in either order
pub fn edges_equal<K: Kernel>(kernel: &K, a: &K::Edge, b: &K::Edge, tolerance: f64) -> bool {
    let (va, vb) = (kernel.edge_vertices(a), kernel.edge_vertices(b));
    if va.len() < 2 || vb.len() < 2 {
        return false;
    }
    if vertices_equal(&va[0], &vb[0], tolerance) {
        vertices_equal(&va[1], &vb[1], tolerance)
    } else if vertices_equal(&va[0], &vb[1], tolerance) {
        vertices_equal(&va[1], &vb[0], tolerance)
    } else {
        false
    }
}

pub fn faces_same_center_of_mass<K: Kernel>(
    kernel: &K,
    a: &K::Face,
    b: &K::Face,
    tolerance: f64,
) -> bool {
    points_equal(
        &kernel.face_center_of_mass(a),
        &kernel.face_center_of_mass(b),
        tolerance,
    )
}

/// Number of matching pairs equals both vertex counts.
///
/// Rejects faces whose vertices are a strict subset of the other's.
pub fn faces_have_same_vertices<K: Kernel>(
    kernel: &K,
    a: &K::Face,
    b: &K::Face,
    tolerance: f64,
) -> bool {
    let (va, vb) = (kernel.face_vertices(a), kernel.face_vertices(b));
    matching_pairs(&va, &vb, |p, q| points_equal(p, q, tolerance)) == va.len()
        && va.len() == vb.len()
}

pub fn faces_equal<K: Kernel>(kernel: &K, a: &K::Face, b: &K::Face, tolerance: f64) -> bool {
    faces_same_center_of_mass(kernel, a, b, tolerance)
        && faces_have_same_vertices(kernel, a, b, tolerance)
}

/// Same face count and every face pairs up through [`faces_equal`]
pub fn solids_equal<K: Kernel>(kernel: &K, a: &K::Solid, b: &K::Solid, tolerance: f64) -> bool {
    let (fa, fb) = (kernel.solid_faces(a), kernel.solid_faces(b));
    matching_pairs(&fa, &fb, |f, g| faces_equal(kernel, f, g, tolerance)) == fa.len()
        && fa.len() == fb.len()
}

fn matching_pairs<T>(a: &[T], b: &[T], same: impl Fn(&T, &T) -> bool) -> usize {
    b.iter()
        .map(|y| a.iter().filter(|x| same(x, y)).count())
        .sum()
}

/// True if `face` is in `faces` according to [`faces_equal`]
pub fn contains_face<K: Kernel>(kernel: &K, face: &K::Face, faces: &[K::Face], tolerance: f64) -> bool {
    faces.iter().any(|f| faces_equal(kernel, face, f, tolerance))
}

/// Remove and return the first face of the list matching `face`
pub fn remove_matching_face<K: Kernel>(
    kernel: &K,
    face: &K::Face,
    faces: &mut Vec<K::Face>,
    tolerance: f64,
) -> Option<K::Face> {
    let position = faces
        .iter()
        .position(|f| faces_equal(kernel, face, f, tolerance))?;
    Some(faces.remove(position))
}

/// Remove every face of `compare` from `faces`, one match per entry
pub fn remove_matching_faces<K: Kernel>(
    kernel: &K,
    compare: &[K::Face],
    faces: &mut Vec<K::Face>,
    tolerance: f64,
) -> Vec<Option<K::Face>> {
    compare
        .iter()
        .map(|face| remove_matching_face(kernel, face, faces, tolerance))
        .collect()
}

/// Kernel inside test on a face, boundary included
pub fn point_in_face<K: Kernel>(kernel: &K, face: &K::Face, point: &Point3<f64>, tolerance: f64) -> bool {
    kernel.face_contains(face, point, tolerance)
}

pub fn point_in_solid<K: Kernel>(
    kernel: &K,
    solid: &K::Solid,
    point: &Point3<f64>,
    tolerance: f64,
    include_boundary: bool,
) -> bool {
    kernel.solid_contains(solid, point, tolerance, include_boundary)
}

/// All vertices and one witness point of `inner` lie on `outer`
pub fn face_in_face<K: Kernel>(
    kernel: &K,
    inner: &K::Face,
    outer: &K::Face,
    tolerance: f64,
) -> Result<bool> {
    if !kernel
        .face_vertices(inner)
        .iter()
        .all(|v| point_in_face(kernel, outer, v, tolerance))
    {
        return Ok(false);
    }
    let witness = face_witness_point(kernel, inner)
        .ok_or_else(|| FemError::GeometryNotFound("face witness point".into()))?;
    Ok(point_in_face(kernel, outer, &witness, tolerance))
}

/// All vertices and one witness point of `face` lie in `solid`.
///
/// `use_round` switches to the 8-point rounded inside test.
pub fn face_in_solid<K: Kernel>(
    kernel: &K,
    solid: &K::Solid,
    face: &K::Face,
    tolerance: f64,
    use_round: bool,
) -> Result<bool> {
    let inside = |p: &Point3<f64>| {
        if use_round {
            point_in_solid_rounded(kernel, solid, p, tolerance, DEFAULT_ROUND_DIGITS)
        } else {
            point_in_solid(kernel, solid, p, tolerance, true)
        }
    };
    if !kernel.face_vertices(face).iter().all(|v| inside(v)) {
        return Ok(false);
    }
    let witness = face_witness_point(kernel, face)
        .ok_or_else(|| FemError::GeometryNotFound("face witness point".into()))?;
    Ok(inside(&witness))
}

/// Both end points of the edge lie in the solid
pub fn edge_in_solid<K: Kernel>(kernel: &K, solid: &K::Solid, edge: &K::Edge, tolerance: f64) -> bool {
    kernel
        .edge_vertices(edge)
        .iter()
        .all(|v| point_in_solid(kernel, solid, v, tolerance, true))
}

/// Whether a compound-filter solid belongs to an original solid.
///
/// With `point_search` a witness point of the compound solid is tested,
/// otherwise the boolean common must have positive volume.
pub fn compound_solid_in_solid<K: Kernel>(
    kernel: &K,
    compound_solid: &K::Solid,
    solid: &K::Solid,
    tolerance: f64,
    point_search: bool,
) -> Result<bool> {
    if point_search {
        let witness = solid_witness_point(kernel, compound_solid, tolerance)
            .ok_or_else(|| FemError::GeometryNotFound("solid witness point".into()))?;
        return Ok(point_in_solid(kernel, solid, &witness, tolerance, true));
    }
    Ok(kernel.common_volume(compound_solid, solid) > 0.0)
}
