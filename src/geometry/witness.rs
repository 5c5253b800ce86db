// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Interior sample points for faces and solids
//!
//! Comparing boundaries alone cannot tell "touches" from "lies inside". A
//! witness point is one deterministic point strictly inside a face or solid
//! that containment tests can probe in addition to the vertices.

use super::tolerance::DEFAULT_TOLERANCE;
use crate::kernel::Kernel;
use nalgebra::Point3;
use tracing::trace;

/// Grid subdivision counts, the first 100 primes.
///
/// Distinct primes never put two passes on the same interior grid node.
pub const SUBDIVISIONS: [usize; 100] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307,
    311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419, 421,
    431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509, 521, 523, 541,
];

/// Default decimal precision for [`point_in_solid_rounded`]
pub const DEFAULT_ROUND_DIGITS: i32 = 6;

/// True if the point lies within `tolerance` of any edge of the face
pub fn is_point_on_face_edges<K: Kernel>(
    kernel: &K,
    face: &K::Face,
    point: &Point3<f64>,
    tolerance: f64,
) -> bool {
    kernel
        .face_edges(face)
        .iter()
        .any(|edge| kernel.distance_to_edge(point, edge) < tolerance)
}

/// Walk diagonally from the parametric minimum corner in unit steps.
///
/// A probe is only considered once at least two coordinates moved a full unit
/// away from the corner. Probes on an edge are nudged along `v`. The first
/// considered probe decides: it is returned when it lies on the domain,
/// otherwise the walk gives up.
pub fn probe_near_corner<K: Kernel>(kernel: &K, face: &K::Face) -> Option<Point3<f64>> {
    let range = kernel.face_parameter_range(face);
    let corner = kernel.face_value_at(face, range.u_min, range.v_min);
    let (mut u, mut v) = (range.u_min + 1.0, range.v_min + 1.0);

    while u < range.u_max && v < range.v_max {
        let probe = kernel.face_value_at(face, u, v);
        let moved = [
            (corner.x - probe.x).abs() >= 1.0,
            (corner.y - probe.y).abs() >= 1.0,
            (corner.z - probe.z).abs() >= 1.0,
        ]
        .iter()
        .filter(|m| **m)
        .count();

        if moved > 1 {
            if is_point_on_face_edges(kernel, face, &probe, DEFAULT_TOLERANCE) {
                v += 0.5;
                continue;
            }
            if kernel.face_is_part_of_domain(face, u, v) {
                return Some(probe);
            }
            return None;
        }
        u += 1.0;
        v += 1.0;
    }
    None
}

/// Prime-subdivision grid search over the parametric rectangle.
///
/// Scans subdivision counts ascending, then rows, then columns, and returns
/// the first interior grid node that lies on the face domain.
pub fn face_grid_point<K: Kernel>(kernel: &K, face: &K::Face) -> Option<Point3<f64>> {
    let range = kernel.face_parameter_range(face);
    let (u_len, v_len) = (range.u_len(), range.v_len());

    for &count in SUBDIVISIONS.iter() {
        let (u_step, v_step) = (u_len / count as f64, v_len / count as f64);
        for i in 1..count {
            let u = range.u_min + i as f64 * u_step;
            for j in 1..count {
                let v = range.v_min + j as f64 * v_step;
                if kernel.face_is_part_of_domain(face, u, v) {
                    trace!(count, i, j, "face witness from grid");
                    return Some(kernel.face_value_at(face, u, v));
                }
            }
        }
    }
    None
}

/// Witness point of a face: corner probe first, grid search as fallback
pub fn face_witness_point<K: Kernel>(kernel: &K, face: &K::Face) -> Option<Point3<f64>> {
    probe_near_corner(kernel, face).or_else(|| face_grid_point(kernel, face))
}

/// Witness point of a solid from a prime grid over its bounding box.
///
/// Only points strictly inside the solid (boundary excluded) qualify.
pub fn solid_witness_point<K: Kernel>(
    kernel: &K,
    solid: &K::Solid,
    tolerance: f64,
) -> Option<Point3<f64>> {
    let bbox = kernel.solid_bounding_box(solid);
    let size = bbox.size();

    for &count in SUBDIVISIONS.iter() {
        let step = size / count as f64;
        for i in 1..count {
            let x = bbox.min.x + i as f64 * step.x;
            for j in 1..count {
                let y = bbox.min.y + j as f64 * step.y;
                for k in 1..count {
                    let point = Point3::new(x, y, bbox.min.z + k as f64 * step.z);
                    if kernel.solid_contains(solid, &point, tolerance, false) {
                        return Some(point);
                    }
                }
            }
        }
    }
    None
}

/// Inside test that also tries the floor/ceil roundings of each coordinate.
///
/// Kernels sometimes reject points that sit on a face by a few ulps. Every
/// one of the 8 rounded corners around the point is tested with the boundary
/// included, and any hit counts.
pub fn point_in_solid_rounded<K: Kernel>(
    kernel: &K,
    solid: &K::Solid,
    point: &Point3<f64>,
    tolerance: f64,
    digits: i32,
) -> bool {
    let scale = 10f64.powi(digits);
    let bounds = |c: f64| [(scale * c).floor() / scale, (scale * c).ceil() / scale];
    let (xs, ys, zs) = (bounds(point.x), bounds(point.y), bounds(point.z));

    xs.iter().any(|&x| {
        ys.iter().any(|&y| {
            zs.iter()
                .any(|&z| kernel.solid_contains(solid, &Point3::new(x, y, z), tolerance, true))
        })
    })
}
