// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scalar and point tolerance rules
//!
//! There are two distinct point rules. [`points_equal`] measures the
//! length of the difference vector with a mixed relative/absolute tolerance,
//! [`vertices_equal`] compares each axis with a strict absolute bound. Edge
//! identity uses the latter, face and solid identity the former.

use nalgebra::Point3;

/// Default tolerance for every geometric comparison
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// True if `a` and `b` are within relative or absolute tolerance
pub fn is_close(a: f64, b: f64, rel_tol: f64, abs_tol: f64) -> bool {
    (a - b).abs() <= (rel_tol * a.abs().max(b.abs())).max(abs_tol)
}

/// Distance between the points compared against zero with [`is_close`]
pub fn points_equal(p: &Point3<f64>, q: &Point3<f64>, tolerance: f64) -> bool {
    is_close((p - q).norm(), 0.0, DEFAULT_TOLERANCE, tolerance)
}

/// Axis-wise strict comparison
pub fn vertices_equal(a: &Point3<f64>, b: &Point3<f64>, tolerance: f64) -> bool {
    (a.x - b.x).abs() < tolerance && (a.y - b.y).abs() < tolerance && (a.z - b.z).abs() < tolerance
}
