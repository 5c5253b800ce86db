// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Symmetry planes through the origin

use super::tolerance::is_close;
use crate::error::{FemError, Result};
use crate::kernel::{HalfSpace, Kernel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PLANE_KEYWORDS: [&str; 6] = ["xy", "yx", "xz", "zx", "yz", "zy"];

/// Coordinate plane through the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SymmetryPlane {
    Xy,
    Yz,
    Zx,
}

impl SymmetryPlane {
    /// Index of the coordinate that is zero on the plane
    pub fn normal_index(self) -> usize {
        match self {
            SymmetryPlane::Yz => 0,
            SymmetryPlane::Zx => 1,
            SymmetryPlane::Xy => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SymmetryPlane::Xy => "xy",
            SymmetryPlane::Yz => "yz",
            SymmetryPlane::Zx => "zx",
        }
    }
}

impl fmt::Display for SymmetryPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymmetryPlane {
    type Err = FemError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "xy" | "yx" => Ok(SymmetryPlane::Xy),
            "yz" | "zy" => Ok(SymmetryPlane::Yz),
            "zx" | "xz" => Ok(SymmetryPlane::Zx),
            other => Err(FemError::invalid_parameter(
                "symmetry plane",
                other,
                &PLANE_KEYWORDS,
            )),
        }
    }
}

impl TryFrom<String> for SymmetryPlane {
    type Error = FemError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SymmetryPlane> for String {
    fn from(plane: SymmetryPlane) -> Self {
        plane.as_str().to_string()
    }
}

/// Faces whose vertices and center of mass all lie on the plane
pub fn faces_in_symmetry_plane<K: Kernel>(
    kernel: &K,
    faces: &[K::Face],
    plane: SymmetryPlane,
    tolerance: f64,
) -> Vec<K::Face> {
    let axis = plane.normal_index();
    let on_plane = |value: f64| is_close(value, 0.0, tolerance, tolerance);

    faces
        .iter()
        .filter(|face| {
            on_plane(kernel.face_center_of_mass(face)[axis])
                && kernel
                    .face_vertices(face)
                    .iter()
                    .all(|vertex| on_plane(vertex[axis]))
        })
        .cloned()
        .collect()
}

/// Cut a solid successively with each plane, last plane first.
///
/// `Negative` removes the positive side of every plane, `Positive` keeps it.
pub fn reduce_half_symmetry<K: Kernel>(
    kernel: &K,
    solid: &K::Solid,
    planes: &[SymmetryPlane],
    keep: HalfSpace,
) -> Result<K::Solid> {
    let mut reduced = solid.clone();
    for plane in planes.iter().rev() {
        reduced = kernel.half_space(&reduced, *plane, keep)?;
    }
    Ok(reduced)
}
