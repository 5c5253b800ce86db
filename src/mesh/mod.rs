// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh generation with gmsh

mod geo;
mod gmsh;
mod regions;
mod settings;

pub use geo::GeoScript;
pub use gmsh::{strip_ansi, GmshRunner, MeshOutcome};
pub use regions::{regions_from_groups, regions_from_registry, MeshRegion};
pub use settings::{Algorithm2D, Algorithm3D, MeshSettings};
