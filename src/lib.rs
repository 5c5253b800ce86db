// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! femprep
//!
//! FEM preprocessing on top of a CAD geometry kernel. Named faces and solids
//! are tracked through boolean fragmentation by geometric comparison, turned
//! into disjoint mesh groups with mesh sizes, and handed to gmsh and
//! ElmerGrid.

pub mod config;
pub mod entities;
pub mod error;
pub mod export;
pub mod geometry;
pub mod kernel;
pub mod locator;
pub mod mesh;
pub mod pipeline;
pub mod reconcile;

pub use config::PreprocessConfig;
pub use entities::{merge_registries, Entity, EntityRegistry, MeshSizes, PrefixPolicy};
pub use error::{FemError, Result};
pub use kernel::{CompoundFilter, CompoundMode, Kernel};
pub use locator::{CompoundFilterLocator, FaceLocator, SolidLocator};
pub use mesh::{GmshRunner, MeshOutcome, MeshRegion, MeshSettings};
pub use pipeline::{MeshReport, Preprocessor};
pub use reconcile::{GroupKind, MeshGroup};
