// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Turning named entities into disjoint mesh groups

mod bodies;
mod boundaries;
mod group;

pub use bodies::reconcile_bodies;
pub use boundaries::{reconcile_boundaries, BoundaryReconciler};
pub use group::{GroupKind, MeshGroup};
