// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Region-wise mesh sizes

use crate::entities::Entity;
use crate::error::Result;
use crate::locator::SolidLocator;
use crate::reconcile::{GroupKind, MeshGroup};
use serde::{Deserialize, Serialize};

/// Mesh size applied to a set of compound entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshRegion {
    pub name: String,
    pub kind: GroupKind,
    pub references: Vec<usize>,
    pub mesh_size: Option<f64>,
}

impl MeshRegion {
    /// Label used for the region in generated files
    pub fn label(&self) -> String {
        format!("{}_region", self.name)
    }

    fn absorb(&mut self, references: &[usize], mesh_size: Option<f64>) {
        for index in references {
            if !self.references.contains(index) {
                self.references.push(*index);
            }
        }
        self.mesh_size = mesh_size;
    }
}

fn upsert(regions: &mut Vec<MeshRegion>, name: &str, kind: GroupKind, references: &[usize], mesh_size: Option<f64>) {
    match regions.iter_mut().find(|r| r.name == name && r.kind == kind) {
        Some(region) => region.absorb(references, mesh_size),
        None => regions.push(MeshRegion {
            name: name.to_string(),
            kind,
            references: references.to_vec(),
            mesh_size,
        }),
    }
}

/// One region per group whose label is not in `ignore`.
///
/// A later group with an already-seen label extends that region and replaces
/// its mesh size.
pub fn regions_from_groups(groups: &[MeshGroup], ignore: &[String]) -> Vec<MeshRegion> {
    let mut regions = Vec::new();
    for group in groups {
        if ignore.iter().any(|name| *name == group.label) {
            continue;
        }
        upsert(&mut regions, &group.label, group.kind, &group.references, group.mesh_size);
    }
    regions
}

/// Body regions located directly from solid entities
pub fn regions_from_registry<S, L>(
    solids: &[Entity<S>],
    locator: &L,
    ignore: &[String],
) -> Result<Vec<MeshRegion>>
where
    L: SolidLocator<S> + ?Sized,
{
    let mut regions = Vec::new();
    for entity in solids {
        if ignore.iter().any(|name| *name == entity.name) {
            continue;
        }
        let references = locator
            .contained_solids(&entity.geometry)
            .map_err(|e| e.for_entity(&entity.name))?;
        upsert(&mut regions, &entity.name, GroupKind::Body, &references, entity.mesh_size);
    }
    Ok(regions)
}
