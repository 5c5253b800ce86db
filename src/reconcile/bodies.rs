// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Body groups from solid entities

use super::group::{GroupKind, MeshGroup};
use crate::entities::Entity;
use crate::error::Result;
use crate::locator::SolidLocator;
use ahash::AHashMap;
use tracing::debug;

/// Build body groups for a list of solid entities.
///
/// Entities sharing a name accumulate into one group whose mesh size comes
/// from the first of them. Overlaps between groups are not resolved.
pub fn reconcile_bodies<S, L>(entities: &[Entity<S>], locator: &L) -> Result<Vec<MeshGroup>>
where
    L: SolidLocator<S> + ?Sized,
{
    let mut groups: Vec<MeshGroup> = Vec::new();
    let mut by_name: AHashMap<&str, usize> = AHashMap::new();

    for entity in entities {
        let indices = locator
            .contained_solids(&entity.geometry)
            .map_err(|e| e.for_entity(&entity.name))?;
        debug!(entity = %entity.name, solids = ?indices, "reconciling body");

        let id = *by_name.entry(entity.name.as_str()).or_insert_with(|| {
            groups.push(MeshGroup::new(&entity.name, GroupKind::Body, entity.mesh_size));
            groups.len() - 1
        });
        let group = &mut groups[id];
        for index in indices {
            if !group.contains(index) {
                group.references.push(index);
            }
        }
    }
    Ok(groups)
}
