// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boundary reconciliation
//!
//! Several named input faces may cover the same compound face, for example
//! the two sides of an interface between touching solids. Each compound face
//! must end up in exactly one surface group, and the label of that group
//! records every entity that contributed to it, joined with `_` in
//! contribution order.
//!
//! Transitions when an entity lands on a compound face owned by another group:
//!
//! * the owner holds only that face: the owner is renamed to
//!   `<owner>_<entity>`. Both labels keep resolving to it afterwards. If the
//!   new label already exists the owner is folded into that group.
//! * the owner holds more faces: the face moves to `<owner>_<entity>`, which
//!   is created on first use.

use super::group::{GroupKind, MeshGroup};
use crate::entities::Entity;
use crate::error::Result;
use crate::locator::FaceLocator;
use ahash::AHashMap;
use tracing::debug;

type GroupId = usize;

/// Incremental surface group builder
#[derive(Debug, Default)]
pub struct BoundaryReconciler {
    groups: Vec<Option<MeshGroup>>,
    by_name: AHashMap<String, GroupId>,
    owner: AHashMap<usize, GroupId>,
    /// Compound faces handed out so far (separate-boundaries mode only)
    used: Vec<usize>,
    separate_boundaries: bool,
}

impl BoundaryReconciler {
    /// With `separate_boundaries`, a compound face already claimed by an
    /// earlier entity is never located again for a later one.
    pub fn new(separate_boundaries: bool) -> Self {
        Self {
            separate_boundaries,
            ..Self::default()
        }
    }

    /// Fold one face entity into the groups
    pub fn add<F, L>(&mut self, entity: &Entity<F>, locator: &L) -> Result<()>
    where
        L: FaceLocator<F> + ?Sized,
    {
        let indices = if self.separate_boundaries {
            let found = locator
                .contained_faces(&entity.geometry, Some(self.used.as_slice()))
                .map_err(|e| e.for_entity(&entity.name))?;
            self.used.extend(found.iter().copied());
            found
        } else {
            locator
                .contained_faces(&entity.geometry, None)
                .map_err(|e| e.for_entity(&entity.name))?
        };
        debug!(entity = %entity.name, faces = ?indices, "reconciling boundary");

        let mut own = self.by_name.get(&entity.name).copied();
        for index in indices {
            match self.owner.get(&index).copied() {
                Some(owner) if Some(owner) == own => {}
                Some(owner) => self.transfer(owner, index, entity),
                None => {
                    let id = match own {
                        Some(id) => id,
                        None => {
                            let id = self.create(&entity.name, entity.mesh_size);
                            own = Some(id);
                            id
                        }
                    };
                    self.attach(id, index);
                }
            }
        }
        Ok(())
    }

    /// Live groups in creation order
    pub fn groups(&self) -> impl Iterator<Item = &MeshGroup> {
        self.groups.iter().flatten()
    }

    /// Group a label currently resolves to, following renames
    pub fn group_by_name(&self, name: &str) -> Option<&MeshGroup> {
        self.by_name
            .get(name)
            .and_then(|id| self.groups[*id].as_ref())
    }

    pub fn finish(self) -> Vec<MeshGroup> {
        self.groups.into_iter().flatten().collect()
    }

    fn create(&mut self, label: &str, mesh_size: Option<f64>) -> GroupId {
        let id = self.groups.len();
        self.groups
            .push(Some(MeshGroup::new(label, GroupKind::Surface, mesh_size)));
        self.by_name.insert(label.to_string(), id);
        id
    }

    fn attach(&mut self, id: GroupId, index: usize) {
        if let Some(group) = self.groups[id].as_mut() {
            if !group.contains(index) {
                group.references.push(index);
            }
        }
        self.owner.insert(index, id);
    }

    fn label(&self, id: GroupId) -> String {
        self.groups[id]
            .as_ref()
            .map(|g| g.label.clone())
            .unwrap_or_default()
    }

    fn reference_count(&self, id: GroupId) -> usize {
        self.groups[id].as_ref().map_or(0, |g| g.references.len())
    }

    fn transfer<F>(&mut self, owner: GroupId, index: usize, entity: &Entity<F>) {
        let old_label = self.label(owner);
        let new_label = format!("{}_{}", old_label, entity.name);

        if self.reference_count(owner) == 1 {
            match self.by_name.get(&new_label).copied() {
                Some(target) if target != owner => {
                    debug!(from = %old_label, into = %new_label, "folding boundary group");
                    self.absorb(target, owner);
                }
                _ => {
                    debug!(from = %old_label, to = %new_label, "renaming boundary group");
                    if let Some(group) = self.groups[owner].as_mut() {
                        group.label = new_label.clone();
                    }
                    self.by_name.insert(new_label, owner);
                }
            }
            return;
        }

        if let Some(group) = self.groups[owner].as_mut() {
            group.references.retain(|r| *r != index);
        }
        let target = match self.by_name.get(&new_label).copied() {
            Some(target) if target != owner => target,
            _ => self.create(&new_label, entity.mesh_size),
        };
        debug!(face = index, from = %old_label, into = %new_label, "splitting boundary group");
        self.attach(target, index);
    }

    /// Move all faces of `source` into `target` and delete `source`
    fn absorb(&mut self, target: GroupId, source: GroupId) {
        let references = self.groups[source]
            .take()
            .map(|g| g.references)
            .unwrap_or_default();
        for index in references {
            self.attach(target, index);
        }
        for id in self.by_name.values_mut() {
            if *id == source {
                *id = target;
            }
        }
    }
}

/// Build surface groups for a list of face entities, in order
pub fn reconcile_boundaries<F, L>(
    entities: &[Entity<F>],
    locator: &L,
    separate_boundaries: bool,
) -> Result<Vec<MeshGroup>>
where
    L: FaceLocator<F> + ?Sized,
{
    let mut reconciler = BoundaryReconciler::new(separate_boundaries);
    for entity in entities {
        reconciler.add(entity, locator)?;
    }
    Ok(reconciler.finish())
}
