// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Named entities and entity registries
//!
//! Kernel numbering changes every time solids go through a boolean, so the
//! faces and solids that matter are captured by name while the original
//! geometry is still at hand. Names do not have to be unique: entities sharing
//! a name end up in the same mesh group.

mod transfinite;

pub use transfinite::{TransfiniteLineParams, TransfiniteMeshParams};

use crate::error::{FemError, Result};
use crate::geometry::{faces_in_symmetry_plane, SymmetryPlane};
use crate::kernel::Kernel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named piece of geometry with an optional mesh size
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<G> {
    pub name: String,
    pub geometry: G,
    pub mesh_size: Option<f64>,
}

impl<G> Entity<G> {
    pub fn new(name: impl Into<String>, geometry: G, mesh_size: Option<f64>) -> Self {
        Self {
            name: name.into(),
            geometry,
            mesh_size,
        }
    }
}

/// Mesh size lookup: per-name overrides with a fallback
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshSizes {
    #[serde(default)]
    pub default: Option<f64>,
    #[serde(default)]
    pub by_name: BTreeMap<String, f64>,
}

impl MeshSizes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(size: f64) -> Self {
        Self {
            default: Some(size),
            by_name: BTreeMap::new(),
        }
    }

    pub fn set(mut self, name: impl Into<String>, size: f64) -> Self {
        self.by_name.insert(name.into(), size);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<f64> {
        self.by_name.get(name).copied().or(self.default)
    }
}

/// Append an entity, resolving its mesh size from `sizes`
pub fn add_entity<G>(list: &mut Vec<Entity<G>>, name: &str, geometry: G, sizes: Option<&MeshSizes>) {
    let mesh_size = sizes.and_then(|s| s.resolve(name));
    list.push(Entity::new(name, geometry, mesh_size));
}

/// Append several geometries under one name
pub fn add_entities<G>(
    list: &mut Vec<Entity<G>>,
    name: &str,
    geometries: impl IntoIterator<Item = G>,
    sizes: Option<&MeshSizes>,
) {
    for geometry in geometries {
        add_entity(list, name, geometry, sizes);
    }
}

/// Register every face of `faces` lying on `plane` under the plane's name
pub fn add_symmetry_plane_faces<K: Kernel>(
    list: &mut Vec<Entity<K::Face>>,
    kernel: &K,
    faces: &[K::Face],
    plane: SymmetryPlane,
    tolerance: f64,
    sizes: Option<&MeshSizes>,
) {
    let on_plane = faces_in_symmetry_plane(kernel, faces, plane, tolerance);
    add_entities(list, plane.as_str(), on_plane, sizes);
}

/// Pick faces of a solid by 0-based position, as `(name, position)` pairs
pub fn pick_faces<K: Kernel>(
    kernel: &K,
    solid: &K::Solid,
    picks: &[(&str, usize)],
    sizes: Option<&MeshSizes>,
) -> Result<Vec<Entity<K::Face>>> {
    let faces = kernel.solid_faces(solid);
    let mut picked = Vec::with_capacity(picks.len());
    for (name, position) in picks {
        let face = faces
            .get(*position)
            .ok_or(FemError::EntityNotFound { kind: "picked face" })?;
        add_entity(&mut picked, name, face.clone(), sizes);
    }
    Ok(picked)
}

/// Which entity kinds get the source registry name as prefix on merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixPolicy {
    pub faces: bool,
    pub solids: bool,
}

impl Default for PrefixPolicy {
    fn default() -> Self {
        Self {
            faces: true,
            solids: false,
        }
    }
}

/// Named collection of face and solid entities
#[derive(Debug, Clone)]
pub struct EntityRegistry<K: Kernel> {
    pub name: String,
    pub faces: Vec<Entity<K::Face>>,
    pub solids: Vec<Entity<K::Solid>>,
    /// Main solid of a single-solid registry
    pub main_object: Option<K::Solid>,
    pub transfinite: Vec<TransfiniteMeshParams<K::Edge>>,
    pub extra: BTreeMap<String, String>,
}

impl<K: Kernel> EntityRegistry<K> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            faces: Vec::new(),
            solids: Vec::new(),
            main_object: None,
            transfinite: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_entities(
        name: impl Into<String>,
        faces: Vec<Entity<K::Face>>,
        solids: Vec<Entity<K::Solid>>,
        main_object: Option<K::Solid>,
    ) -> Self {
        Self {
            faces,
            solids,
            main_object,
            ..Self::new(name)
        }
    }

    pub fn add_face(&mut self, name: &str, face: K::Face, sizes: Option<&MeshSizes>) {
        add_entity(&mut self.faces, name, face, sizes);
    }

    pub fn add_solid(&mut self, name: &str, solid: K::Solid, sizes: Option<&MeshSizes>) {
        add_entity(&mut self.solids, name, solid, sizes);
    }

    pub fn add_transfinite(&mut self, params: TransfiniteMeshParams<K::Edge>) {
        self.transfinite.push(params);
    }

    pub fn solid_geometries(&self) -> Vec<K::Solid> {
        self.solids.iter().map(|e| e.geometry.clone()).collect()
    }

    pub fn face_geometries(&self) -> Vec<K::Face> {
        self.faces.iter().map(|e| e.geometry.clone()).collect()
    }
}

/// Concatenate registries into a new one.
///
/// Names are prefixed with `<source name>_` according to `prefix`, unset mesh
/// sizes take `default_mesh_size` and transfinite blocks are carried over.
pub fn merge_registries<K: Kernel>(
    registries: &[EntityRegistry<K>],
    name: &str,
    default_mesh_size: Option<f64>,
    prefix: PrefixPolicy,
) -> EntityRegistry<K> {
    let mut merged = EntityRegistry::new(name);
    let qualified = |apply: bool, source: &str, entity: &str| {
        if apply {
            format!("{source}_{entity}")
        } else {
            entity.to_string()
        }
    };

    for registry in registries {
        for face in &registry.faces {
            merged.faces.push(Entity::new(
                qualified(prefix.faces, &registry.name, &face.name),
                face.geometry.clone(),
                face.mesh_size.or(default_mesh_size),
            ));
        }
        for solid in &registry.solids {
            merged.solids.push(Entity::new(
                qualified(prefix.solids, &registry.name, &solid.name),
                solid.geometry.clone(),
                solid.mesh_size.or(default_mesh_size),
            ));
        }
        merged.transfinite.extend(registry.transfinite.iter().cloned());
    }
    merged
}
