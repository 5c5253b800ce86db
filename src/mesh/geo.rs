// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! gmsh geo script generation

use super::regions::MeshRegion;
use super::settings::MeshSettings;
use crate::entities::TransfiniteMeshParams;
use crate::error::{FemError, Result};
use crate::reconcile::{GroupKind, MeshGroup};
use std::path::Path;

/// Everything that goes into one geo script
pub struct GeoScript<'a, E> {
    pub geometry: &'a Path,
    pub settings: &'a MeshSettings,
    pub groups: &'a [MeshGroup],
    pub regions: &'a [MeshRegion],
    pub transfinite: &'a [TransfiniteMeshParams<E>],
}

impl<'a, E> GeoScript<'a, E> {
    pub fn new(geometry: &'a Path, settings: &'a MeshSettings) -> Self {
        Self {
            geometry,
            settings,
            groups: &[],
            regions: &[],
            transfinite: &[],
        }
    }

    pub fn with_groups(mut self, groups: &'a [MeshGroup]) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_regions(mut self, regions: &'a [MeshRegion]) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_transfinite(mut self, transfinite: &'a [TransfiniteMeshParams<E>]) -> Self {
        self.transfinite = transfinite;
        self
    }

    /// Render the script.
    ///
    /// Fails when a transfinite block names a group that does not exist or
    /// holds unresolved lines.
    pub fn render(&self) -> Result<String> {
        let mut geo = String::new();
        geo.push_str("// femprep generated geometry script\n");
        geo.push_str(&format!("Merge \"{}\";\n\n", self.geometry.display()));

        geo.push_str("// mesh options\n");
        geo.push_str(&format!(
            "Mesh.CharacteristicLengthMax = {};\n",
            self.settings.characteristic_length
        ));
        geo.push_str(&format!("Mesh.Algorithm = {};\n", self.settings.algorithm_2d.gmsh_id()));
        geo.push_str(&format!("Mesh.Algorithm3D = {};\n", self.settings.algorithm_3d.gmsh_id()));
        geo.push_str(&format!("Mesh.ElementOrder = {};\n", self.settings.element_order));

        if !self.groups.is_empty() {
            geo.push_str("\n// physical groups\n");
            for group in self.groups {
                geo.push_str(&format!(
                    "Physical {}(\"{}\") = {{{}}};\n",
                    entity_keyword(group.kind),
                    group.label,
                    join(&group.references)
                ));
            }
        }

        let sized: Vec<_> = self
            .regions
            .iter()
            .filter_map(|r| r.mesh_size.map(|size| (r, size)))
            .collect();
        if !sized.is_empty() {
            geo.push_str("\n// region sizes\n");
            for (region, size) in sized {
                geo.push_str(&format!(
                    "Characteristic Length {{ PointsOf {{ {}{{{}}}; }} }} = {}; // {}\n",
                    entity_keyword(region.kind),
                    join(&region.references),
                    size,
                    region.label()
                ));
            }
        }

        if !self.transfinite.is_empty() {
            geo.push_str("\n// transfinite\n");
            for block in self.transfinite {
                self.render_transfinite(&mut geo, block)?;
            }
        }
        Ok(geo)
    }

    /// Render and write the script to `path`
    pub fn write(&self, path: &Path) -> Result<()> {
        let geo = self.render()?;
        std::fs::write(path, geo)?;
        Ok(())
    }

    fn render_transfinite(&self, geo: &mut String, block: &TransfiniteMeshParams<E>) -> Result<()> {
        for line in &block.line_params {
            if !line.is_resolved() {
                return Err(FemError::EntitiesNotFound {
                    kind: "transfinite lines",
                    entity: block.volume.clone(),
                });
            }
            geo.push_str(&format!(
                "Transfinite Line {{{}}} = {} Using Progression {};",
                join(&line.lines),
                line.point_count,
                line.progression
            ));
            if !line.comment.is_empty() {
                geo.push_str(&format!(" // {}", line.comment));
            }
            geo.push('\n');
        }
        for surface in &block.surfaces {
            let references = self.group_references(surface, GroupKind::Surface)?;
            geo.push_str(&format!("Transfinite Surface {{{}}}", join(references)));
            if let Some(direction) = block.directions.get(surface) {
                geo.push_str(&format!(" {direction}"));
            }
            geo.push_str(";\n");
        }
        let volume = self.group_references(&block.volume, GroupKind::Body)?;
        geo.push_str(&format!("Transfinite Volume {{{}}};\n", join(volume)));
        Ok(())
    }

    fn group_references(&self, label: &str, kind: GroupKind) -> Result<&[usize]> {
        self.groups
            .iter()
            .find(|g| g.kind == kind && g.label == label)
            .map(|g| g.references.as_slice())
            .ok_or_else(|| FemError::EntitiesNotFound {
                kind: match kind {
                    GroupKind::Surface => "surface group",
                    GroupKind::Body => "body group",
                },
                entity: label.to_string(),
            })
    }
}

fn entity_keyword(kind: GroupKind) -> &'static str {
    match kind {
        GroupKind::Surface => "Surface",
        GroupKind::Body => "Volume",
    }
}

fn join(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
