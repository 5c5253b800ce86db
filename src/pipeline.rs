// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end preprocessing
//!
//! Compound filter, boundary and body groups, mesh regions, transfinite
//! lines, geo script and the gmsh run, driven from one [`EntityRegistry`].

use crate::config::PreprocessConfig;
use crate::entities::{EntityRegistry, TransfiniteMeshParams};
use crate::error::FemError;
use crate::kernel::{CompoundFilter, CompoundMode, Kernel};
use crate::locator::CompoundFilterLocator;
use crate::mesh::{
    regions_from_groups, regions_from_registry, GeoScript, GmshRunner, MeshOutcome, MeshRegion,
};
use crate::reconcile::{reconcile_bodies, reconcile_boundaries, MeshGroup};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Groups and regions computed for one registry, ready to be written
#[derive(Debug, Clone)]
pub struct PreparedMesh<K: Kernel> {
    pub mode: CompoundMode,
    pub filter: CompoundFilter<K>,
    pub groups: Vec<MeshGroup>,
    pub regions: Vec<MeshRegion>,
    pub transfinite: Vec<TransfiniteMeshParams<K::Edge>>,
}

/// Summary of a preprocessing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshReport {
    pub name: String,
    pub timestamp: String,
    pub compound_mode: CompoundMode,
    pub compound_faces: usize,
    pub compound_solids: usize,
    pub groups: Vec<MeshGroup>,
    pub regions: Vec<MeshRegion>,
    pub geo_file: Option<PathBuf>,
    /// `None` until gmsh has run
    pub outcome: Option<MeshOutcome>,
    pub duration_secs: Option<f64>,
}

impl MeshReport {
    pub fn is_success(&self) -> bool {
        self.outcome.as_ref().map_or(true, MeshOutcome::is_success)
    }
}

/// Runs the preprocessing stages against one kernel
pub struct Preprocessor<'a, K: Kernel> {
    kernel: &'a K,
    config: PreprocessConfig,
}

impl<'a, K: Kernel> Preprocessor<'a, K> {
    pub fn new(kernel: &'a K, config: PreprocessConfig) -> Self {
        Self { kernel, config }
    }

    /// Plain compounds for a single solid or when boundaries stay separate,
    /// otherwise the configured mode (boolean fragments by default)
    pub fn compound_mode(&self, solid_count: usize) -> CompoundMode {
        if solid_count == 1 || self.config.separate_boundaries {
            CompoundMode::Plain
        } else {
            self.config
                .compound_mode
                .unwrap_or(CompoundMode::BooleanFragments)
        }
    }

    /// Build the compound filter and every group that refers to it
    pub fn prepare(&self, registry: &EntityRegistry<K>) -> Result<PreparedMesh<K>> {
        let mut solids = registry.solid_geometries();
        if solids.is_empty() {
            solids.extend(registry.main_object.iter().cloned());
        }
        if solids.is_empty() {
            return Err(FemError::GeometryNotFound(format!(
                "registry '{}' has no solids",
                registry.name
            ))
            .into());
        }

        let mode = self.compound_mode(solids.len());
        info!(registry = %registry.name, solids = solids.len(), ?mode, "building compound filter");
        let filter = self
            .kernel
            .compound_filter(&solids, mode)
            .context("Failed to build compound filter")?;

        let locator = CompoundFilterLocator::new(self.kernel, &filter)
            .with_tolerance(self.config.tolerance)
            .with_point_search(self.config.point_search);

        info!(faces = registry.faces.len(), "reconciling boundaries");
        let mut groups =
            reconcile_boundaries(&registry.faces, &locator, self.config.separate_boundaries)
                .context("Failed to reconcile boundaries")?;
        info!(solids = registry.solids.len(), "reconciling bodies");
        groups.extend(
            reconcile_bodies(&registry.solids, &locator).context("Failed to reconcile bodies")?,
        );

        let mut regions = if self.config.regions_from_solids {
            regions_from_registry(&registry.solids, &locator, &self.config.ignore_regions)
                .context("Failed to locate mesh regions")?
        } else {
            regions_from_groups(&groups, &self.config.ignore_regions)
        };
        for region in regions.iter_mut().filter(|r| r.mesh_size.is_none()) {
            region.mesh_size = self.config.default_mesh_size;
        }

        let mut transfinite = registry.transfinite.clone();
        locator
            .resolve_transfinite_lines(&mut transfinite)
            .context("Failed to resolve transfinite lines")?;

        Ok(PreparedMesh {
            mode,
            filter,
            groups,
            regions,
            transfinite,
        })
    }

    /// Write the geo script for `prepared`, merging `geometry`
    pub fn write_geo(&self, prepared: &PreparedMesh<K>, geometry: &Path, geo: &Path) -> Result<()> {
        let settings = self.config.mesh_settings();
        GeoScript::new(geometry, &settings)
            .with_groups(&prepared.groups)
            .with_regions(&prepared.regions)
            .with_transfinite(&prepared.transfinite)
            .write(geo)
            .with_context(|| format!("Failed to write geo file: {:?}", geo))?;
        info!(geo = %geo.display(), "wrote geo script");
        Ok(())
    }

    /// Report without a geo file or a gmsh run
    pub fn report(&self, name: &str, prepared: &PreparedMesh<K>) -> MeshReport {
        MeshReport {
            name: name.to_string(),
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            compound_mode: prepared.mode,
            compound_faces: prepared.filter.face_count(),
            compound_solids: prepared.filter.solid_count(),
            groups: prepared.groups.clone(),
            regions: prepared.regions.clone(),
            geo_file: None,
            outcome: None,
            duration_secs: None,
        }
    }

    /// Prepare, write `<work_dir>/<registry name>.geo` and mesh it with gmsh.
    ///
    /// `geometry` is the kernel export of the compound filter that the geo
    /// script merges. A gmsh failure ends up in the report outcome, so only
    /// preparation and writing the geo script return errors.
    pub fn run(&self, registry: &EntityRegistry<K>, geometry: &Path) -> Result<MeshReport> {
        let prepared = self.prepare(registry)?;

        std::fs::create_dir_all(&self.config.work_dir).with_context(|| {
            format!("Failed to create work directory: {:?}", self.config.work_dir)
        })?;
        let geo = self.config.work_dir.join(format!("{}.geo", registry.name));
        self.write_geo(&prepared, geometry, &geo)?;

        let mut runner = GmshRunner::new(&self.config.gmsh);
        if let Some(log) = &self.config.gmsh_log {
            runner = runner.with_log_file(log);
        }
        let (outcome, duration) = runner.run(&geo);

        let mut report = self.report(&registry.name, &prepared);
        report.geo_file = Some(geo);
        report.outcome = Some(outcome);
        report.duration_secs = Some(duration.as_secs_f64());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MeshSizes;
    use crate::kernel::aabb::{AabbKernel, Cuboid};
    use crate::reconcile::GroupKind;
    use nalgebra::Point3;

    fn two_boxes() -> EntityRegistry<AabbKernel> {
        let left = Cuboid::from_size(Point3::origin(), [1.0, 1.0, 1.0]);
        let right = Cuboid::from_size(Point3::new(1.0, 0.0, 0.0), [1.0, 1.0, 1.0]);
        let mut registry = EntityRegistry::new("pair");
        registry.add_solid("left", left, None);
        registry.add_solid("right", right, None);
        registry.add_face("a", left.faces()[1], None);
        registry.add_face("b", right.faces()[0], None);
        registry
    }

    #[test]
    fn test_compound_mode_selection() {
        let kernel = AabbKernel::new();
        let fragments = Preprocessor::new(&kernel, PreprocessConfig::default());
        assert_eq!(fragments.compound_mode(1), CompoundMode::Plain);
        assert_eq!(fragments.compound_mode(3), CompoundMode::BooleanFragments);

        let separate = PreprocessConfig {
            separate_boundaries: true,
            ..PreprocessConfig::default()
        };
        let plain = Preprocessor::new(&kernel, separate);
        assert_eq!(plain.compound_mode(3), CompoundMode::Plain);

        let xor = PreprocessConfig {
            compound_mode: Some(CompoundMode::Xor),
            ..PreprocessConfig::default()
        };
        let xor = Preprocessor::new(&kernel, xor);
        assert_eq!(xor.compound_mode(1), CompoundMode::Plain);
        assert_eq!(xor.compound_mode(2), CompoundMode::Xor);
    }

    #[test]
    fn test_regions_from_solids() {
        let kernel = AabbKernel::new();
        let unit = |x: f64| Cuboid::from_size(Point3::new(x, 0.0, 0.0), [1.0, 1.0, 1.0]);
        let mut registry = EntityRegistry::new("row");
        registry.add_solid("core", unit(0.0), Some(&MeshSizes::with_default(0.2)));
        registry.add_solid("core", unit(1.0), Some(&MeshSizes::with_default(0.3)));
        registry.add_solid("air", unit(2.0), None);
        let config = PreprocessConfig {
            regions_from_solids: true,
            ignore_regions: vec!["air".into()],
            ..PreprocessConfig::default()
        };
        let prepared = Preprocessor::new(&kernel, config).prepare(&registry).unwrap();
        assert_eq!(prepared.regions.len(), 1);
        assert_eq!(prepared.regions[0].label(), "core_region");
        assert_eq!(prepared.regions[0].kind, GroupKind::Body);
        assert_eq!(prepared.regions[0].references, vec![1, 2]);
        assert_eq!(prepared.regions[0].mesh_size, Some(0.3));
    }

    #[test]
    fn test_prepare_merges_interface() {
        let kernel = AabbKernel::new();
        let preprocessor = Preprocessor::new(&kernel, PreprocessConfig::default());
        let prepared = preprocessor.prepare(&two_boxes()).unwrap();
        assert_eq!(prepared.mode, CompoundMode::BooleanFragments);
        assert_eq!(prepared.filter.face_count(), 11);

        let surfaces: Vec<_> = prepared
            .groups
            .iter()
            .filter(|g| g.kind == GroupKind::Surface)
            .collect();
        assert_eq!(surfaces.len(), 1);
        assert_eq!(surfaces[0].label, "a_b");
        assert_eq!(surfaces[0].references.len(), 1);

        let bodies: Vec<_> = prepared
            .groups
            .iter()
            .filter(|g| g.kind == GroupKind::Body)
            .map(|g| (g.label.as_str(), g.references.clone()))
            .collect();
        assert_eq!(bodies, vec![("left", vec![1]), ("right", vec![2])]);
    }

    #[test]
    fn test_default_mesh_size_fills_regions() {
        let kernel = AabbKernel::new();
        let config = PreprocessConfig {
            default_mesh_size: Some(0.4),
            ..PreprocessConfig::default()
        };
        let prepared = Preprocessor::new(&kernel, config).prepare(&two_boxes()).unwrap();
        assert!(prepared.regions.iter().all(|r| r.mesh_size == Some(0.4)));
    }

    #[test]
    fn test_empty_registry_rejected() {
        let kernel = AabbKernel::new();
        let preprocessor = Preprocessor::new(&kernel, PreprocessConfig::default());
        let registry = EntityRegistry::<AabbKernel>::new("empty");
        assert!(preprocessor.prepare(&registry).is_err());
    }

    #[test]
    fn test_run_reports_missing_gmsh_in_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let kernel = AabbKernel::new();
        let config = PreprocessConfig {
            work_dir: dir.path().to_path_buf(),
            gmsh: PathBuf::from("femprep-no-such-gmsh"),
            ..PreprocessConfig::default()
        };
        let preprocessor = Preprocessor::new(&kernel, config);
        let report = preprocessor.run(&two_boxes(), Path::new("pair.brep")).unwrap();
        assert!(!report.is_success());
        assert!(matches!(
            &report.outcome,
            Some(MeshOutcome::Failed(message)) if message.starts_with("Error executing gmsh")
        ));
        assert_eq!(report.geo_file, Some(dir.path().join("pair.geo")));
        assert!(report.duration_secs.is_some());

        let geo = std::fs::read_to_string(dir.path().join("pair.geo")).unwrap();
        assert!(geo.contains("Physical Surface(\"a_b\")"));
        assert!(geo.contains("Physical Volume(\"left\") = {1};"));
    }

    #[test]
    fn test_report_serializes() {
        let kernel = AabbKernel::new();
        let preprocessor = Preprocessor::new(&kernel, PreprocessConfig::default());
        let prepared = preprocessor.prepare(&two_boxes()).unwrap();
        let report = preprocessor.report("pair", &prepared);
        assert!(report.is_success());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"compound_mode\":\"boolean_fragments\""));
        assert!(json.contains("UTC"));
    }
}
