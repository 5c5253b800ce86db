// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Registry merge through geo script generation

use anyhow::Result;
use femprep::entities::{TransfiniteLineParams, TransfiniteMeshParams};
use femprep::kernel::aabb::{AabbKernel, Cuboid};
use femprep::mesh::Algorithm3D;
use femprep::{
    merge_registries, EntityRegistry, GroupKind, Kernel, MeshSizes, PrefixPolicy,
    PreprocessConfig, Preprocessor,
};
use nalgebra::Point3;
use std::path::Path;
use tempfile::TempDir;

/// One box registry with `inlet`/`outlet` on the x faces
fn channel(name: &str, x: f64, sizes: &MeshSizes) -> EntityRegistry<AabbKernel> {
    let solid = Cuboid::from_size(Point3::new(x, 0.0, 0.0), [1.0, 1.0, 1.0]);
    let faces = solid.faces();
    let mut registry = EntityRegistry::new(name);
    registry.add_face("inlet", faces[0], Some(sizes));
    registry.add_face("outlet", faces[1], Some(sizes));
    registry.add_solid("fluid", solid, Some(sizes));
    registry.main_object = Some(solid);
    registry
}

#[test]
fn test_merged_registries_mesh_groups() -> Result<()> {
    let sizes = MeshSizes::with_default(0.5).set("inlet", 0.05);
    let merged = merge_registries(
        &[channel("Up", 0.0, &sizes), channel("Down", 1.0, &sizes)],
        "Channel",
        Some(1.0),
        PrefixPolicy::default(),
    );
    assert_eq!(merged.faces.len(), 4);
    assert_eq!(merged.faces[0].name, "Up_inlet");
    assert_eq!(merged.faces[0].mesh_size, Some(0.05));

    let kernel = AabbKernel::new();
    let preprocessor = Preprocessor::new(&kernel, PreprocessConfig::default());
    let prepared = preprocessor.prepare(&merged)?;

    let surfaces: Vec<(&str, usize)> = prepared
        .groups
        .iter()
        .filter(|g| g.kind == GroupKind::Surface)
        .map(|g| (g.label.as_str(), g.references.len()))
        .collect();
    assert_eq!(
        surfaces,
        vec![("Up_inlet", 1), ("Up_outlet_Down_inlet", 1), ("Down_outlet", 1)]
    );

    // both solids are named `fluid` and end up in one body group
    let bodies: Vec<_> = prepared
        .groups
        .iter()
        .filter(|g| g.kind == GroupKind::Body)
        .collect();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0].references, vec![1, 2]);
    Ok(())
}

#[test]
fn test_geo_script_with_transfinite_block() -> Result<()> {
    let dir = TempDir::new()?;
    let kernel = AabbKernel::new();
    let solid = Cuboid::from_size(Point3::origin(), [2.0, 1.0, 1.0]);
    let faces = solid.faces();
    let edges = kernel.solid_edges(&solid);

    let mut registry = EntityRegistry::new("block");
    registry.add_face("left", faces[0], None);
    registry.add_face("right", faces[1], None);
    registry.add_solid("block", solid, Some(&MeshSizes::with_default(0.3)));
    registry.add_transfinite(
        TransfiniteMeshParams::new("block", vec!["left".into(), "right".into()])
            .with_direction("left", "Alternate")
            .with_lines(
                TransfiniteLineParams::new(edges[..4].to_vec(), 6)
                    .with_progression(1.1)
                    .with_comment("x faces"),
            ),
    );

    let config = PreprocessConfig {
        characteristic_length: 0.75,
        algorithm_3d: Algorithm3D::FrontalHex,
        work_dir: dir.path().to_path_buf(),
        ..PreprocessConfig::default()
    };
    let preprocessor = Preprocessor::new(&kernel, config);
    let prepared = preprocessor.prepare(&registry)?;
    assert!(prepared.transfinite[0].line_params[0].is_resolved());

    let geo_path = dir.path().join("block.geo");
    preprocessor.write_geo(&prepared, Path::new("block.brep"), &geo_path)?;
    let geo = std::fs::read_to_string(&geo_path)?;

    assert!(geo.contains("Merge \"block.brep\";"));
    assert!(geo.contains("Mesh.CharacteristicLengthMax = 0.75;"));
    assert!(geo.contains("Mesh.Algorithm3D = 6;"));
    assert!(geo.contains("Physical Surface(\"left\") = {1};"));
    assert!(geo.contains("Physical Surface(\"right\") = {2};"));
    assert!(geo.contains("Physical Volume(\"block\") = {1};"));
    assert!(geo.contains("= 0.3; // block_region"));
    assert!(geo.contains("= 6 Using Progression 1.1; // x faces"));
    assert!(geo.contains("Transfinite Surface {1} Alternate;"));
    assert!(geo.contains("Transfinite Surface {2};"));
    assert!(geo.contains("Transfinite Volume {1};"));
    Ok(())
}

#[test]
fn test_ignored_regions_have_no_size() -> Result<()> {
    let kernel = AabbKernel::new();
    let sizes = MeshSizes::with_default(0.5);
    let config = PreprocessConfig {
        ignore_regions: vec!["fluid".into()],
        ..PreprocessConfig::default()
    };
    let preprocessor = Preprocessor::new(&kernel, config);
    let prepared = preprocessor.prepare(&channel("Solo", 0.0, &sizes))?;
    assert!(prepared.regions.iter().all(|r| r.name != "fluid"));
    assert_eq!(prepared.regions.len(), 2);
    Ok(())
}
