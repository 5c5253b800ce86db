// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boundary and body groups against the box kernel

use anyhow::Result;
use femprep::kernel::aabb::{AabbKernel, Cuboid};
use femprep::reconcile::{reconcile_bodies, reconcile_boundaries};
use femprep::{CompoundFilterLocator, CompoundMode, Entity, GroupKind, Kernel, MeshGroup};
use nalgebra::Point3;

fn unit_box(x: f64) -> Cuboid {
    Cuboid::from_size(Point3::new(x, 0.0, 0.0), [1.0, 1.0, 1.0])
}

/// Every face of every box under its own name
fn named_faces(solids: &[Cuboid]) -> Vec<Entity<femprep::kernel::aabb::Rect>> {
    let mut entities = Vec::new();
    for (i, solid) in solids.iter().enumerate() {
        for (j, face) in solid.faces().into_iter().enumerate() {
            entities.push(Entity::new(format!("b{i}_f{j}"), face, None));
        }
    }
    entities
}

fn assert_partition(groups: &[MeshGroup], face_count: usize) {
    let mut all: Vec<usize> = groups.iter().flat_map(|g| g.references.clone()).collect();
    all.sort_unstable();
    let expected: Vec<usize> = (1..=face_count).collect();
    assert_eq!(all, expected, "groups must cover every compound face exactly once");
}

#[test]
fn test_disjoint_boxes_partition_faces() -> Result<()> {
    let kernel = AabbKernel::new();
    for count in 1..=4 {
        let solids: Vec<Cuboid> = (0..count).map(|i| unit_box(2.0 * i as f64)).collect();
        let filter = kernel.compound_filter(&solids, CompoundMode::BooleanFragments)?;
        let locator = CompoundFilterLocator::new(&kernel, &filter);

        let groups = reconcile_boundaries(&named_faces(&solids), &locator, false)?;
        assert_eq!(groups.len(), 6 * count);
        assert!(groups.iter().all(|g| g.references.len() == 1));
        assert_partition(&groups, filter.face_count());
    }
    Ok(())
}

#[test]
fn test_touching_boxes_share_interface_group() -> Result<()> {
    let kernel = AabbKernel::new();
    let solids = [unit_box(0.0), unit_box(1.0), unit_box(2.0)];
    let filter = kernel.compound_filter(&solids, CompoundMode::BooleanFragments)?;
    assert_eq!(filter.face_count(), 16);
    let locator = CompoundFilterLocator::new(&kernel, &filter);

    let groups = reconcile_boundaries(&named_faces(&solids), &locator, false)?;
    assert_partition(&groups, filter.face_count());

    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert!(labels.contains(&"b0_f1_b1_f0"));
    assert!(labels.contains(&"b1_f1_b2_f0"));
    assert!(!labels.contains(&"b0_f1"));
    assert_eq!(groups.len(), 16);
    Ok(())
}

#[test]
fn test_separate_boundaries_keep_both_sides() -> Result<()> {
    let kernel = AabbKernel::new();
    let solids = [unit_box(0.0), unit_box(1.0)];
    let filter = kernel.compound_filter(&solids, CompoundMode::Plain)?;
    assert_eq!(filter.face_count(), 12);
    let locator = CompoundFilterLocator::new(&kernel, &filter);

    let groups = reconcile_boundaries(&named_faces(&solids), &locator, true)?;
    assert_partition(&groups, 12);
    let left = groups.iter().find(|g| g.label == "b0_f1").unwrap();
    let right = groups.iter().find(|g| g.label == "b1_f0").unwrap();
    assert_eq!(left.references, vec![2]);
    assert_eq!(right.references, vec![7]);
    Ok(())
}

#[test]
fn test_split_face_yields_residual_and_merged_groups() -> Result<()> {
    let kernel = AabbKernel::new();
    let tall = Cuboid::from_size(Point3::new(1.0, 0.0, 0.0), [1.0, 2.0, 1.0]);
    let solids = [unit_box(0.0), tall];
    let filter = kernel.compound_filter(&solids, CompoundMode::BooleanFragments)?;
    let locator = CompoundFilterLocator::new(&kernel, &filter);

    let entities = vec![
        Entity::new("tall_side", tall.faces()[0], Some(0.2)),
        Entity::new("cube_side", unit_box(0.0).faces()[1], Some(0.1)),
    ];
    let groups = reconcile_boundaries(&entities, &locator, false)?;
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].label, "tall_side");
    assert_eq!(groups[0].references.len(), 1);
    assert_eq!(groups[1].label, "tall_side_cube_side");
    assert_eq!(groups[1].references.len(), 1);
    assert_eq!(groups[1].mesh_size, Some(0.1));
    Ok(())
}

#[test]
fn test_bodies_group_by_name() -> Result<()> {
    let kernel = AabbKernel::new();
    let solids = [unit_box(0.0), unit_box(1.0), unit_box(2.0)];
    let filter = kernel.compound_filter(&solids, CompoundMode::BooleanFragments)?;
    let locator = CompoundFilterLocator::new(&kernel, &filter).with_point_search(false);

    let entities = vec![
        Entity::new("steel", solids[0], Some(0.5)),
        Entity::new("air", solids[1], None),
        Entity::new("steel", solids[2], Some(0.9)),
    ];
    let groups = reconcile_bodies(&entities, &locator)?;
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].kind, GroupKind::Body);
    assert_eq!(groups[0].references, vec![1, 3]);
    assert_eq!(groups[0].mesh_size, Some(0.5));
    assert_eq!(groups[1].reference_names(), vec!["Solid2"]);
    Ok(())
}

#[test]
fn test_unknown_face_aborts_with_entity_name() {
    let kernel = AabbKernel::new();
    let solids = [unit_box(0.0)];
    let filter = kernel
        .compound_filter(&solids, CompoundMode::Plain)
        .unwrap();
    let locator = CompoundFilterLocator::new(&kernel, &filter);
    let stray = unit_box(5.0).faces()[0];
    let entities = vec![Entity::new("stray", stray, None)];

    let err = reconcile_boundaries(&entities, &locator, false).unwrap_err();
    assert!(err.to_string().contains("stray"));
}
