// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Compound-filter lookups
//!
//! Maps original geometry onto 1-based indices of the compound filter. Single
//! face and solid lookups keep the *last* match while edge lookups keep the
//! *first*; the difference only shows when several compound entities match
//! equally well.

use crate::entities::TransfiniteMeshParams;
use crate::error::{FemError, Result};
use crate::geometry::{
    compound_solid_in_solid, edges_equal, face_in_face, faces_have_same_vertices, solids_equal,
    DEFAULT_TOLERANCE,
};
use crate::kernel::{CompoundFilter, Kernel};
use tracing::debug;

/// Source of compound-filter face indices for a face
pub trait FaceLocator<F> {
    /// Indices of all compound faces lying in `face`.
    ///
    /// With `exclude`, indices already in the list are skipped, and so are
    /// faces nested in a face accepted earlier in the same call.
    fn contained_faces(&self, face: &F, exclude: Option<&[usize]>) -> Result<Vec<usize>>;
}

/// Source of compound-filter solid indices for a solid
pub trait SolidLocator<S> {
    fn contained_solids(&self, solid: &S) -> Result<Vec<usize>>;
}

/// Geometric lookups against one compound filter
pub struct CompoundFilterLocator<'a, K: Kernel> {
    kernel: &'a K,
    filter: &'a CompoundFilter<K>,
    tolerance: f64,
    point_search: bool,
}

impl<'a, K: Kernel> CompoundFilterLocator<'a, K> {
    pub fn new(kernel: &'a K, filter: &'a CompoundFilter<K>) -> Self {
        Self {
            kernel,
            filter,
            tolerance: DEFAULT_TOLERANCE,
            point_search: true,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Use witness points (default) or common volume for solid containment
    pub fn with_point_search(mut self, point_search: bool) -> Self {
        self.point_search = point_search;
        self
    }

    /// First compound edge equal to `edge`
    pub fn locate_edge(&self, edge: &K::Edge) -> Result<usize> {
        self.filter
            .edges()
            .iter()
            .position(|e| edges_equal(self.kernel, e, edge, self.tolerance))
            .map(|i| i + 1)
            .ok_or(FemError::EntityNotFound { kind: "edge" })
    }

    /// Last compound face with the same vertices as `face`
    pub fn locate_face(&self, face: &K::Face) -> Option<usize> {
        self.filter
            .faces()
            .iter()
            .rposition(|f| faces_have_same_vertices(self.kernel, f, face, self.tolerance))
            .map(|i| i + 1)
    }

    /// Last compound solid equal to `solid`
    pub fn locate_solid(&self, solid: &K::Solid) -> Option<usize> {
        self.filter
            .solids()
            .iter()
            .rposition(|s| solids_equal(self.kernel, s, solid, self.tolerance))
            .map(|i| i + 1)
    }

    pub fn locate_contained_faces(
        &self,
        face: &K::Face,
        exclude: Option<&[usize]>,
    ) -> Result<Vec<usize>> {
        let mut found = Vec::new();
        let mut accepted: Vec<&K::Face> = Vec::new();

        for (position, candidate) in self.filter.faces().iter().enumerate() {
            let index = position + 1;
            if !face_in_face(self.kernel, candidate, face, self.tolerance)? {
                continue;
            }
            if let Some(exclude) = exclude {
                if exclude.contains(&index) {
                    continue;
                }
                let mut nested = false;
                for previous in &accepted {
                    if face_in_face(self.kernel, candidate, previous, self.tolerance)? {
                        nested = true;
                        break;
                    }
                }
                if nested {
                    continue;
                }
                accepted.push(candidate);
            }
            found.push(index);
        }

        if found.is_empty() {
            return Err(FemError::EntitiesNotFound {
                kind: "faces",
                entity: String::new(),
            });
        }
        debug!(faces = ?found, "located compound faces");
        Ok(found)
    }

    pub fn locate_contained_solids(&self, solid: &K::Solid) -> Result<Vec<usize>> {
        let mut found = Vec::new();
        for (position, candidate) in self.filter.solids().iter().enumerate() {
            if compound_solid_in_solid(
                self.kernel,
                candidate,
                solid,
                self.tolerance,
                self.point_search,
            )? {
                found.push(position + 1);
            }
        }
        if found.is_empty() {
            return Err(FemError::EntitiesNotFound {
                kind: "solids",
                entity: String::new(),
            });
        }
        debug!(solids = ?found, "located compound solids");
        Ok(found)
    }

    /// Fill in the compound edge indices of every transfinite line parameter
    pub fn resolve_transfinite_lines(
        &self,
        params: &mut [TransfiniteMeshParams<K::Edge>],
    ) -> Result<()> {
        for mesh_params in params.iter_mut() {
            for line in mesh_params.line_params.iter_mut() {
                line.lines = line
                    .edges
                    .iter()
                    .map(|edge| self.locate_edge(edge))
                    .collect::<Result<Vec<_>>>()?;
            }
        }
        Ok(())
    }
}

impl<K: Kernel> FaceLocator<K::Face> for CompoundFilterLocator<'_, K> {
    fn contained_faces(&self, face: &K::Face, exclude: Option<&[usize]>) -> Result<Vec<usize>> {
        self.locate_contained_faces(face, exclude)
    }
}

impl<K: Kernel> SolidLocator<K::Solid> for CompoundFilterLocator<'_, K> {
    fn contained_solids(&self, solid: &K::Solid) -> Result<Vec<usize>> {
        self.locate_contained_solids(solid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TransfiniteLineParams;
    use crate::kernel::aabb::{AabbKernel, Axis, Cuboid, Rect, Segment};
    use crate::kernel::CompoundMode;
    use nalgebra::Point3;

    fn unit_box(x: f64) -> Cuboid {
        Cuboid::from_size(Point3::new(x, 0.0, 0.0), [1.0, 1.0, 1.0])
    }

    #[test]
    fn test_locate_edge_first_match() {
        let kernel = AabbKernel::new();
        let filter = kernel
            .compound_filter(&[unit_box(0.0)], CompoundMode::Plain)
            .unwrap();
        let locator = CompoundFilterLocator::new(&kernel, &filter);
        let edge = Segment::new(Point3::new(0.0, 1.0, 0.0), Point3::new(0.0, 0.0, 0.0));
        // plain compounds keep duplicated edges; the first one wins
        let index = locator.locate_edge(&edge).unwrap();
        let located = filter.edges()[index - 1];
        assert!(edges_equal(&kernel, &located, &edge, 1e-4));
        assert!(filter.edges()[..index - 1]
            .iter()
            .all(|e| !edges_equal(&kernel, e, &edge, 1e-4)));

        let missing = Segment::new(Point3::new(5.0, 0.0, 0.0), Point3::new(6.0, 0.0, 0.0));
        assert!(matches!(
            locator.locate_edge(&missing),
            Err(FemError::EntityNotFound { kind: "edge" })
        ));
    }

    #[test]
    fn test_locate_face_last_match_wins() {
        let kernel = AabbKernel::new();
        let filter = kernel
            .compound_filter(&[unit_box(0.0), unit_box(1.0)], CompoundMode::Plain)
            .unwrap();
        let locator = CompoundFilterLocator::new(&kernel, &filter);
        let shared = unit_box(0.0).faces()[1];
        // x=1 face is face 2 of the first box and face 7 of the second
        assert_eq!(locator.locate_face(&shared), Some(7));
        let nowhere = Rect::new(Axis::Z, 9.0, [0.0, 0.0], [1.0, 1.0]);
        assert_eq!(locator.locate_face(&nowhere), None);
    }

    #[test]
    fn test_locate_solid() {
        let kernel = AabbKernel::new();
        let filter = kernel
            .compound_filter(&[unit_box(0.0), unit_box(1.0)], CompoundMode::Plain)
            .unwrap();
        let locator = CompoundFilterLocator::new(&kernel, &filter);
        assert_eq!(locator.locate_solid(&unit_box(1.0)), Some(2));
        assert_eq!(locator.locate_solid(&unit_box(4.0)), None);
    }

    #[test]
    fn test_locate_solid_last_match_wins() {
        let kernel = AabbKernel::new();
        let solids = [unit_box(0.0), unit_box(0.0), unit_box(0.0)];
        let filter = kernel.compound_filter(&solids, CompoundMode::Plain).unwrap();
        let locator = CompoundFilterLocator::new(&kernel, &filter);
        assert_eq!(locator.locate_solid(&unit_box(0.0)), Some(3));
    }

    #[test]
    fn test_contained_faces_of_split_face() {
        let kernel = AabbKernel::new();
        let tall = Cuboid::from_size(Point3::new(1.0, 0.0, 0.0), [1.0, 2.0, 1.0]);
        let filter = kernel
            .compound_filter(&[unit_box(0.0), tall], CompoundMode::BooleanFragments)
            .unwrap();
        let locator = CompoundFilterLocator::new(&kernel, &filter);

        let tall_left = tall.faces()[0];
        let found = locator.locate_contained_faces(&tall_left, None).unwrap();
        assert_eq!(found.len(), 2);

        let excluded = locator
            .locate_contained_faces(&tall_left, Some(&found[..1]))
            .unwrap();
        assert_eq!(excluded, vec![found[1]]);
    }

    #[test]
    fn test_nested_duplicates_counted_once_with_exclusion() {
        let kernel = AabbKernel::new();
        let filter = kernel
            .compound_filter(&[unit_box(0.0), unit_box(1.0)], CompoundMode::Plain)
            .unwrap();
        let locator = CompoundFilterLocator::new(&kernel, &filter);
        let shared = unit_box(0.0).faces()[1];
        assert_eq!(locator.locate_contained_faces(&shared, None).unwrap(), vec![2, 7]);
        assert_eq!(
            locator.locate_contained_faces(&shared, Some(&[][..])).unwrap(),
            vec![2]
        );
        assert_eq!(
            locator.locate_contained_faces(&shared, Some(&[2][..])).unwrap(),
            vec![7]
        );
    }

    #[test]
    fn test_contained_faces_not_found() {
        let kernel = AabbKernel::new();
        let filter = kernel
            .compound_filter(&[unit_box(0.0)], CompoundMode::Plain)
            .unwrap();
        let locator = CompoundFilterLocator::new(&kernel, &filter);
        let far = Rect::new(Axis::Z, 5.0, [0.0, 0.0], [1.0, 1.0]);
        let err = locator.contained_faces(&far, None).unwrap_err();
        assert!(matches!(err, FemError::EntitiesNotFound { kind: "faces", .. }));
    }

    #[test]
    fn test_contained_solids_both_modes() {
        let kernel = AabbKernel::new();
        let filter = kernel
            .compound_filter(
                &[unit_box(0.0), unit_box(1.0), unit_box(2.0)],
                CompoundMode::Plain,
            )
            .unwrap();
        let region = Cuboid::from_size(Point3::origin(), [2.0, 1.0, 1.0]);
        for point_search in [true, false] {
            let locator = CompoundFilterLocator::new(&kernel, &filter).with_point_search(point_search);
            assert_eq!(locator.contained_solids(&region).unwrap(), vec![1, 2]);
        }
        let locator = CompoundFilterLocator::new(&kernel, &filter);
        assert!(locator.contained_solids(&unit_box(7.0)).is_err());
    }

    #[test]
    fn test_resolve_transfinite_lines() {
        let kernel = AabbKernel::new();
        let solid = unit_box(0.0);
        let filter = kernel
            .compound_filter(&[solid], CompoundMode::BooleanFragments)
            .unwrap();
        let locator = CompoundFilterLocator::new(&kernel, &filter);
        let edges = kernel.solid_edges(&solid);
        let mut params = vec![TransfiniteMeshParams::new("block", vec![])
            .with_lines(TransfiniteLineParams::new(edges[..2].to_vec(), 11).with_comment("x"))];
        locator.resolve_transfinite_lines(&mut params).unwrap();
        let line = &params[0].line_params[0];
        assert!(line.is_resolved());
        assert_eq!(line.lines.len(), 2);
        assert_ne!(line.lines[0], line.lines[1]);
    }
}
