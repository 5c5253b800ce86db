// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Axis-aligned reference kernel
//!
//! Solids are boxes, faces are axis-aligned rectangles and edges are straight
//! segments. Boolean fragments and XOR are supported for boxes that touch but
//! do not overlap: coplanar faces are split along each other's borders and
//! shared pieces are kept once.

use super::{CompoundFilter, CompoundMode, HalfSpace, Kernel, ParameterRange};
use crate::error::{FemError, Result};
use crate::geometry::{vertices_equal, BoundingBox, SymmetryPlane};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

const SPLIT_EPS: f64 = 1e-9;

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two in-plane axes used as `(u, v)` for a face with this normal
    pub fn in_plane(self) -> (usize, usize) {
        match self {
            Axis::X => (1, 2),
            Axis::Y => (0, 2),
            Axis::Z => (0, 1),
        }
    }
}

/// Straight edge between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Segment {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    pub fn distance_to(&self, point: &Point3<f64>) -> f64 {
        let dir = self.end - self.start;
        let len_sq = dir.norm_squared();
        if len_sq == 0.0 {
            return (point - self.start).norm();
        }
        let t = ((point - self.start).dot(&dir) / len_sq).clamp(0.0, 1.0);
        (point - (self.start + dir * t)).norm()
    }
}

/// Axis-aligned rectangle lying in the plane `coord[normal] == offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub normal: Axis,
    pub offset: f64,
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Rect {
    pub fn new(normal: Axis, offset: f64, min: [f64; 2], max: [f64; 2]) -> Self {
        Self {
            normal,
            offset,
            min,
            max,
        }
    }

    /// Point at in-plane coordinates `(a, b)`
    pub fn point(&self, a: f64, b: f64) -> Point3<f64> {
        let (ia, ib) = self.normal.in_plane();
        let mut coords = [0.0; 3];
        coords[self.normal.index()] = self.offset;
        coords[ia] = a;
        coords[ib] = b;
        Point3::from(coords)
    }

    pub fn corners(&self) -> [Point3<f64>; 4] {
        [
            self.point(self.min[0], self.min[1]),
            self.point(self.max[0], self.min[1]),
            self.point(self.max[0], self.max[1]),
            self.point(self.min[0], self.max[1]),
        ]
    }

    pub fn edges(&self) -> [Segment; 4] {
        let c = self.corners();
        [
            Segment::new(c[0], c[1]),
            Segment::new(c[1], c[2]),
            Segment::new(c[2], c[3]),
            Segment::new(c[3], c[0]),
        ]
    }

    pub fn area(&self) -> f64 {
        (self.max[0] - self.min[0]).max(0.0) * (self.max[1] - self.min[1]).max(0.0)
    }

    pub fn is_degenerate(&self) -> bool {
        self.max[0] - self.min[0] <= 0.0 || self.max[1] - self.min[1] <= 0.0
    }

    fn same_plane(&self, other: &Rect) -> bool {
        self.normal == other.normal && (self.offset - other.offset).abs() < SPLIT_EPS
    }

    fn overlaps(&self, other: &Rect) -> bool {
        (0..2).all(|i| self.min[i] < other.max[i] - SPLIT_EPS && other.min[i] < self.max[i] - SPLIT_EPS)
    }

    fn same_as(&self, other: &Rect) -> bool {
        self.same_plane(other)
            && (0..2).all(|i| {
                (self.min[i] - other.min[i]).abs() < SPLIT_EPS
                    && (self.max[i] - other.max[i]).abs() < SPLIT_EPS
            })
    }

    /// Split along the given in-plane break coordinates
    fn split(&self, cuts: &[Vec<f64>; 2]) -> Vec<Rect> {
        let bounds = |i: usize| {
            let mut b = vec![self.min[i]];
            b.extend(
                cuts[i]
                    .iter()
                    .copied()
                    .filter(|c| *c > self.min[i] + SPLIT_EPS && *c < self.max[i] - SPLIT_EPS),
            );
            b.push(self.max[i]);
            b
        };
        let (a, b) = (bounds(0), bounds(1));
        let mut pieces = Vec::new();
        for wa in a.windows(2) {
            for wb in b.windows(2) {
                pieces.push(Rect::new(self.normal, self.offset, [wa[0], wb[0]], [wa[1], wb[1]]));
            }
        }
        pieces
    }
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Cuboid {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    pub fn from_size(origin: Point3<f64>, size: [f64; 3]) -> Self {
        Self::new(
            origin,
            Point3::new(origin.x + size[0], origin.y + size[1], origin.z + size[2]),
        )
    }

    /// Faces ordered x-min, x-max, y-min, y-max, z-min, z-max
    pub fn faces(&self) -> Vec<Rect> {
        let mut faces = Vec::with_capacity(6);
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let (ia, ib) = axis.in_plane();
            let min = [self.min[ia], self.min[ib]];
            let max = [self.max[ia], self.max[ib]];
            faces.push(Rect::new(axis, self.min[axis.index()], min, max));
            faces.push(Rect::new(axis, self.max[axis.index()], min, max));
        }
        faces
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.min, self.max)
    }

    pub fn volume(&self) -> f64 {
        self.bounding_box().volume()
    }
}

/// Kernel over [`Cuboid`], [`Rect`] and [`Segment`]
#[derive(Debug, Clone, Default)]
pub struct AabbKernel;

impl AabbKernel {
    pub fn new() -> Self {
        Self
    }

    fn fragment_faces(solids: &[Cuboid]) -> Vec<Rect> {
        let all: Vec<Rect> = solids.iter().flat_map(Cuboid::faces).collect();
        let mut fragments: Vec<Rect> = Vec::new();
        for face in &all {
            let mut cuts: [Vec<f64>; 2] = [Vec::new(), Vec::new()];
            for other in all.iter().filter(|o| o.same_plane(face) && o.overlaps(face)) {
                for i in 0..2 {
                    cuts[i].push(other.min[i]);
                    cuts[i].push(other.max[i]);
                }
            }
            for cut in cuts.iter_mut() {
                cut.sort_by(f64::total_cmp);
                cut.dedup_by(|a, b| (*a - *b).abs() < SPLIT_EPS);
            }
            for piece in face.split(&cuts) {
                if !fragments.iter().any(|f| f.same_as(&piece)) {
                    fragments.push(piece);
                }
            }
        }
        fragments
    }
}

impl Kernel for AabbKernel {
    type Edge = Segment;
    type Face = Rect;
    type Solid = Cuboid;

    fn edge_vertices(&self, edge: &Segment) -> Vec<Point3<f64>> {
        vec![edge.start, edge.end]
    }

    fn face_vertices(&self, face: &Rect) -> Vec<Point3<f64>> {
        face.corners().to_vec()
    }

    fn face_edges(&self, face: &Rect) -> Vec<Segment> {
        face.edges().to_vec()
    }

    fn face_center_of_mass(&self, face: &Rect) -> Point3<f64> {
        face.point(
            (face.min[0] + face.max[0]) / 2.0,
            (face.min[1] + face.max[1]) / 2.0,
        )
    }

    fn face_parameter_range(&self, face: &Rect) -> ParameterRange {
        ParameterRange::new(face.min[0], face.max[0], face.min[1], face.max[1])
    }

    fn face_value_at(&self, face: &Rect, u: f64, v: f64) -> Point3<f64> {
        face.point(u, v)
    }

    fn face_is_part_of_domain(&self, face: &Rect, u: f64, v: f64) -> bool {
        !face.is_degenerate()
            && u >= face.min[0]
            && u <= face.max[0]
            && v >= face.min[1]
            && v <= face.max[1]
    }

    fn face_contains(&self, face: &Rect, point: &Point3<f64>, tolerance: f64) -> bool {
        let (ia, ib) = face.normal.in_plane();
        (point[face.normal.index()] - face.offset).abs() <= tolerance
            && point[ia] >= face.min[0] - tolerance
            && point[ia] <= face.max[0] + tolerance
            && point[ib] >= face.min[1] - tolerance
            && point[ib] <= face.max[1] + tolerance
    }

    fn distance_to_edge(&self, point: &Point3<f64>, edge: &Segment) -> f64 {
        edge.distance_to(point)
    }

    fn solid_faces(&self, solid: &Cuboid) -> Vec<Rect> {
        solid.faces()
    }

    fn solid_edges(&self, solid: &Cuboid) -> Vec<Segment> {
        let mut edges: Vec<Segment> = Vec::with_capacity(12);
        for face in solid.faces() {
            for edge in face.edges() {
                let known = edges.iter().any(|e| {
                    (vertices_equal(&e.start, &edge.start, SPLIT_EPS)
                        && vertices_equal(&e.end, &edge.end, SPLIT_EPS))
                        || (vertices_equal(&e.start, &edge.end, SPLIT_EPS)
                            && vertices_equal(&e.end, &edge.start, SPLIT_EPS))
                });
                if !known {
                    edges.push(edge);
                }
            }
        }
        edges
    }

    fn solid_bounding_box(&self, solid: &Cuboid) -> BoundingBox {
        solid.bounding_box()
    }

    fn solid_contains(
        &self,
        solid: &Cuboid,
        point: &Point3<f64>,
        tolerance: f64,
        include_boundary: bool,
    ) -> bool {
        (0..3).all(|i| {
            if include_boundary {
                point[i] >= solid.min[i] - tolerance && point[i] <= solid.max[i] + tolerance
            } else {
                point[i] > solid.min[i] + tolerance && point[i] < solid.max[i] - tolerance
            }
        })
    }

    fn common_volume(&self, a: &Cuboid, b: &Cuboid) -> f64 {
        a.bounding_box().intersection(&b.bounding_box()).volume()
    }

    fn half_space(&self, solid: &Cuboid, plane: SymmetryPlane, keep: HalfSpace) -> Result<Cuboid> {
        let axis = plane.normal_index();
        let mut cut = *solid;
        match keep {
            HalfSpace::Negative => cut.max[axis] = cut.max[axis].min(0.0),
            HalfSpace::Positive => cut.min[axis] = cut.min[axis].max(0.0),
        }
        if cut.max[axis] <= cut.min[axis] {
            return Err(FemError::Kernel(format!(
                "{} half of solid is empty after cut with plane {}",
                match keep {
                    HalfSpace::Negative => "negative",
                    HalfSpace::Positive => "positive",
                },
                plane
            )));
        }
        Ok(cut)
    }

    fn compound_filter(
        &self,
        solids: &[Cuboid],
        mode: CompoundMode,
    ) -> Result<CompoundFilter<Self>> {
        let faces = match mode {
            CompoundMode::Plain => solids.iter().flat_map(Cuboid::faces).collect(),
            CompoundMode::BooleanFragments | CompoundMode::Xor => {
                for (i, a) in solids.iter().enumerate() {
                    for b in &solids[i + 1..] {
                        if self.common_volume(a, b) > 0.0 {
                            return Err(FemError::Kernel(format!(
                                "overlapping boxes are not supported in {mode:?} mode"
                            )));
                        }
                    }
                }
                // without overlaps nothing is covered twice, so XOR keeps every fragment
                Self::fragment_faces(solids)
            }
        };

        let mut edges: Vec<Segment> = Vec::new();
        for face in &faces {
            for edge in face.edges() {
                let known = edges.iter().any(|e| {
                    vertices_equal(&e.start, &edge.start, SPLIT_EPS)
                        && vertices_equal(&e.end, &edge.end, SPLIT_EPS)
                        || vertices_equal(&e.start, &edge.end, SPLIT_EPS)
                            && vertices_equal(&e.end, &edge.start, SPLIT_EPS)
                });
                if !known || mode == CompoundMode::Plain {
                    edges.push(edge);
                }
            }
        }

        Ok(CompoundFilter::new(faces, solids.to_vec(), edges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(x: f64) -> Cuboid {
        Cuboid::from_size(Point3::new(x, 0.0, 0.0), [1.0, 1.0, 1.0])
    }

    #[test]
    fn test_cuboid_faces() {
        let faces = unit_box(0.0).faces();
        assert_eq!(faces.len(), 6);
        assert_eq!(faces[1].normal, Axis::X);
        assert_eq!(faces[1].offset, 1.0);
        assert_eq!(faces.iter().map(Rect::area).sum::<f64>(), 6.0);
    }

    #[test]
    fn test_segment_distance() {
        let seg = Segment::new(Point3::origin(), Point3::new(2.0, 0.0, 0.0));
        assert_eq!(seg.distance_to(&Point3::new(1.0, 1.0, 0.0)), 1.0);
        assert_eq!(seg.distance_to(&Point3::new(3.0, 0.0, 0.0)), 1.0);
    }

    #[test]
    fn test_solid_edges_are_unique() {
        let kernel = AabbKernel::new();
        assert_eq!(kernel.solid_edges(&unit_box(0.0)).len(), 12);
    }

    #[test]
    fn test_plain_compound_keeps_duplicates() {
        let kernel = AabbKernel::new();
        let cf = kernel
            .compound_filter(&[unit_box(0.0), unit_box(1.0)], CompoundMode::Plain)
            .unwrap();
        assert_eq!(cf.face_count(), 12);
        assert_eq!(cf.solid_count(), 2);
    }

    #[test]
    fn test_fragments_share_touching_face() {
        let kernel = AabbKernel::new();
        let cf = kernel
            .compound_filter(
                &[unit_box(0.0), unit_box(1.0)],
                CompoundMode::BooleanFragments,
            )
            .unwrap();
        assert_eq!(cf.face_count(), 11);
        assert_eq!(cf.edges().len(), 20);
    }

    #[test]
    fn test_fragments_split_partially_shared_face() {
        let kernel = AabbKernel::new();
        let tall = Cuboid::from_size(Point3::new(1.0, 0.0, 0.0), [1.0, 2.0, 1.0]);
        let cf = kernel
            .compound_filter(&[unit_box(0.0), tall], CompoundMode::BooleanFragments)
            .unwrap();
        // x=1 plane: one shared piece plus the upper half of the tall box face
        let on_plane = cf
            .faces()
            .iter()
            .filter(|f| f.normal == Axis::X && f.offset == 1.0)
            .count();
        assert_eq!(on_plane, 2);
        assert_eq!(cf.face_count(), 12);
    }

    #[test]
    fn test_fragments_reject_overlap() {
        let kernel = AabbKernel::new();
        let a = Cuboid::from_size(Point3::origin(), [2.0, 1.0, 1.0]);
        for mode in [CompoundMode::BooleanFragments, CompoundMode::Xor] {
            let result = kernel.compound_filter(&[a, unit_box(1.0)], mode);
            assert!(matches!(result, Err(FemError::Kernel(_))));
        }
    }

    #[test]
    fn test_xor_of_touching_boxes_matches_fragments() {
        let kernel = AabbKernel::new();
        let tall = Cuboid::from_size(Point3::new(1.0, 0.0, 0.0), [1.0, 2.0, 1.0]);
        let solids = [unit_box(0.0), tall];
        let xor = kernel.compound_filter(&solids, CompoundMode::Xor).unwrap();
        let fragments = kernel
            .compound_filter(&solids, CompoundMode::BooleanFragments)
            .unwrap();
        assert_eq!(xor.faces(), fragments.faces());
        assert_eq!(xor.edges(), fragments.edges());
        assert_eq!(xor.solid_count(), 2);
    }

    #[test]
    fn test_half_space() {
        let kernel = AabbKernel::new();
        let solid = Cuboid::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let lower = kernel
            .half_space(&solid, SymmetryPlane::Xy, HalfSpace::Negative)
            .unwrap();
        assert_eq!(lower.max.z, 0.0);
        let upper = kernel
            .half_space(&solid, SymmetryPlane::Zx, HalfSpace::Positive)
            .unwrap();
        assert_eq!(upper.min.y, 0.0);
        assert!(kernel
            .half_space(&upper, SymmetryPlane::Zx, HalfSpace::Negative)
            .is_err());
    }
}
