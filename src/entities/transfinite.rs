// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Transfinite meshing parameters

use std::collections::BTreeMap;

/// Transfinite line distribution over a set of edges.
///
/// `lines` holds the 1-based compound-filter edge indices and is filled in
/// once the compound filter exists.
#[derive(Debug, Clone, PartialEq)]
pub struct TransfiniteLineParams<E> {
    pub edges: Vec<E>,
    pub point_count: u32,
    pub progression: f64,
    pub comment: String,
    pub lines: Vec<usize>,
}

impl<E> TransfiniteLineParams<E> {
    pub fn new(edges: Vec<E>, point_count: u32) -> Self {
        Self {
            edges,
            point_count,
            progression: 1.0,
            comment: String::new(),
            lines: Vec::new(),
        }
    }

    pub fn with_progression(mut self, progression: f64) -> Self {
        self.progression = progression;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.lines.len() == self.edges.len()
    }
}

/// Transfinite volume made of named surfaces
#[derive(Debug, Clone, PartialEq)]
pub struct TransfiniteMeshParams<E> {
    /// Name of the body group meshed as a transfinite volume
    pub volume: String,
    /// Names of the surface groups meshed as transfinite surfaces
    pub surfaces: Vec<String>,
    /// Optional triangle orientation per surface (`Left`, `Right`, `Alternate`)
    pub directions: BTreeMap<String, String>,
    pub line_params: Vec<TransfiniteLineParams<E>>,
}

impl<E> TransfiniteMeshParams<E> {
    pub fn new(volume: impl Into<String>, surfaces: Vec<String>) -> Self {
        Self {
            volume: volume.into(),
            surfaces,
            directions: BTreeMap::new(),
            line_params: Vec::new(),
        }
    }

    pub fn with_direction(mut self, surface: impl Into<String>, direction: impl Into<String>) -> Self {
        self.directions.insert(surface.into(), direction.into());
        self
    }

    pub fn with_lines(mut self, params: TransfiniteLineParams<E>) -> Self {
        self.line_params.push(params);
        self
    }
}
