// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Named mesh groups

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a group references compound faces or compound solids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    Surface,
    Body,
}

impl GroupKind {
    /// Kernel-style reference prefix (`Face12`, `Solid3`)
    pub fn reference_prefix(self) -> &'static str {
        match self {
            GroupKind::Surface => "Face",
            GroupKind::Body => "Solid",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::Surface => f.write_str("surface"),
            GroupKind::Body => f.write_str("body"),
        }
    }
}

/// Label plus the 1-based compound-filter indices it covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshGroup {
    pub label: String,
    pub kind: GroupKind,
    pub references: Vec<usize>,
    pub mesh_size: Option<f64>,
}

impl MeshGroup {
    pub fn new(label: impl Into<String>, kind: GroupKind, mesh_size: Option<f64>) -> Self {
        Self {
            label: label.into(),
            kind,
            references: Vec::new(),
            mesh_size,
        }
    }

    pub fn reference_names(&self) -> Vec<String> {
        let prefix = self.kind.reference_prefix();
        self.references
            .iter()
            .map(|index| format!("{prefix}{index}"))
            .collect()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.references.contains(&index)
    }
}
