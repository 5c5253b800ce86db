// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for the preprocessing library

use thiserror::Error;

/// Errors raised by geometry matching, bookkeeping and tool drivers
#[derive(Debug, Error)]
pub enum FemError {
    /// A witness point or containment target could not be produced
    #[error("geometry not found: {0}")]
    GeometryNotFound(String),

    /// A single-entity lookup found no match in the compound filter
    #[error("{kind} not found in compound filter")]
    EntityNotFound { kind: &'static str },

    /// A multi-entity lookup found zero matches in the compound filter
    #[error("{kind} not found in compound filter for entity '{entity}'")]
    EntitiesNotFound { kind: &'static str, entity: String },

    /// Unrecognised keyword (symmetry plane, algorithm, ...)
    #[error("invalid parameter '{value}' for {parameter}, expected one of: {expected}")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
        expected: String,
    },

    /// The geometry kernel rejected an operation
    #[error("kernel operation failed: {0}")]
    Kernel(String),

    /// An external tool could not be run or exited unsuccessfully
    #[error("{tool} failed: {message}")]
    Tool { tool: &'static str, message: String },

    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FemError {
    pub(crate) fn invalid_parameter(
        parameter: &'static str,
        value: impl Into<String>,
        expected: &[&str],
    ) -> Self {
        FemError::InvalidParameter {
            parameter,
            value: value.into(),
            expected: expected.join(", "),
        }
    }

    /// Attach the entity name to a lookup failure
    pub fn for_entity(self, name: &str) -> Self {
        match self {
            FemError::EntitiesNotFound { kind, .. } => FemError::EntitiesNotFound {
                kind,
                entity: name.to_string(),
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, FemError>;
