// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Preprocessing configuration

use crate::error::FemError;
use crate::geometry::DEFAULT_TOLERANCE;
use crate::kernel::CompoundMode;
use crate::mesh::{Algorithm2D, Algorithm3D, MeshSettings};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File read by [`PreprocessConfig::load`] when present
pub const CONFIG_FILE: &str = "femprep.toml";

/// Preprocessing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Geometric comparison tolerance
    pub tolerance: f64,
    /// Global maximum element size
    pub characteristic_length: f64,
    /// Mesh size for entities that do not set one
    pub default_mesh_size: Option<f64>,
    pub algorithm_2d: Algorithm2D,
    pub algorithm_3d: Algorithm3D,
    pub element_order: u8,
    /// Plain compound instead of boolean fragments; faces are never shared
    pub separate_boundaries: bool,
    /// Compound mode for several solids when boundaries are not separate
    pub compound_mode: Option<CompoundMode>,
    /// Mesh regions located from the registry solids instead of body groups
    pub regions_from_solids: bool,
    /// Witness points instead of common volume for solid containment
    pub point_search: bool,
    /// Body names that get no mesh region
    pub ignore_regions: Vec<String>,
    /// gmsh executable
    pub gmsh: PathBuf,
    /// ElmerGrid executable
    pub elmergrid: PathBuf,
    /// Directory for geo scripts and meshes
    pub work_dir: PathBuf,
    pub gmsh_log: Option<PathBuf>,
    pub elmergrid_log: Option<PathBuf>,
    /// ElmerGrid output directory (UNV file stem when unset)
    pub output_dir: Option<PathBuf>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            characteristic_length: 1.0,
            default_mesh_size: None,
            algorithm_2d: Algorithm2D::default(),
            algorithm_3d: Algorithm3D::default(),
            element_order: 1,
            separate_boundaries: false,
            compound_mode: None,
            regions_from_solids: false,
            point_search: true,
            ignore_regions: Vec::new(),
            gmsh: PathBuf::from("gmsh"),
            elmergrid: PathBuf::from("ElmerGrid"),
            work_dir: PathBuf::from("."),
            gmsh_log: None,
            elmergrid_log: None,
            output_dir: None,
        }
    }
}

impl PreprocessConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: PreprocessConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `femprep.toml` if it exists, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if Path::new(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `FEMPREP_*` environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `FEMPREP_*` overrides from any variable source
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(gmsh) = lookup("FEMPREP_GMSH") {
            self.gmsh = PathBuf::from(gmsh);
        }

        if let Some(elmergrid) = lookup("FEMPREP_ELMERGRID") {
            self.elmergrid = PathBuf::from(elmergrid);
        }

        if let Some(work_dir) = lookup("FEMPREP_WORK_DIR") {
            self.work_dir = PathBuf::from(work_dir);
        }

        if let Some(length) = lookup("FEMPREP_CHARACTERISTIC_LENGTH") {
            self.characteristic_length = length
                .parse()
                .with_context(|| format!("Invalid FEMPREP_CHARACTERISTIC_LENGTH: {length}"))?;
        }

        self.validate()?;
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), FemError> {
        if self.characteristic_length.is_nan() || self.characteristic_length <= 0.0 {
            return Err(FemError::Config(format!(
                "characteristic_length must be positive, got {}",
                self.characteristic_length
            )));
        }
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(FemError::Config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !matches!(self.element_order, 1 | 2) {
            return Err(FemError::Config(format!(
                "element_order must be 1 or 2, got {}",
                self.element_order
            )));
        }
        Ok(())
    }

    pub fn mesh_settings(&self) -> MeshSettings {
        MeshSettings {
            element_order: self.element_order,
            ..MeshSettings::new(self.characteristic_length)
                .with_algorithms(self.algorithm_2d, self.algorithm_3d)
        }
    }
}
