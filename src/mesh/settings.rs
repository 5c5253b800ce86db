// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! gmsh meshing options

use crate::error::FemError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Surface meshing algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm2D {
    MeshAdapt,
    #[default]
    Automatic,
    Delaunay,
    Frontal,
    Bamg,
    DelQuad,
}

impl Algorithm2D {
    pub const ALL: [Algorithm2D; 6] = [
        Algorithm2D::Automatic,
        Algorithm2D::MeshAdapt,
        Algorithm2D::Delaunay,
        Algorithm2D::Frontal,
        Algorithm2D::Bamg,
        Algorithm2D::DelQuad,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm2D::MeshAdapt => "MeshAdapt",
            Algorithm2D::Automatic => "Automatic",
            Algorithm2D::Delaunay => "Delaunay",
            Algorithm2D::Frontal => "Frontal",
            Algorithm2D::Bamg => "BAMG",
            Algorithm2D::DelQuad => "DelQuad",
        }
    }

    /// Value of the `Mesh.Algorithm` option
    pub fn gmsh_id(self) -> u8 {
        match self {
            Algorithm2D::MeshAdapt => 1,
            Algorithm2D::Automatic => 2,
            Algorithm2D::Delaunay => 5,
            Algorithm2D::Frontal => 6,
            Algorithm2D::Bamg => 7,
            Algorithm2D::DelQuad => 8,
        }
    }
}

impl fmt::Display for Algorithm2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm2D {
    type Err = FemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|a| a.name()).collect();
                FemError::invalid_parameter("2D algorithm", s, &names)
            })
    }
}

impl TryFrom<String> for Algorithm2D {
    type Error = FemError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Algorithm2D> for String {
    fn from(value: Algorithm2D) -> Self {
        value.name().to_string()
    }
}

/// Volume meshing algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm3D {
    Delaunay,
    #[default]
    NewDelaunay,
    Frontal,
    FrontalDelaunay,
    FrontalHex,
    Mmg3d,
    RTree,
}

impl Algorithm3D {
    pub const ALL: [Algorithm3D; 7] = [
        Algorithm3D::Delaunay,
        Algorithm3D::NewDelaunay,
        Algorithm3D::Frontal,
        Algorithm3D::FrontalDelaunay,
        Algorithm3D::FrontalHex,
        Algorithm3D::Mmg3d,
        Algorithm3D::RTree,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm3D::Delaunay => "Delaunay",
            Algorithm3D::NewDelaunay => "New Delaunay",
            Algorithm3D::Frontal => "Frontal",
            Algorithm3D::FrontalDelaunay => "Frontal Delaunay",
            Algorithm3D::FrontalHex => "Frontal Hex",
            Algorithm3D::Mmg3d => "MMG3D",
            Algorithm3D::RTree => "R-tree",
        }
    }

    /// Value of the `Mesh.Algorithm3D` option
    pub fn gmsh_id(self) -> u8 {
        match self {
            Algorithm3D::Delaunay => 1,
            Algorithm3D::NewDelaunay => 2,
            Algorithm3D::Frontal => 4,
            Algorithm3D::FrontalDelaunay => 5,
            Algorithm3D::FrontalHex => 6,
            Algorithm3D::Mmg3d => 7,
            Algorithm3D::RTree => 9,
        }
    }
}

impl fmt::Display for Algorithm3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm3D {
    type Err = FemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|a| a.name()).collect();
                FemError::invalid_parameter("3D algorithm", s, &names)
            })
    }
}

impl TryFrom<String> for Algorithm3D {
    type Error = FemError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Algorithm3D> for String {
    fn from(value: Algorithm3D) -> Self {
        value.name().to_string()
    }
}

/// Global options written at the top of the geo file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshSettings {
    /// Upper bound on element size (`Mesh.CharacteristicLengthMax`)
    pub characteristic_length: f64,
    #[serde(default)]
    pub algorithm_2d: Algorithm2D,
    #[serde(default)]
    pub algorithm_3d: Algorithm3D,
    /// 1 for linear, 2 for quadratic elements
    #[serde(default = "default_element_order")]
    pub element_order: u8,
}

fn default_element_order() -> u8 {
    1
}

impl MeshSettings {
    pub fn new(characteristic_length: f64) -> Self {
        Self {
            characteristic_length,
            algorithm_2d: Algorithm2D::default(),
            algorithm_3d: Algorithm3D::default(),
            element_order: default_element_order(),
        }
    }

    pub fn with_algorithms(mut self, algorithm_2d: Algorithm2D, algorithm_3d: Algorithm3D) -> Self {
        self.algorithm_2d = algorithm_2d;
        self.algorithm_3d = algorithm_3d;
        self
    }
}
