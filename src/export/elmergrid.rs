// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! ElmerGrid driver

use crate::error::{FemError, Result};
use crate::mesh::MeshOutcome;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{info, warn};

/// Converts UNV meshes to Elmer mesh directories
#[derive(Debug, Clone)]
pub struct ElmerGridRunner {
    executable: PathBuf,
    log_file: Option<PathBuf>,
}

impl Default for ElmerGridRunner {
    fn default() -> Self {
        Self::new("ElmerGrid")
    }
}

impl ElmerGridRunner {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            log_file: None,
        }
    }

    /// Send both stdout and stderr to `path`
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Arguments for converting `unv`: `8 2 <unv> -autoclean -names [-out <dir>]`
    pub fn arguments(unv: &Path, out_dir: Option<&Path>) -> Vec<String> {
        let mut args = vec![
            "8".to_string(),
            "2".to_string(),
            unv.display().to_string(),
            "-autoclean".to_string(),
            "-names".to_string(),
        ];
        if let Some(dir) = out_dir {
            args.push("-out".to_string());
            args.push(dir.display().to_string());
        }
        args
    }

    /// Run the conversion and wait for it.
    ///
    /// A failed start or a non-zero exit is reported as
    /// [`MeshOutcome::Failed`] instead of an error.
    pub fn run(&self, unv: &Path, out_dir: Option<&Path>) -> MeshOutcome {
        let error = match self.execute(unv, out_dir) {
            Ok(status) if status.success() => return MeshOutcome::Completed,
            Ok(status) => FemError::Tool {
                tool: "ElmerGrid",
                message: format!("exited with {status}"),
            },
            Err(e) => FemError::Tool {
                tool: "ElmerGrid",
                message: format!("could not be executed: {e}"),
            },
        };
        warn!(%error, "ElmerGrid conversion failed");
        MeshOutcome::Failed(error.to_string())
    }

    fn execute(&self, unv: &Path, out_dir: Option<&Path>) -> Result<ExitStatus> {
        let args = Self::arguments(unv, out_dir);
        let mut command = Command::new(&self.executable);
        command.args(&args);

        match &self.log_file {
            Some(path) => {
                let file = File::create(path)?;
                command.stdout(file.try_clone()?).stderr(file);
            }
            None => {
                command.stdout(Stdio::null()).stderr(Stdio::null());
            }
        }

        info!(command = %format!("{} {}", self.executable.display(), args.join(" ")), "running ElmerGrid");
        Ok(command.status()?)
    }
}
