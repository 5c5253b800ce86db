// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! gmsh driver

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{info, warn};

const ANSI_CODES: [&str; 4] = ["\x1b[1m", "\x1b[31m", "\x1b[35m", "\x1b[0m"];

/// Remove the color escapes gmsh puts into its diagnostics
pub fn strip_ansi(message: &str) -> String {
    ANSI_CODES
        .iter()
        .fold(message.to_string(), |text, code| text.replace(code, ""))
}

/// Result of a meshing run. gmsh failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum MeshOutcome {
    Completed,
    Failed(String),
}

impl MeshOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MeshOutcome::Completed)
    }

    /// Any stderr output at all, whitespace included, is a failure
    fn from_stderr(stderr: &[u8]) -> Self {
        let message = strip_ansi(&String::from_utf8_lossy(stderr));
        if message.is_empty() {
            MeshOutcome::Completed
        } else {
            MeshOutcome::Failed(message)
        }
    }
}

/// Runs gmsh on geo scripts
#[derive(Debug, Clone)]
pub struct GmshRunner {
    executable: PathBuf,
    log_file: Option<PathBuf>,
}

impl Default for GmshRunner {
    fn default() -> Self {
        Self::new("gmsh")
    }
}

impl GmshRunner {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            log_file: None,
        }
    }

    /// Send gmsh stdout, followed by the cleaned stderr, to `path`
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Check whether the executable can be started
    pub fn is_available(&self) -> bool {
        Command::new(&self.executable)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    /// Run `<gmsh> - <geo>` to completion.
    ///
    /// Nothing here is raised. Output on stderr, a failed start and a log
    /// file that cannot be written all come back as [`MeshOutcome::Failed`].
    pub fn run(&self, geo: &Path) -> (MeshOutcome, Duration) {
        let start = Instant::now();
        let outcome = match self.execute(geo) {
            Ok(outcome) => outcome,
            Err(e) => MeshOutcome::Failed(format!("Error executing gmsh: {e}")),
        };
        if let MeshOutcome::Failed(message) = &outcome {
            warn!(%message, "gmsh reported errors");
        }
        (outcome, start.elapsed())
    }

    fn execute(&self, geo: &Path) -> Result<MeshOutcome> {
        let mut command = Command::new(&self.executable);
        command.arg("-").arg(geo).stderr(Stdio::piped());

        let mut log = match &self.log_file {
            Some(path) => {
                let file = File::create(path)?;
                command.stdout(file.try_clone()?);
                Some(file)
            }
            None => {
                command.stdout(Stdio::null());
                None
            }
        };

        info!(gmsh = %self.executable.display(), geo = %geo.display(), "running gmsh");
        let output = command.output()?;
        let outcome = MeshOutcome::from_stderr(&output.stderr);

        if let (Some(file), MeshOutcome::Failed(message)) = (log.as_mut(), &outcome) {
            file.write_all(message.as_bytes())?;
            file.flush()?;
        }
        Ok(outcome)
    }
}
