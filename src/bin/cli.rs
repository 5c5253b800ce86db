// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! femprep CLI

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use femprep::export::ElmerGridRunner;
use femprep::kernel::aabb::{AabbKernel, Cuboid};
use femprep::mesh::{Algorithm2D, Algorithm3D};
use femprep::{EntityRegistry, GmshRunner, MeshOutcome, MeshReport, PreprocessConfig, Preprocessor};
use indicatif::{ProgressBar, ProgressStyle};
use nalgebra::Point3;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "femprep")]
#[command(about = "FEM preprocessing: named boundaries and bodies, gmsh and ElmerGrid", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to femprep.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Mesh an existing geo script with gmsh
    Mesh {
        /// Geo script
        geo: PathBuf,

        /// gmsh log file
        #[arg(short, long)]
        log: Option<PathBuf>,
    },

    /// Convert a UNV mesh with ElmerGrid
    Elmergrid {
        /// UNV mesh file
        unv: PathBuf,

        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// ElmerGrid log file
        #[arg(short, long)]
        log: Option<PathBuf>,
    },

    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// List gmsh meshing algorithms
    Algorithms,

    /// Preprocess a row of touching boxes and print the groups as JSON
    Demo {
        /// Number of boxes
        #[arg(short, long, default_value = "3")]
        boxes: usize,

        /// Keep the faces between boxes separate
        #[arg(long)]
        separate: bool,

        /// Also write the geo script here
        #[arg(short, long)]
        geo: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default configuration file
    Init {
        #[arg(short, long, default_value = "femprep.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Mesh { geo, log } => {
            let config = load_config(cli.config.as_deref())?;
            mesh_command(&config, &geo, log.or(config.gmsh_log.clone()))?;
        }
        Commands::Elmergrid { unv, out, log } => {
            let config = load_config(cli.config.as_deref())?;
            elmergrid_command(&config, &unv, out, log)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { output, force } => {
                if output.exists() && !force {
                    bail!("{} already exists, use --force to overwrite", output.display());
                }
                PreprocessConfig::default().save(&output)?;
                println!("{} {}", "Wrote".green(), output.display());
            }
            ConfigAction::Show => {
                let config = load_config(cli.config.as_deref())?;
                print!("{}", toml::to_string_pretty(&config)?);
            }
        },
        Commands::Algorithms => algorithms_command(),
        Commands::Demo {
            boxes,
            separate,
            geo,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            config.separate_boundaries |= separate;
            demo_command(config, boxes, geo.as_deref(), cli.verbose)?;
        }
        Commands::Version => {
            println!("femprep v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "femprep=debug" } else { "femprep=warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PreprocessConfig> {
    match path {
        Some(path) => {
            let mut config = PreprocessConfig::from_file(path)?;
            config.apply_env_overrides()?;
            Ok(config)
        }
        None => PreprocessConfig::load(),
    }
}

fn mesh_command(config: &PreprocessConfig, geo: &Path, log: Option<PathBuf>) -> Result<()> {
    if !geo.exists() {
        bail!("Geo script not found: {}", geo.display());
    }

    let mut runner = GmshRunner::new(&config.gmsh);
    if let Some(log) = log {
        runner = runner.with_log_file(log);
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")?);
    spinner.set_message(format!("Meshing {}", geo.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let (outcome, duration) = runner.run(geo);
    spinner.finish_and_clear();

    match outcome {
        MeshOutcome::Completed => {
            println!("{} {} in {:.2?}", "Meshed".green(), geo.display(), duration);
        }
        MeshOutcome::Failed(message) => {
            eprintln!("{} gmsh reported errors:", "Error:".red());
            eprintln!("{}", message.bright_black());
            bail!("Meshing {} failed", geo.display());
        }
    }
    Ok(())
}

fn elmergrid_command(
    config: &PreprocessConfig,
    unv: &Path,
    out: Option<PathBuf>,
    log: Option<PathBuf>,
) -> Result<()> {
    if !unv.exists() {
        bail!("UNV file not found: {}", unv.display());
    }

    let mut runner = ElmerGridRunner::new(&config.elmergrid);
    if let Some(log) = log.or(config.elmergrid_log.clone()) {
        runner = runner.with_log_file(log);
    }
    let out = out.or(config.output_dir.clone());
    println!(
        "{} ElmerGrid {}",
        "Running".bright_blue(),
        ElmerGridRunner::arguments(unv, out.as_deref()).join(" ")
    );
    match runner.run(unv, out.as_deref()) {
        MeshOutcome::Completed => println!("{}", "Finished ElmerGrid".green()),
        MeshOutcome::Failed(message) => bail!(message),
    }
    Ok(())
}

fn algorithms_command() {
    println!("{}", "2D algorithms (Mesh.Algorithm)".bold());
    for algorithm in Algorithm2D::ALL {
        println!("  {:>2}  {}", algorithm.gmsh_id(), algorithm);
    }
    println!("{}", "3D algorithms (Mesh.Algorithm3D)".bold());
    for algorithm in Algorithm3D::ALL {
        println!("  {:>2}  {}", algorithm.gmsh_id(), algorithm);
    }
}

/// Row of unit boxes along x with named ends, walls and interfaces
fn demo_registry(boxes: usize) -> EntityRegistry<AabbKernel> {
    let mut registry = EntityRegistry::new("demo");
    for i in 0..boxes {
        let solid = Cuboid::from_size(Point3::new(i as f64, 0.0, 0.0), [1.0, 1.0, 1.0]);
        let faces = solid.faces();
        let start = if i == 0 { "inlet".to_string() } else { format!("block{}_start", i + 1) };
        let end = if i + 1 == boxes { "outlet".to_string() } else { format!("block{}_end", i + 1) };
        registry.add_face(&start, faces[0], None);
        registry.add_face(&end, faces[1], None);
        for wall in &faces[2..] {
            registry.add_face("wall", *wall, None);
        }
        registry.add_solid(&format!("block{}", i + 1), solid, None);
    }
    registry
}

fn demo_command(
    config: PreprocessConfig,
    boxes: usize,
    geo: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    if boxes == 0 {
        bail!("At least one box is required");
    }

    let kernel = AabbKernel::new();
    let registry = demo_registry(boxes);
    let preprocessor = Preprocessor::new(&kernel, config);
    let prepared = preprocessor.prepare(&registry)?;
    let mut report = preprocessor.report(&registry.name, &prepared);

    if let Some(geo) = geo {
        preprocessor.write_geo(&prepared, Path::new("demo.brep"), geo)?;
        report.geo_file = Some(geo.to_path_buf());
    }

    if verbose {
        print_summary(&report);
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_summary(report: &MeshReport) {
    eprintln!("{}", "═".repeat(60).bright_black());
    eprintln!("{}", format!("Preprocessing: {}", report.name).bold());
    eprintln!("{}", "═".repeat(60).bright_black());
    eprintln!("  {} {:?}", "Compound mode:".bright_black(), report.compound_mode);
    eprintln!(
        "  {} {} faces, {} solids",
        "Compound:".bright_black(),
        report.compound_faces.to_string().cyan(),
        report.compound_solids.to_string().cyan()
    );
    for group in &report.groups {
        eprintln!(
            "  {:<8} {:<32} {}",
            group.kind.to_string().bright_black(),
            group.label.green(),
            group.reference_names().join(" ")
        );
    }
    eprintln!("{}", "═".repeat(60).bright_black());
}
