//! Forma CLI - check and measure STL uploads from the command line

mod settings;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use forma_core::mesh::ModelReport;
use forma_core::preview::{LoadedModel, Mirror, PreviewSession, PreviewState};
use forma_core::stl::{StlDecoder, write_stl};
use forma_core::upload::UploadedFile;
use serde::Serialize;
use settings::Settings;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "forma")]
#[command(about = "Validate and measure 3D-print uploads", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the triangle cap
    #[arg(long, global = true)]
    max_triangles: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check one or more STL files against the upload policy
    Validate {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Parse a file and report its dimensions
    Inspect {
        /// Model file
        file: PathBuf,

        /// Filament colour for the preview
        #[arg(long)]
        color: Option<String>,

        /// Mirror across the X axis
        #[arg(long)]
        mirror_x: bool,

        /// Mirror across the Y axis
        #[arg(long)]
        mirror_y: bool,

        /// Mirror across the Z axis
        #[arg(long)]
        mirror_z: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a copy of the model centred on the origin
    Recenter {
        /// Input STL file
        #[arg(short, long)]
        input: PathBuf,

        /// Output STL file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show the effective settings
    Config {
        /// Write the effective settings to the settings file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = settings::load_settings(cli.config.as_deref());
    if let Some(max) = cli.max_triangles {
        settings.max_triangles = max;
    }

    match cli.command {
        Commands::Validate { files } => {
            run_validate(&files, &settings)?;
        }
        Commands::Inspect {
            file,
            color,
            mirror_x,
            mirror_y,
            mirror_z,
            json,
        } => {
            let mirror = Mirror::new(mirror_x, mirror_y, mirror_z);
            run_inspect(&file, color, mirror, json, &settings)?;
        }
        Commands::Recenter { input, output } => {
            run_recenter(&input, &output, &settings)?;
        }
        Commands::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            if save {
                let path = settings::save_settings(&settings, cli.config.as_deref())?;
                println!("Saved to {}", path.display());
            }
        }
    }

    Ok(())
}

fn run_validate(files: &[PathBuf], settings: &Settings) -> Result<()> {
    let decoder = StlDecoder::with_limits(settings.limits());
    let policy = settings.upload_policy();

    let mut failed = 0;
    for path in files {
        let outcome = UploadedFile::read(path, &policy).and_then(|file| {
            if file.format.is_previewable() {
                decoder.validate(&file.bytes).map(|info| {
                    format!("{} triangles", info.triangle_count)
                })
            } else {
                Ok(format!("accepted {} file (not inspected)", file.format.name()))
            }
        });

        match outcome {
            Ok(summary) => println!("OK    {}: {}", path.display(), summary),
            Err(err) => {
                failed += 1;
                println!("FAIL  {}: {}", path.display(), err.user_message());
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed validation", failed, files.len());
    }
    Ok(())
}

/// JSON output of `forma inspect`
#[derive(Serialize)]
struct InspectOutput {
    #[serde(flatten)]
    report: ModelReport,
    color: String,
    mirror: [bool; 3],
    camera_distance: f32,
}

fn run_inspect(
    path: &Path,
    color: Option<String>,
    mirror: Mirror,
    json: bool,
    settings: &Settings,
) -> Result<()> {
    let file = UploadedFile::read(path, &settings.upload_policy())
        .map_err(|err| anyhow::anyhow!(err.user_message()))
        .with_context(|| format!("Failed to accept {}", path.display()))?;

    let mut session = PreviewSession::new(StlDecoder::with_limits(settings.limits()))
        .with_color(color.unwrap_or_else(|| settings.default_color.clone()))
        .with_mirror(mirror)
        .with_fov(settings.camera_fov_degrees);

    match session.load_upload(&file) {
        PreviewState::Parsed(model) => print_model(model, json),
        PreviewState::Rejected(err) | PreviewState::Failed(err) => {
            bail!("{}: {}", path.display(), err.user_message())
        }
        _ => {
            println!(
                "{}: {} files are accepted but not previewed",
                path.display(),
                file.format.name()
            );
            Ok(())
        }
    }
}

fn print_model(model: &LoadedModel, json: bool) -> Result<()> {
    let report = ModelReport::new(&model.display_mesh())?;

    if json {
        let output = InspectOutput {
            report,
            color: format!("#{:06x}", model.color),
            mirror: [model.mirror.x, model.mirror.y, model.mirror.z],
            camera_distance: model.framing.distance,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let [w, d, h] = report.display_dimensions;
    println!("Triangles:   {}", report.triangle_count);
    println!("Width (X):   {:.2} mm", w);
    println!("Depth (Y):   {:.2} mm", d);
    println!("Height (Z):  {:.2} mm", h);
    println!(
        "Bounds:      ({:.2}, {:.2}, {:.2}) to ({:.2}, {:.2}, {:.2})",
        report.min[0], report.min[1], report.min[2], report.max[0], report.max[1], report.max[2]
    );
    println!("Color:       #{:06x}", model.color);
    println!("Camera:      {:.2} mm from origin", model.framing.distance);
    Ok(())
}

fn run_recenter(input: &Path, output: &Path, settings: &Settings) -> Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let mesh = StlDecoder::with_limits(settings.limits())
        .parse(&bytes)
        .map_err(|err| anyhow::anyhow!(err.user_message()))?;

    write_stl(&mesh, output).with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} triangles to {} (shifted by {:.3}, {:.3}, {:.3})",
        mesh.triangle_count(),
        output.display(),
        mesh.offset.x,
        mesh.offset.y,
        mesh.offset.z
    );
    Ok(())
}
