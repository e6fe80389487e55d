//! `tetmesh` - mirror, merge and repair tetrahedral meshes from the shell.
//!
//! # Commands
//!
//! - `tetmesh info <mesh>` - Counts, bounds, volume and regions
//! - `tetmesh check <mesh>` - Orientation, unreferenced and duplicate diagnostics
//! - `tetmesh repair <mesh> -o <out>` - Drop bad elements and unused vertices
//! - `tetmesh mirror <mesh> --axis x -o <out>` - Reflect and merge across a bounding face
//! - `tetmesh merge <a> <b> --axis x -o <out>` - Weld two meshes across a plane
//! - `tetmesh scale`, `translate`, `snap` - Single transforms
//! - `tetmesh run <config.toml> <mesh> -o <out>` - Run a configured pipeline
//! - `tetmesh multiscale <mesh> --out-dir <dir>` - Coarse, medium and fine levels
//!
//! Formats follow the file extension (`.mesh` or `.vtk`). Logging goes to
//! stderr and is controlled by `RUST_LOG` or `-v`.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use tetmesh::pipeline::PlanePolicy;
use tetmesh::types::Axis;
use tracing_subscriber::EnvFilter;

/// Mirror-and-merge toolkit for tetrahedral meshes
#[derive(Parser)]
#[command(name = "tetmesh")]
#[command(about = "Mirror, merge and repair tetrahedral meshes", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Input and output paths shared by the transforming commands.
#[derive(Args)]
struct InOut {
    /// Input mesh (.mesh or .vtk)
    input: PathBuf,

    /// Output mesh (.mesh or .vtk)
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Print mesh statistics
    Info {
        /// Mesh file
        input: PathBuf,
    },

    /// Run validity diagnostics
    Check {
        /// Mesh file
        input: PathBuf,

        /// Signed-volume threshold for inverted and degenerate elements
        #[arg(long, default_value_t = 1e-12)]
        volume_tolerance: f64,

        /// Distance for the duplicate-point scan
        #[arg(long, default_value_t = 1e-9)]
        duplicate_tolerance: f64,

        /// Skip the duplicate-point scan
        #[arg(long)]
        no_duplicates: bool,

        /// Exit with an error if the mesh is not valid
        #[arg(long)]
        strict: bool,
    },

    /// Remove inverted, degenerate and unreferenced entities
    Repair {
        #[command(flatten)]
        io: InOut,

        /// Signed-volume threshold for inverted and degenerate elements
        #[arg(long, default_value_t = 1e-12)]
        volume_tolerance: f64,

        /// Keep vertices no element references
        #[arg(long)]
        keep_unreferenced: bool,
    },

    /// Reflect a mesh and merge it with its mirror image
    Mirror {
        #[command(flatten)]
        io: InOut,

        #[command(flatten)]
        weld: WeldArgs,

        /// Plane position: min, max or a coordinate
        #[arg(long, default_value = "min")]
        plane: PlanePolicy,
    },

    /// Merge a second mesh into the first across a plane
    Merge {
        /// Mesh kept whole
        first: PathBuf,

        /// Mesh welded onto the first
        second: PathBuf,

        /// Output mesh
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        weld: WeldArgs,

        /// Plane coordinate along the axis
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        plane: f64,
    },

    /// Scale uniformly about the origin
    Scale {
        #[command(flatten)]
        io: InOut,

        /// Scale factor
        #[arg(long, allow_negative_numbers = true)]
        factor: f64,
    },

    /// Translate by an offset, or to the origin
    Translate {
        #[command(flatten)]
        io: InOut,

        /// Offset as x,y,z
        #[arg(long, value_parser = parse_vector, allow_negative_numbers = true)]
        #[arg(conflicts_with = "origin", required_unless_present = "origin")]
        offset: Option<[f64; 3]>,

        /// Move the bounding-box minimum to the origin
        #[arg(long)]
        origin: bool,
    },

    /// Snap near-boundary coordinates onto a box
    Snap {
        #[command(flatten)]
        io: InOut,

        /// Box minimum as x,y,z (default: mesh bounds)
        #[arg(long, value_parser = parse_vector, allow_negative_numbers = true)]
        min: Option<[f64; 3]>,

        /// Box maximum as x,y,z (default: mesh bounds)
        #[arg(long, value_parser = parse_vector, allow_negative_numbers = true)]
        max: Option<[f64; 3]>,

        /// Snap distance
        #[arg(long)]
        tolerance: f64,
    },

    /// Run a pipeline described in a TOML file
    Run {
        /// Pipeline configuration
        config: PathBuf,

        #[command(flatten)]
        io: InOut,

        /// Directory for checkpoint meshes
        #[arg(long)]
        checkpoint_dir: Option<PathBuf>,
    },

    /// Build coarse, medium and fine mirrored meshes
    Multiscale {
        /// Input mesh
        input: PathBuf,

        /// Output directory
        #[arg(long)]
        out_dir: PathBuf,

        /// Weld tolerance (default: derived from --element-size)
        #[arg(long, conflicts_with = "element_size")]
        tolerance: Option<f64>,

        /// Maximum element size of the input mesh
        #[arg(long)]
        element_size: Option<f64>,

        /// Output extension
        #[arg(long, default_value = "vtk")]
        format: String,
    },
}

/// Weld settings shared by `mirror` and `merge`.
#[derive(Args)]
struct WeldArgs {
    /// Axis normal to the mirror plane
    #[arg(long)]
    axis: Axis,

    /// Weld distance
    #[arg(long, default_value_t = 1e-6)]
    tolerance: f64,

    /// Fail if the weld count differs from the on-plane vertex count
    #[arg(long)]
    strict: bool,
}

/// Parse `x,y,z` into three numbers.
fn parse_vector(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid vector '{s}': {e}"))?;
    <[f64; 3]>::try_from(parts)
        .map_err(|p| format!("invalid vector '{s}': expected 3 components, got {}", p.len()))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => commands::info(&input),
        Commands::Check {
            input,
            volume_tolerance,
            duplicate_tolerance,
            no_duplicates,
            strict,
        } => commands::check(
            &input,
            volume_tolerance,
            (!no_duplicates).then_some(duplicate_tolerance),
            strict,
        ),
        Commands::Repair {
            io,
            volume_tolerance,
            keep_unreferenced,
        } => commands::repair(&io.input, &io.output, volume_tolerance, !keep_unreferenced),
        Commands::Mirror { io, weld, plane } => {
            commands::mirror(&io.input, &io.output, &weld.params(), plane)
        }
        Commands::Merge {
            first,
            second,
            output,
            weld,
            plane,
        } => commands::merge(&first, &second, &output, &weld.params().with_plane_offset(plane)),
        Commands::Scale { io, factor } => commands::scale(&io.input, &io.output, factor),
        Commands::Translate { io, offset, origin } => {
            commands::translate(&io.input, &io.output, offset.filter(|_| !origin))
        }
        Commands::Snap {
            io,
            min,
            max,
            tolerance,
        } => commands::snap(&io.input, &io.output, min, max, tolerance),
        Commands::Run {
            config,
            io,
            checkpoint_dir,
        } => commands::run(&config, &io.input, &io.output, checkpoint_dir.as_deref()),
        Commands::Multiscale {
            input,
            out_dir,
            tolerance,
            element_size,
            format,
        } => commands::multiscale(&input, &out_dir, tolerance, element_size, &format),
    }
}

impl WeldArgs {
    fn params(&self) -> tetmesh::weld::MergeParams {
        use tetmesh::weld::{MergeParams, WeldCheck};

        MergeParams::new()
            .with_axis(self.axis)
            .with_tolerance(self.tolerance)
            .with_weld_check(if self.strict {
                WeldCheck::Strict
            } else {
                WeldCheck::Warn
            })
    }
}
