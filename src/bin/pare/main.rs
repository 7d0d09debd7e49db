//! Pare CLI - carve vertices out of a mesh and list the holes they leave.
//!
//! Usage: pare <COMMAND> [OPTIONS] <INPUT> ...
//!
//! Run `pare --help` for available commands. Set `RUST_LOG=debug` for
//! per-stage diagnostics.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use pare::algo::boundary::{extract_boundary_cycles, BoundaryCycle, HoleFilter};
use pare::algo::pipeline::{carve, CarveOptions};
use pare::algo::TimingHook;
use pare::io::{self, IndexParsing, PointListingOptions};
use pare::mesh::{HalfEdgeMesh, MeshStats};

#[derive(Parser)]
#[command(name = "pare")]
#[command(author, version, about = "Vertex-driven mesh carving and hole extraction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Delete vertices and their faces, rebuild, and extract the holes
    Carve {
        /// Input mesh file
        input: PathBuf,

        /// File with one vertex index per line
        indices: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Reject index lines that are not plain non-negative integers
        #[arg(long)]
        strict: bool,

        /// Print the duration of each stage
        #[arg(long)]
        timings: bool,

        #[command(flatten)]
        holes: HoleArgs,
    },

    /// Extract the boundary cycles of a mesh
    Holes {
        /// Input mesh file
        input: PathBuf,

        #[command(flatten)]
        holes: HoleArgs,
    },
}

#[derive(Args)]
struct HoleArgs {
    /// Write the points of each hole to this file
    #[arg(short, long)]
    points: Option<PathBuf>,

    /// Put an empty line between cycles in the points file
    #[arg(long)]
    separate_cycles: bool,

    /// Largest bounding-box extent of a hole along any axis
    #[arg(long)]
    max_hole_diameter: Option<f64>,

    /// Smallest number of edges of a hole
    #[arg(long)]
    min_hole_edges: Option<usize>,
}

impl HoleArgs {
    fn filter(&self) -> pare::Result<Option<HoleFilter>> {
        if self.max_hole_diameter.is_none() && self.min_hole_edges.is_none() {
            return Ok(None);
        }
        HoleFilter::new(
            self.max_hole_diameter.unwrap_or(f64::INFINITY),
            self.min_hole_edges.unwrap_or(0),
        )
        .map(Some)
    }

    fn listing(&self) -> PointListingOptions {
        let options = PointListingOptions::default();
        if self.separate_cycles {
            options.separate_cycles()
        } else {
            options
        }
    }

    fn write_points(&self, cycles: &[BoundaryCycle]) -> pare::Result<()> {
        if let Some(path) = &self.points {
            io::save_points(path, cycles, &self.listing())?;
            println!("Points: {}", path.display());
        }
        Ok(())
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => cmd_info(&input)?,

        Commands::Carve {
            input,
            indices,
            output,
            strict,
            timings,
            holes,
        } => cmd_carve(&input, &indices, &output, strict, timings, &holes)?,

        Commands::Holes { input, holes } => cmd_holes(&input, &holes)?,
    }

    Ok(())
}

fn print_cycles(cycles: &[BoundaryCycle], label: &str) {
    for (i, cycle) in cycles.iter().enumerate() {
        let extent = cycle
            .bounding_box()
            .map(|(min, max)| (max - min).max())
            .unwrap_or(0.0);
        println!(
            "  {} {}: {} edges, perimeter {:.6}, extent {:.6}",
            label,
            i,
            cycle.len(),
            cycle.perimeter(),
            extent
        );
    }
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: HalfEdgeMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("{}", MeshStats::of(&mesh));
    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    if mesh.is_triangle_mesh() {
        println!("Mesh type: Triangle mesh");
    } else {
        println!("Mesh type: Polygon mesh (rebuild requires triangles)");
    }

    let cycles = extract_boundary_cycles(&mut mesh);
    if cycles.is_empty() {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary cycles)", cycles.len());
        print_cycles(&cycles, "cycle");
    }

    Ok(())
}

fn cmd_carve(
    input: &Path,
    indices: &Path,
    output: &Path,
    strict: bool,
    timings: bool,
    holes: &HoleArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: HalfEdgeMesh = io::load(input)?;
    let parsing = if strict {
        IndexParsing::Strict
    } else {
        IndexParsing::Lenient
    };
    let targets = io::read_indices(indices, parsing)?;
    println!("Indices: {} from {}", targets.len(), indices.display());

    let stages: Arc<Mutex<Vec<(String, Duration)>>> = Arc::new(Mutex::new(Vec::new()));
    let mut options = CarveOptions::default();
    if let Some(filter) = holes.filter()? {
        options = options.with_hole_filter(filter);
    }
    if timings {
        let sink = Arc::clone(&stages);
        options = options.with_timing(TimingHook::new(move |stage, elapsed| {
            if let Ok(mut stages) = sink.lock() {
                stages.push((stage.to_string(), elapsed));
            }
        }));
    }

    let result = carve(&mut mesh, &targets, &options)?;

    let stats = &result.stats;
    println!("{}\n", stats.input.labeled("before remove face"));
    println!("{}\n", stats.after_deletion.labeled("after remove face"));
    println!("{}\n", stats.after_rebuild.labeled("after rebuild"));

    println!("Holes: {}", result.holes.len());
    print_cycles(&result.holes, "hole");
    if !result.rejected.is_empty() {
        println!("Rejected cycles: {}", result.rejected.len());
        print_cycles(&result.rejected, "cycle");
    }
    holes.write_points(&result.holes)?;

    io::save(&result.mesh, output)?;
    println!("Saved: {}", output.display());

    if timings {
        let stages = stages.lock().map_err(|_| "timing data is unavailable")?;
        let mut total = Duration::ZERO;
        for (stage, elapsed) in stages.iter() {
            println!("  {:>8}: {:.3} ms", stage, elapsed.as_secs_f64() * 1000.0);
            total += *elapsed;
        }
        println!("Total time: {:.3} ms", total.as_secs_f64() * 1000.0);
    }

    Ok(())
}

fn cmd_holes(input: &Path, holes: &HoleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: HalfEdgeMesh = io::load(input)?;

    let cycles = extract_boundary_cycles(&mut mesh);
    let (accepted, rejected) = match holes.filter()? {
        Some(filter) => filter.partition(cycles),
        None => (cycles, Vec::new()),
    };

    println!("Holes: {}", accepted.len());
    print_cycles(&accepted, "hole");
    if !rejected.is_empty() {
        println!("Rejected cycles: {}", rejected.len());
        print_cycles(&rejected, "cycle");
    }
    holes.write_points(&accepted)?;

    Ok(())
}
