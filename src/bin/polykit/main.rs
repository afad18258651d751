//! Polykit CLI - polygon mesh editing command-line tool.
//!
//! Usage: polykit <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `polykit --help` for available commands. Set `RUST_LOG=debug` for
//! per-pass details.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use polykit::algo::transform::{extrude_all, map_faces, offset_mesh, split_grid};
use polykit::algo::{colorize, subdivide, Progress};
use polykit::io;
use polykit::mesh::Mesh;

#[derive(Parser)]
#[command(name = "polykit")]
#[command(author, version, about = "Polygon mesh editing CLI", long_about = None)]
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

    /// Subdivide a mesh
    Subdivide {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Subdivision method
        #[arg(short, long, value_enum, default_value = "catmull-clark")]
        method: SubdivideMethod,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Extrude every face along its normal
    Extrude {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Extrusion height
        #[arg(short = 'H', long, default_value = "1.0")]
        height: f64,

        /// Keep the original faces as bottom caps
        #[arg(long)]
        cap_bottom: bool,

        /// Leave the extruded faces open at the top
        #[arg(long)]
        no_top: bool,
    },

    /// Offset a mesh along its vertex normals
    Offset {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Offset distance
        #[arg(short, long, default_value = "0.1")]
        distance: f64,

        /// Close open borders with side faces
        #[arg(long)]
        close: bool,
    },

    /// Split every triangle and quad into a grid
    SplitGrid {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Divisions along the first edge
        #[arg(short = 'u', long, default_value = "2")]
        nu: usize,

        /// Divisions along the second edge
        #[arg(short = 'v', long, default_value = "2")]
        nv: usize,
    },

    /// Colour faces by a measure (saved colours need PLY output)
    Colorize {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Face measure mapped to hue
        #[arg(short, long, value_enum, default_value = "area")]
        by: ColorMeasure,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SubdivideMethod {
    /// Linear subdivision (face centroids and edge midpoints)
    Linear,
    /// Catmull-Clark subdivision (smoothing)
    CatmullClark,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ColorMeasure {
    /// Face area
    Area,
    /// Face perimeter
    Perimeter,
    /// Z component of the face normal
    Verticality,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Subdivide {
            input,
            output,
            method,
            iterations,
            sequential,
        } => {
            cmd_subdivide(&input, &output, method, iterations, sequential)?;
        }

        Commands::Extrude {
            input,
            output,
            height,
            cap_bottom,
            no_top,
        } => {
            let mesh = load(&input)?;
            println!("Extruding {} faces by {}...", mesh.num_faces(), height);
            let result = extrude_all(&mesh, height, cap_bottom, !no_top)?;
            save(&result, &output)?;
        }

        Commands::Offset {
            input,
            output,
            distance,
            close,
        } => {
            let mesh = load(&input)?;
            println!("Offsetting by {}{}...", distance, if close { " (closed)" } else { "" });
            let result = offset_mesh(&mesh, distance, close)?;
            save(&result, &output)?;
        }

        Commands::SplitGrid { input, output, nu, nv } => {
            let mesh = load(&input)?;
            println!("Splitting faces into {} x {} grids...", nu, nv);
            let result = map_faces(&mesh, |pool, _, face| Ok(split_grid(pool, face, nu, nv)?.into_faces()))?;
            save(&result, &output)?;
        }

        Commands::Colorize { input, output, by } => {
            let mut mesh = load(&input)?;
            match by {
                ColorMeasure::Area => colorize::color_faces_by_area(&mut mesh),
                ColorMeasure::Perimeter => colorize::color_faces_by_perimeter(&mut mesh),
                ColorMeasure::Verticality => colorize::color_faces_by_verticality(&mut mesh),
            }
            save(&mesh, &output)?;
        }
    }

    Ok(())
}

fn load(input: &PathBuf) -> Result<Mesh, Box<dyn std::error::Error>> {
    let mesh: Mesh = io::load(input)?;
    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());
    Ok(mesh)
}

fn save(mesh: &Mesh, output: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    io::save(mesh, output)?;
    println!(
        "Saved: {} ({} vertices, {} faces)",
        output.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let percent = if current >= total {
            100
        } else {
            (current * 100 + total / 2) / total
        };

        // Only redraw when the bar moves forward
        let previous = max_percent.fetch_max(percent, Ordering::Relaxed);
        if percent <= previous && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: Mesh = io::load(input)?;
    let adjacency = mesh.adjacency()?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Edges: {}", adjacency.num_edges());

    let mut min_area = f64::MAX;
    let mut max_area = 0.0_f64;
    for fid in mesh.face_ids() {
        let area = mesh.face_area(fid);
        min_area = min_area.min(area);
        max_area = max_area.max(area);
    }
    println!("Surface area: {:.6}", mesh.surface_area());
    println!("Face area range: [{:.6}, {:.6}]", min_area, max_area);

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
    } else if mesh.is_quad_mesh() {
        println!("Mesh type: Quad mesh");
    } else {
        println!("Mesh type: Mixed polygon mesh");
    }

    let boundary_edges = adjacency.boundary_edges().count();
    if boundary_edges == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary edges)", boundary_edges);
    }
    println!("Euler characteristic: {}", mesh.euler_characteristic()?);

    Ok(())
}

fn cmd_subdivide(
    input: &PathBuf,
    output: &PathBuf,
    method: SubdivideMethod,
    iterations: usize,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = load(input)?;

    let options = subdivide::SubdivideOptions::new(iterations).with_parallel(!sequential);
    let mode = if sequential { "sequential" } else { "parallel" };
    let progress = create_progress();

    let start = Instant::now();
    let result = match method {
        SubdivideMethod::Linear => {
            println!("Applying linear subdivision ({} iterations, {})...", iterations, mode);
            subdivide::linear_subdivide_with_progress(&mesh, &options, &progress)?
        }
        SubdivideMethod::CatmullClark => {
            println!("Applying Catmull-Clark subdivision ({} iterations, {})...", iterations, mode);
            subdivide::catmull_clark_subdivide_with_progress(&mesh, &options, &progress)?
        }
    };
    let elapsed = start.elapsed();

    save(&result, output)?;
    println!("Done in {:.2?}", elapsed);

    Ok(())
}
