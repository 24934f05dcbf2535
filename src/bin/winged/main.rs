//! Winged CLI - subdivide and decimate closed triangle meshes.
//!
//! Usage: winged <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `winged --help` for available commands. Set `RUST_LOG=debug` to see
//! every collapse.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use winged::algo::decimate::DecimateOptions;
use winged::algo::subdivide::{Scheme, SubdivideOptions};
use winged::algo::Progress;
use winged::error::MeshError;
use winged::io;
use winged::mesh::{BuildReport, TopologyTable};
use winged::session::MeshSession;

#[derive(Parser)]
#[command(name = "winged")]
#[command(author, version, about = "Closed triangle mesh subdivision and decimation", long_about = None)]
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

        /// Subdivision scheme
        #[arg(short, long, value_enum, default_value = "loop")]
        scheme: SchemeArg,

        /// Number of subdivision levels
        #[arg(short, long, default_value = "1")]
        levels: usize,
    },

    /// Decimate (simplify) a mesh
    Decimate {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Number of collapse iterations
        #[arg(short, long)]
        edges: usize,

        /// Candidates sampled per iteration
        #[arg(short, long, default_value = "8")]
        candidates: usize,

        /// Seed for candidate sampling
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SchemeArg {
    /// Approximating Loop subdivision
    Loop,
    /// Interpolating modified Butterfly subdivision
    Butterfly,
}

impl From<SchemeArg> for Scheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Loop => Scheme::Loop,
            SchemeArg::Butterfly => Scheme::Butterfly,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => cmd_info(&input)?,

        Commands::Subdivide {
            input,
            output,
            scheme,
            levels,
        } => cmd_subdivide(&input, &output, scheme.into(), levels)?,

        Commands::Decimate {
            input,
            output,
            edges,
            candidates,
            seed,
        } => cmd_decimate(&input, &output, edges, candidates, seed)?,
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // highest percent shown so far

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Monotonic: never redraw a lower percentage
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (raw_percent * bar_width) / 100;
        eprint!(
            "\r[{}{}] {:3}% {}",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            raw_percent,
            message
        );
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn print_warnings(report: &BuildReport) {
    if report.warnings.is_empty() {
        return;
    }
    println!("Warnings: {}", report.warnings.len());
    for warning in report.warnings.iter().take(10) {
        println!("  {}", warning);
    }
    if report.warnings.len() > 10 {
        println!("  ... and {} more", report.warnings.len() - 10);
    }
}

fn load_session(input: &Path) -> Result<MeshSession, Box<dyn std::error::Error>> {
    let source = io::load_source(input)?;
    let mut session = MeshSession::new();
    let report = session.load_mesh(&source)?;
    print_warnings(&report);

    let table = session.table().ok_or(MeshError::NotLoaded)?;
    println!(
        "Loaded: {} vertices, {} edges, {} faces",
        table.num_vertices(),
        table.edge_count(),
        table.num_faces()
    );
    Ok(session)
}

fn save_session<'a>(session: &'a MeshSession, output: &Path) -> Result<&'a TopologyTable, MeshError> {
    let table = session.table().ok_or(MeshError::NotLoaded)?;
    io::save(table, output)?;
    Ok(table)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (table, report) = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", table.num_vertices());
    println!("Edges: {}", table.edge_count());
    println!("Faces: {}", table.num_faces());
    println!("Euler characteristic: {}", table.euler_characteristic());
    println!("Surface area: {:.6}", table.surface_area());

    if let Some((min, max)) = table.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    let degrees: Vec<usize> = table.vertex_ids().map(|v| table.degree(v)).collect();
    if let (Some(min), Some(max)) = (degrees.iter().min(), degrees.iter().max()) {
        println!("Degree range: [{}, {}]", min, max);
    }

    if table.is_closed() {
        println!("Topology: Closed");
    } else {
        println!("Topology: Open ({} unmatched half-edges)", table.unmatched_halfedges());
    }

    let violations = table.validate();
    if violations.is_empty() {
        println!("Invariants: OK");
    } else {
        println!("Invariants: {} violations", violations.len());
    }

    print_warnings(&report);
    Ok(())
}

fn cmd_subdivide(
    input: &Path,
    output: &Path,
    scheme: Scheme,
    levels: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = load_session(input)?;

    println!("Applying {} subdivision ({} levels)...", scheme, levels);
    let progress = create_progress();
    let start = Instant::now();
    session.subdivide_with(&SubdivideOptions::new(scheme, levels), &progress)?;
    let elapsed = start.elapsed();

    let table = save_session(&session, output)?;
    println!("Result: {} vertices, {} faces", table.num_vertices(), table.num_faces());
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_decimate(
    input: &Path,
    output: &Path,
    edges: usize,
    candidates: usize,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = load_session(input)?;

    let mut options = DecimateOptions::new(edges, candidates);
    if let Some(seed) = seed {
        options = options.with_seed(seed);
    }

    println!("Decimating ({} iterations, {} candidates each)...", edges, candidates);
    let progress = create_progress();
    let start = Instant::now();
    let report = session.decimate_with(&options, &progress)?;
    let elapsed = start.elapsed();

    if let Some(reason) = report.aborted {
        println!("Stopped early after {} collapses: {}", report.collapses, reason);
    }
    println!(
        "Removed: {} vertices, {} edges, {} faces ({} pre-collapses)",
        report.vertices_removed, report.edges_removed, report.faces_removed, report.pre_collapses
    );

    let table = save_session(&session, output)?;
    println!("Result: {} vertices, {} faces", table.num_vertices(), table.num_faces());
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
