//! Hydrology CLI - drainage and erosion over a synthetic terrain mesh.
//!
//! Builds a jittered grid mesh with random hills and pits, runs the drainage
//! and water-flow passes (optionally several erode-and-recompute rounds) and
//! prints the summaries.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use hydrology::{
    generate_heights, FlowClass, HeightmapConfig, HydrologyConfig, LogObserver, Mesh,
    NullObserver, Sink, TerrainState,
};

/// Drainage and erosion over irregular terrain meshes.
#[derive(Parser)]
#[command(name = "hydrology")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate drainage and erosion on a synthetic terrain.
    Simulate {
        /// Mesh columns.
        #[arg(long, default_value = "64")]
        cols: usize,

        /// Mesh rows.
        #[arg(long, default_value = "64")]
        rows: usize,

        /// Random seed for the mesh and the terrain.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Displacement of interior points, in grid spacings (0-0.9).
        #[arg(long, default_value = "0.6")]
        jitter: f64,

        /// Sea level (map units); overrides the config file.
        #[arg(long)]
        sea_level: Option<f64>,

        /// Uniform rainfall (cm/yr).
        #[arg(short, long, default_value = "120.0")]
        rain: f64,

        /// Erode-and-recompute rounds after the first pass.
        #[arg(short, long, default_value = "0")]
        passes: u32,

        /// Hydrology configuration file (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report every escape, transport and flood at trace level.
        #[arg(long)]
        trace: bool,
    },

    /// Print the default configuration as TOML.
    Config,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { cols, rows, seed, jitter, sea_level, rain, passes, config, trace } => {
            run_simulate(cols, rows, seed, jitter, sea_level, rain, passes, config, trace);
        }
        Commands::Config => match HydrologyConfig::default().to_toml_string() {
            Ok(text) => print!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn run_simulate(
    cols: usize,
    rows: usize,
    seed: Option<u64>,
    jitter: f64,
    sea_level: Option<f64>,
    rain: f64,
    passes: u32,
    config_path: Option<PathBuf>,
    trace: bool,
) {
    // Validate parameters
    if cols < 3 || rows < 3 || cols * rows > 4_000_000 {
        eprintln!("Error: Mesh must be at least 3x3 and at most 4M points");
        std::process::exit(1);
    }

    if !(0.0..1.0).contains(&jitter) {
        eprintln!("Error: Jitter must be between 0.0 and 1.0");
        std::process::exit(1);
    }

    let mut config = match config_path {
        Some(path) => HydrologyConfig::load(&path).unwrap_or_else(|e| {
            eprintln!("Error loading {}: {}", path.display(), e);
            std::process::exit(1);
        }),
        None => HydrologyConfig::default(),
    };
    if let Some(level) = sea_level {
        config.sea_level = level;
    }

    // Generate seed if not provided
    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    println!("Hydrology - Drainage and Erosion Simulator");
    println!("==========================================");
    println!("Mesh: {}x{} (jitter {:.2})", cols, rows, jitter);
    println!("Seed: {}", seed);
    println!("Rain: {:.1} cm/yr, sea level {:.3}", rain, config.sea_level);

    let start = Instant::now();

    let mesh = Mesh::jittered_grid(cols, rows, config.scale.xy_extent, jitter, seed);
    let heights = generate_heights(&mesh, &HeightmapConfig { seed, ..Default::default() });
    let n = mesh.len();

    let mut state = TerrainState::new(mesh, config);
    state.set_heights(heights);
    state.set_rainfall(vec![rain; n]);

    for pass in 0..=passes {
        if pass > 0 {
            state.apply_erosion();
        }

        let result = if trace {
            state.recompute_with(&mut LogObserver)
        } else {
            state.recompute_with(&mut NullObserver)
        };
        if let Err(e) = result {
            eprintln!("Error during recompute: {}", e);
            std::process::exit(1);
        }

        if passes > 0 {
            println!("  [{}/{}] recompute done", pass + 1, passes + 1);
        }
    }

    println!("Simulation completed in {:.2?}", start.elapsed());

    if let Some(drainage) = state.drainage() {
        println!("\nDrainage");
        println!("{}", drainage.stats());

        let lakes = drainage.outlets().iter().filter(|o| o.is_some()).count();
        let to_ocean = drainage.sinks().iter().filter(|&&s| s == Sink::Ocean).count();
        println!("lake points: {}, draining to ocean: {}", lakes, to_ocean);
    }

    if let Some(flow) = state.flow() {
        println!("\nWater flow");
        println!("{}", flow.stats());

        let mut counts = [0usize; 4];
        for p in 0..flow.len() {
            counts[flow.class(p, state.config()) as usize] += 1;
        }
        println!(
            "streams: {}, rivers: {}, arteries: {}",
            counts[FlowClass::Stream as usize],
            counts[FlowClass::River as usize],
            counts[FlowClass::Artery as usize]
        );
    }
}
