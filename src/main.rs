use fodosim::{Axis, Model, NVec3, Particle, Scenario, ScenarioConfig};
use fodosim::{bench_propagate, bench_run_curve};

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Track a single particle through a FODO lattice")]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, long, default_value = "fodo_default.yaml")]
    file_name: String,

    /// Replace the configured particle with a random one
    #[arg(long)]
    random: bool,

    /// Seed for `--random`
    #[arg(long)]
    seed: Option<u64>,

    /// Position within the cell to sample markers at
    #[arg(long, default_value_t = 0)]
    marker: usize,

    /// Time propagation instead of running a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("failed to open scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn print_extents(model: &Model) -> Result<()> {
    let min = model.min_extent()?;
    let max = model.max_extent()?;
    for axis in Axis::ALL {
        let i = axis.index();
        println!("{:>3}: [{:>12.6}, {:>12.6}]", axis.name(), min[i], max[i]);
    }
    Ok(())
}

fn print_markers(markers: &[NVec3]) {
    println!("{:>5} {:>12} {:>12} {:>12}", "cell", "x", "xp", "s");
    for (cell, v) in markers.iter().enumerate() {
        println!("{:>5} {:>12.6} {:>12.6} {:>12.3}", cell, v[0], v[1], v[2]);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = Args::parse();

    if args.bench {
        bench_propagate()?;
        bench_run_curve()?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg).context("invalid scenario")?;

    if args.random {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        scenario.particle = Particle::random(&mut rng);
    }

    let start = scenario.particle.last();
    info!(
        x = start[0],
        xp = start[1],
        cells = scenario.total_cells(),
        per_cell = scenario.lattice.num_cell_elements(),
        "running scenario"
    );

    let model = scenario.run(|run, staged| {
        info!(run, samples = staged.len() - 1, "run staged");
    })?;

    print_extents(&model)?;
    print_markers(&model.active_markers(args.marker)?);

    Ok(())
}
