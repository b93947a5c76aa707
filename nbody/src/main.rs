use nbody::{bench_chunk_sizes, energy, logging, total_momentum, Scenario, ScenarioConfig, StepSnapshot};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Chunked direct-summation N-body simulation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Integrate a scenario and optionally write its trajectory
    Run(RunArgs),
    /// Time the force evaluators across particle counts and chunk sizes
    Bench(BenchArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Scenario YAML, looked up in `scenarios/` when not found as given
    #[arg(short, long = "file", default_value = "random_cluster.yaml")]
    file_name: String,

    /// Write one JSON snapshot per line to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log diagnostics every K steps (0 disables)
    #[arg(long, default_value_t = 100)]
    log_every: usize,

    /// Stop at the first snapshot holding NaN or Inf
    #[arg(long)]
    halt_on_anomaly: bool,
}

#[derive(Args, Debug)]
struct BenchArgs {
    #[arg(long, value_delimiter = ',', default_values_t = [200, 800, 3200])]
    sizes: Vec<usize>,

    #[arg(long, value_delimiter = ',', default_values_t = [1, 32, 128, 1024])]
    chunk_sizes: Vec<usize>,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let given = PathBuf::from(file_name);
    let config_path = if given.exists() {
        given
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };

    let file = File::open(&config_path)
        .with_context(|| format!("failed to open scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn run(args: RunArgs) -> Result<()> {
    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let scenario = Scenario::from_config(&scenario_cfg)?;
    let constants = scenario.constants;

    let mut integrator = scenario.into_integrator()?;
    let masses = integrator.system().masses().to_vec();

    let mut writer = match &args.output {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => None,
    };

    let mut initial_energy = None;
    let mut last: Option<StepSnapshot> = None;

    for snap in integrator.run()? {
        if let Some(w) = writer.as_mut() {
            serde_json::to_writer(&mut *w, &snap)?;
            writeln!(w)?;
        }

        if snap.step == 0 {
            initial_energy = Some(energy(&snap.positions, &snap.velocities, &constants));
        }

        if args.log_every > 0 && snap.step % args.log_every == 0 {
            let e = energy(&snap.positions, &snap.velocities, &constants);
            let drift = initial_energy.map_or(0.0, |e0| e.relative_drift(&e0));
            let p = total_momentum(&masses, &snap.velocities);
            info!(
                "step {:6}  t = {:10.4}  E = {:+.6e}  dE/E0 = {:.3e}  |P| = {:.3e}",
                snap.step,
                snap.t,
                e.total(),
                drift,
                p.norm()
            );
        }

        let halt = args.halt_on_anomaly && snap.has_numeric_anomaly();
        if halt {
            warn!("halting at step {} (t = {}): non-finite state", snap.step, snap.t);
        }
        last = Some(snap);
        if halt {
            break;
        }
    }

    if let Some(w) = writer.as_mut() {
        w.flush()?;
    }

    if let (Some(snap), Some(e0)) = (last, initial_energy) {
        let e = energy(&snap.positions, &snap.velocities, &constants);
        info!(
            "final: step {} t = {:.4}, energy drift {:.3e}",
            snap.step,
            snap.t,
            e.relative_drift(&e0)
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let _logger = logging::setup()?;

    match Cli::parse().command {
        Command::Run(args) => run(args)?,
        Command::Bench(args) => bench_chunk_sizes(&args.sizes, &args.chunk_sizes)?,
    }

    Ok(())
}
