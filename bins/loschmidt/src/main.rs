use anyhow::{Context, Result};
use clap::Parser;
use quantum::Backend;
use simulator::output::{write_echo_csv, write_trace_csv};
use simulator::{echo_series, loschmidt_evolve, QuenchConfig, RecordSchedule};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Ground state, quench, and Loschmidt echo of the transverse-field Ising chain
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with a quench configuration; flags below override it
    #[arg(long)]
    config: Option<String>,

    /// Transverse field before the quench
    #[arg(long)]
    g0: Option<f64>,

    /// Transverse field after the quench
    #[arg(long)]
    g1: Option<f64>,

    /// Time step
    #[arg(long)]
    dt: Option<f64>,

    /// Number of quench steps
    #[arg(long)]
    steps: Option<usize>,

    /// Bond dimension (power of two)
    #[arg(long)]
    bond_dim: Option<usize>,

    /// Ansatz layers
    #[arg(long)]
    layers: Option<usize>,

    /// Repetitions per circuit (0 = exact simulation)
    #[arg(long)]
    reps: Option<usize>,

    /// Probability of keeping the convergence trace of a step
    #[arg(long)]
    record_prob: Option<f64>,

    /// RNG seed (full reproducibility)
    #[arg(long)]
    seed: Option<String>,

    /// Number of Rayon worker threads (0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Trajectory output path
    #[arg(long, default_value = "trajectory.json")]
    out: String,

    /// Echo CSV output path
    #[arg(long, default_value = "loschmidt.csv")]
    echo_out: String,

    /// Directory for convergence traces of recorded steps (skipped if unset)
    #[arg(long)]
    trace_dir: Option<String>,
}

fn build_config(args: &Args) -> Result<QuenchConfig> {
    let mut config = match &args.config {
        Some(path) => QuenchConfig::load(path)
            .with_context(|| format!("reading quench config {}", path))?,
        None => QuenchConfig::default(),
    };
    if let Some(g0) = args.g0 {
        config.g0 = g0;
    }
    if let Some(g1) = args.g1 {
        config.g1 = g1;
    }
    if let Some(dt) = args.dt {
        config.dt = dt;
    }
    if let Some(steps) = args.steps {
        config.steps = steps;
    }
    if let Some(bond_dim) = args.bond_dim {
        config.bond_dim = bond_dim;
    }
    if let Some(layers) = args.layers {
        config.layers = layers;
        if config.initial_params.as_ref().map_or(false, |p| p.len() != 2 * layers) {
            config.initial_params = None;
        }
    }
    match args.reps {
        Some(0) => config.backend = Backend::Exact,
        Some(reps) => config.backend = Backend::Sampled { reps },
        None => {}
    }
    if let Some(p) = args.record_prob {
        config.record = RecordSchedule::Probability { p };
    }
    if let Some(seed) = &args.seed {
        config.seed = seed.clone();
    }
    config.validate().context("invalid quench configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("building Rayon thread pool")?;
    }

    let config = build_config(&args)?;
    info!(
        g0 = config.g0,
        g1 = config.g1,
        dt = config.dt,
        steps = config.steps,
        backend = ?config.backend,
        "starting quench"
    );

    let trajectory = loschmidt_evolve(&config).context("quench evolution failed")?;
    trajectory
        .save(&args.out)
        .with_context(|| format!("writing trajectory to {}", args.out))?;

    if let Some(dir) = &args.trace_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir))?;
        for (step, rec) in trajectory.records.iter().enumerate() {
            if let Some(trace) = &rec.trace {
                let path = format!("{}/trace_{:04}.csv", dir, step);
                write_trace_csv(&path, trace).with_context(|| format!("writing {}", path))?;
            }
        }
    }

    let echo = echo_series(&trajectory, &trajectory.ansatz).context("echo post-processing")?;
    write_echo_csv(&args.echo_out, &echo)
        .with_context(|| format!("writing echo to {}", args.echo_out))?;

    for p in &echo {
        println!(
            "t = {:>6.3}  |amp| = {:.8}  rate = {:.6e}",
            p.time, p.amplitude, p.return_rate
        );
    }
    println!("Trajectory saved to {}, echo to {}", args.out, args.echo_out);
    Ok(())
}
