use anyhow::{Context, Result};
use clap::Parser;
use simulator::output::write_echo_csv;
use simulator::{echo_series, Trajectory};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Recompute the Loschmidt echo of a saved trajectory
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trajectory written by `loschmidt`
    #[arg(long, default_value = "trajectory.json")]
    trajectory: String,

    /// Number of Rayon worker threads (0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Output CSV path
    #[arg(long, default_value = "echo.csv")]
    out: String,
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

    let trajectory = Trajectory::load(&args.trajectory)
        .with_context(|| format!("loading trajectory {}", args.trajectory))?;
    info!(records = trajectory.len(), dt = trajectory.dt, "loaded trajectory");

    let echo = echo_series(&trajectory, &trajectory.ansatz)?;
    write_echo_csv(&args.out, &echo).with_context(|| format!("writing {}", args.out))?;

    let worst = echo
        .iter()
        .map(|p| p.return_rate)
        .fold(0.0_f64, f64::max);
    println!(
        "{} echo points written to {} (max return rate {:.6e})",
        echo.len(),
        args.out,
        worst
    );
    Ok(())
}
