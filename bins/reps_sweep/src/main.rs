use anyhow::{bail, Context, Result};
use clap::Parser;
use quantum::environment::exact_environment;
use quantum::ShallowAnsatz;
use rayon::prelude::*;
use rng::ONDRng;
use simulator::objective::Objective;
use simulator::output::write_csv;
use simulator::{EnvironmentObjective, EnvironmentOptimizer};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Sampled vs exact tomography cost as a function of repetitions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Comma-separated list of repetition counts
    #[arg(long, default_value = "100,1000,10000,100000")]
    reps: String,

    /// Independent seeds per repetition count
    #[arg(long, default_value_t = 16)]
    seeds: usize,

    /// State ansatz parameters (comma-separated, two per layer)
    #[arg(long, default_value = "0.3,0.2,-0.4,0.1")]
    state_params: String,

    /// Trial environment parameters (comma-separated, two per layer)
    #[arg(long, default_value = "0.7,-0.3,0.2,0.5")]
    env_params: String,

    /// Bond dimension
    #[arg(long, default_value_t = 2)]
    bond_dim: usize,

    /// RNG seed
    #[arg(long, default_value = "reps-sweep")]
    seed: String,

    /// Number of Rayon worker threads (0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Output CSV path
    #[arg(long, default_value = "reps_sweep.csv")]
    out: String,
}

fn parse_list<T: std::str::FromStr>(s: &str) -> Result<Vec<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.split(',')
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .map(|x| x.parse::<T>().with_context(|| format!("bad list entry '{}'", x)))
        .collect()
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

    let reps_list: Vec<usize> = parse_list(&args.reps)?;
    if reps_list.is_empty() || reps_list.contains(&0) {
        bail!("--reps must list positive integers");
    }
    let state_params: Vec<f64> = parse_list(&args.state_params)?;
    let env_params: Vec<f64> = parse_list(&args.env_params)?;

    let state_ansatz = ShallowAnsatz::state(args.bond_dim, state_params.len() / 2)?;
    let env_ansatz = ShallowAnsatz::environment(args.bond_dim, env_params.len() / 2)?;
    let u = state_ansatz.tensor(&state_params)?;
    let v = exact_environment(&u)?;

    let exact = EnvironmentOptimizer::new(
        u.clone(),
        v.clone(),
        env_ansatz.clone(),
        EnvironmentObjective::FullTomography,
    )?;
    let exact_cost = exact
        .cost()
        .evaluate(&env_params, &mut ONDRng::new(args.seed.as_bytes()))?
        .cost;
    info!(exact_cost, "exact tomography cost");

    let mut rows = Vec::with_capacity(reps_list.len());
    for &reps in &reps_list {
        let sampled = EnvironmentOptimizer::new(
            u.clone(),
            v.clone(),
            env_ansatz.clone(),
            EnvironmentObjective::SampledTomography { reps },
        )?;
        let deviations: Vec<f64> = (0..args.seeds)
            .into_par_iter()
            .map(|s| -> Result<f64> {
                let mut rng = ONDRng::from_label(&args.seed, "reps", (reps * args.seeds + s) as u64);
                let c = sampled.cost().evaluate(&env_params, &mut rng)?.cost;
                Ok((c - exact_cost).abs())
            })
            .collect::<Result<_>>()?;

        let mean = deviations.iter().sum::<f64>() / deviations.len() as f64;
        info!(reps, mean_deviation = mean, "sampled tomography");
        rows.push((reps as f64, mean));
    }

    write_csv(&args.out, "reps,mean_abs_deviation", &rows)
        .with_context(|| format!("writing {}", args.out))?;
    println!("Sweep written to {}", args.out);
    Ok(())
}
