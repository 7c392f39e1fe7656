//! Quench dynamics: ground state, fixed evolution gate, warm-started
//! re-optimization per step, and the Loschmidt echo of the result.

use crate::error::{Result, SimulatorError};
use crate::evolve::{EvolutionOptimizer, DEFAULT_EVOLUTION_SITES};
use crate::ground_state::GroundStateOptimizer;
use crate::optimizer::Optimizer;
use crate::trajectory::Trajectory;
use quantum::environment::state_mps;
use quantum::{Backend, Hamiltonian, ShallowAnsatz};
use rayon::prelude::*;
use rng::ONDRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Return rate reported for an amplitude that underflows to zero.
pub const MAX_RETURN_RATE: f64 = 300.0;

/// Which optimizer runs keep their convergence trace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RecordSchedule {
    Never,
    /// Every `every`-th step, starting with step 0.
    Every { every: usize },
    Steps { steps: Vec<usize> },
    /// Each step independently with probability `p`, drawn from a
    /// generator forked from the run seed and the step index.
    Probability { p: f64 },
}

impl Default for RecordSchedule {
    fn default() -> Self {
        RecordSchedule::Probability { p: 0.1 }
    }
}

impl RecordSchedule {
    pub fn records(&self, step: usize, seed: &str) -> bool {
        match self {
            RecordSchedule::Never => false,
            RecordSchedule::Every { every } => *every > 0 && step % every == 0,
            RecordSchedule::Steps { steps } => steps.contains(&step),
            RecordSchedule::Probability { p } => {
                let mut rng = ONDRng::from_label(seed, "record", step as u64);
                rng.next_f64(b"RECORD") < *p
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuenchConfig {
    /// ZZ coupling, shared by both Hamiltonians.
    pub zz: f64,
    /// Transverse field before the quench.
    pub g0: f64,
    /// Transverse field after the quench.
    pub g1: f64,
    pub dt: f64,
    pub steps: usize,
    pub bond_dim: usize,
    pub layers: usize,
    /// Defaults to `0.1` for every angle.
    pub initial_params: Option<Vec<f64>>,
    pub optimizer: Optimizer,
    pub backend: Backend,
    pub record: RecordSchedule,
    pub seed: String,
}

impl Default for QuenchConfig {
    fn default() -> Self {
        Self {
            zz: -1.0,
            g0: 1.5,
            g1: 0.2,
            dt: 0.1,
            steps: 10,
            bond_dim: 2,
            layers: 2,
            initial_params: None,
            optimizer: Optimizer::default(),
            backend: Backend::Exact,
            record: RecordSchedule::default(),
            seed: "loschmidt".to_string(),
        }
    }
}

impl QuenchConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn ansatz(&self) -> Result<ShallowAnsatz> {
        Ok(ShallowAnsatz::state(self.bond_dim, self.layers)?)
    }

    pub fn initial_params(&self) -> Vec<f64> {
        self.initial_params
            .clone()
            .unwrap_or_else(|| vec![0.1; 2 * self.layers])
    }

    pub fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() {
            return Err(SimulatorError::Config(format!("dt must be finite, got {}", self.dt)));
        }
        if let RecordSchedule::Probability { p } = self.record {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimulatorError::Config(format!(
                    "record probability {} outside [0, 1]",
                    p
                )));
            }
        }
        self.backend.validate()?;
        self.ansatz()?.check_params(&self.initial_params())?;
        Ok(())
    }
}

/// Ground state at `g0`, then `steps` warm-started evolution steps under
/// `exp(i·H(g1)·dt)` on an open block of [`DEFAULT_EVOLUTION_SITES`] sites.
///
/// Step `i` draws its sampling randomness from a generator forked from the
/// seed and `i`, so a longer run reproduces every step of a shorter one.
pub fn loschmidt_evolve(config: &QuenchConfig) -> Result<Trajectory> {
    config.validate()?;
    let ansatz = config.ansatz()?;
    let mut trajectory = Trajectory::new(ansatz.clone(), config.dt);

    let ground = GroundStateOptimizer::new(Hamiltonian::ising(config.zz, config.g0), ansatz.clone());
    let mut rng = ONDRng::from_label(&config.seed, "ground", 0);
    let record = config.record.records(0, &config.seed);
    let gs = ground.optimize(&config.optimizer, &config.initial_params(), &mut rng, record)?;
    info!(energy = gs.cost, iterations = gs.iterations, "ground state");
    log_trace(0, gs.trace.as_deref());

    let w = Hamiltonian::ising(config.zz, config.g1)
        .evolution_operator(config.dt, DEFAULT_EVOLUTION_SITES);
    let evolution = EvolutionOptimizer::new(w, ansatz, config.backend)?;

    let mut params = gs.params.clone();
    trajectory.push(gs);
    for step in 1..=config.steps {
        let mut rng = ONDRng::from_label(&config.seed, "quench", step as u64);
        let record = config.record.records(step, &config.seed);
        let rec = evolution.step(&config.optimizer, &params, &mut rng, record)?;
        info!(
            step,
            time = step as f64 * config.dt,
            cost = rec.cost,
            iterations = rec.iterations,
            "quench step"
        );
        log_trace(step, rec.trace.as_deref());
        params = rec.params.clone();
        trajectory.push(rec);
    }
    Ok(trajectory)
}

fn log_trace(step: usize, trace: Option<&[f64]>) {
    if let Some(trace) = trace {
        let first = trace.first().copied().unwrap_or(f64::NAN);
        let last = trace.last().copied().unwrap_or(f64::NAN);
        info!(step, iterations = trace.len(), first, last, "convergence trace");
        for (i, c) in trace.iter().enumerate() {
            debug!(step, iteration = i, cost = c);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EchoPoint {
    pub step: usize,
    pub time: f64,
    /// Per-site overlap magnitude with the ground state, clamped to `[0, 1]`.
    pub amplitude: f64,
    /// `-log10(amplitude²)`, capped at [`MAX_RETURN_RATE`].
    pub return_rate: f64,
}

/// `-log10(amplitude²)`, finite even for a vanishing amplitude.
pub fn return_rate(amplitude: f64) -> f64 {
    let rate = -(amplitude * amplitude).log10();
    if rate > MAX_RETURN_RATE {
        MAX_RETURN_RATE
    } else {
        rate.max(0.0)
    }
}

/// Echo amplitude of every record against `records[0]`.
pub fn echo_series(trajectory: &Trajectory, ansatz: &ShallowAnsatz) -> Result<Vec<EchoPoint>> {
    let first = trajectory
        .records
        .first()
        .ok_or(SimulatorError::EmptyTrajectory)?;
    let reference = state_mps(&ansatz.tensor(&first.params)?)?;

    trajectory
        .records
        .par_iter()
        .enumerate()
        .map(|(step, rec)| -> Result<EchoPoint> {
            let mps = state_mps(&ansatz.tensor(&rec.params)?)?;
            let amplitude = reference.overlap(&mps).norm().min(1.0);
            let rate = return_rate(amplitude);
            if rate == MAX_RETURN_RATE {
                warn!(step, amplitude, "echo amplitude vanished, return rate capped");
            }
            Ok(EchoPoint {
                step,
                time: step as f64 * trajectory.dt,
                amplitude,
                return_rate: rate,
            })
        })
        .collect()
}
