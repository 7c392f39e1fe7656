//! Nelder–Mead over ansatz angles via `argmin`.

use crate::error::{Result, SimulatorError};
use crate::objective::{Diagnostics, Objective};
use argmin::core::observers::{Observe, ObserverMode};
use argmin::core::{CostFunction, Error, Executor, State, KV};
use argmin::solver::neldermead::NelderMead;
use rng::ONDRng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Optimizer {
    pub max_iters: u64,
    /// Stop once the standard deviation of the simplex costs drops below
    /// this.
    pub sd_tolerance: f64,
    /// Initial simplex is `x0` plus `simplex_step` along each axis.
    pub simplex_step: f64,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self {
            max_iters: 1000,
            sd_tolerance: 1e-12,
            simplex_step: 0.25,
        }
    }
}

/// What one minimizer run hands back.
#[derive(Clone, Debug, PartialEq)]
pub struct Minimum {
    pub params: Vec<f64>,
    pub cost: f64,
    pub iterations: u64,
    /// Best cost after each iteration, so never increasing. Empty unless
    /// recording was requested.
    pub trace: Vec<f64>,
    pub diagnostics: Diagnostics,
}

/// Bridges an [`Objective`] to argmin, which only hands out `&self`.
struct CostAdapter<'a, O> {
    objective: &'a O,
    rng: Mutex<&'a mut ONDRng>,
}

impl<O: Objective> CostFunction for CostAdapter<'_, O> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> std::result::Result<Self::Output, Error> {
        let mut guard = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.objective.evaluate(params, &mut **guard)?.cost)
    }
}

/// Appends the best cost seen so far once per iteration.
struct BestCostTrace(Arc<Mutex<Vec<f64>>>);

impl<I: State<Float = f64>> Observe<I> for BestCostTrace {
    fn observe_iter(&mut self, state: &I, _kv: &KV) -> std::result::Result<(), Error> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(state.get_best_cost());
        Ok(())
    }
}

impl Optimizer {
    pub fn simplex(&self, x0: &[f64]) -> Vec<Vec<f64>> {
        let mut simplex = Vec::with_capacity(x0.len() + 1);
        simplex.push(x0.to_vec());
        for i in 0..x0.len() {
            let mut x = x0.to_vec();
            x[i] += self.simplex_step;
            simplex.push(x);
        }
        simplex
    }

    /// Minimize `objective` from `initial`. A run that hits `max_iters`
    /// still returns its best point.
    pub fn minimize<O: Objective>(
        &self,
        objective: &O,
        initial: &[f64],
        rng: &mut ONDRng,
        record: bool,
    ) -> Result<Minimum> {
        if initial.is_empty() {
            return Err(SimulatorError::Config(
                "cannot optimize an empty parameter vector".into(),
            ));
        }

        let solver = NelderMead::new(self.simplex(initial))
            .with_sd_tolerance(self.sd_tolerance)
            .map_err(|e| SimulatorError::Minimizer(e.to_string()))?;

        let trace = Arc::new(Mutex::new(Vec::new()));
        let (params, cost, iterations) = {
            let problem = CostAdapter {
                objective,
                rng: Mutex::new(&mut *rng),
            };
            let max_iters = self.max_iters;
            let mut executor =
                Executor::new(problem, solver).configure(|state| state.max_iters(max_iters));
            if record {
                executor = executor
                    .add_observer(BestCostTrace(Arc::clone(&trace)), ObserverMode::Always);
            }
            let result = executor
                .run()
                .map_err(|e| SimulatorError::Minimizer(e.to_string()))?;

            let state = &result.state;
            let params = state
                .get_best_param()
                .cloned()
                .unwrap_or_else(|| initial.to_vec());
            let cost = state.get_best_cost();
            (params, cost, state.get_iter())
        };
        let trace = std::mem::take(&mut *trace.lock().unwrap_or_else(|e| e.into_inner()));

        let diagnostics = objective.evaluate(&params, rng)?.diagnostics;
        debug!(iterations, cost, traced = trace.len(), "nelder-mead finished");

        Ok(Minimum {
            params,
            cost,
            iterations,
            trace,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::ObjectiveResult;

    struct Bowl;

    impl Objective for Bowl {
        fn evaluate(&self, params: &[f64], _rng: &mut ONDRng) -> Result<ObjectiveResult> {
            let c = (params[0] - 1.0).powi(2) + 2.0 * (params[1] + 0.5).powi(2);
            Ok(ObjectiveResult::bare(c))
        }
    }

    #[test]
    fn finds_the_bottom_of_a_bowl() {
        let opt = Optimizer::default();
        let mut rng = ONDRng::new(b"bowl");
        let m = opt.minimize(&Bowl, &[0.0, 0.0], &mut rng, true).unwrap();
        assert!((m.params[0] - 1.0).abs() < 1e-4, "{:?}", m.params);
        assert!((m.params[1] + 0.5).abs() < 1e-4, "{:?}", m.params);
        assert!(m.cost < 1e-8, "cost = {}", m.cost);
        assert!(!m.trace.is_empty());
        assert!(m.trace.len() as u64 <= m.iterations + 1, "{} entries", m.trace.len());
        assert!(m.trace.iter().all(|c| *c >= m.cost));
        assert!(
            m.trace.windows(2).all(|w| w[1] <= w[0]),
            "best cost went up: {:?}",
            m.trace
        );
    }

    #[test]
    fn iteration_budget_is_respected() {
        let opt = Optimizer {
            max_iters: 3,
            ..Optimizer::default()
        };
        let m = opt
            .minimize(&Bowl, &[0.0, 0.0], &mut ONDRng::new(b"short"), false)
            .unwrap();
        assert!(m.iterations <= 3, "iterations = {}", m.iterations);
        assert!(m.trace.is_empty());
        assert!(m.cost.is_finite());
    }

    #[test]
    fn simplex_steps_along_each_axis() {
        let opt = Optimizer::default();
        let s = opt.simplex(&[1.0, 2.0]);
        assert_eq!(s, vec![vec![1.0, 2.0], vec![1.25, 2.0], vec![1.0, 2.25]]);
    }
}
