use crate::error::Result;
use crate::objective::{evolution_sites, param_u, EvolutionCost};
use crate::optimizer::Optimizer;
use crate::record::{OptimizationRecord, Operands};
use quantum::{AnsatzRole, Backend, ShallowAnsatz};
use rng::ONDRng;
use tn::CMatrix;
use tracing::debug;

/// Width of the open block the evolution gate acts on.
pub const DEFAULT_EVOLUTION_SITES: usize = 4;

/// One time step: re-fit the state ansatz to `W` applied to the state at
/// the previous parameters.
#[derive(Clone, Debug)]
pub struct EvolutionOptimizer {
    w: CMatrix,
    sites: usize,
    ansatz: ShallowAnsatz,
    backend: Backend,
}

impl EvolutionOptimizer {
    /// `w` acts on a block of at least three sites.
    pub fn new(w: CMatrix, ansatz: ShallowAnsatz, backend: Backend) -> Result<Self> {
        let sites = evolution_sites(&w)?;
        ansatz.check_fits(AnsatzRole::State, ansatz.qubits())?;
        backend.validate()?;
        Ok(Self {
            w,
            sites,
            ansatz,
            backend,
        })
    }

    pub fn ansatz(&self) -> &ShallowAnsatz {
        &self.ansatz
    }

    pub fn sites(&self) -> usize {
        self.sites
    }

    /// Warm-started from `previous`, which is also what defines the target.
    pub fn step(
        &self,
        optimizer: &Optimizer,
        previous: &[f64],
        rng: &mut ONDRng,
        record: bool,
    ) -> Result<OptimizationRecord> {
        let (u, v) = param_u(&self.ansatz, previous)?;
        let target = EvolutionCost::evolved_target(&u, &v, &self.w)?;
        let cost = EvolutionCost {
            ansatz: self.ansatz.clone(),
            target,
            sites: self.sites,
            backend: self.backend,
        };
        debug!(backend = ?self.backend, sites = self.sites, "optimizing evolution step");
        let minimum = optimizer.minimize(&cost, previous, rng, record)?;
        let operands = Operands {
            state: u.unitary(),
            target: Some(self.w.clone()),
        };
        Ok(OptimizationRecord::new(operands, minimum, record))
    }
}
