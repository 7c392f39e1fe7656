use crate::error::Result;
use crate::objective::EnergyCost;
use crate::optimizer::Optimizer;
use crate::record::{OptimizationRecord, Operands};
use quantum::{Hamiltonian, ShallowAnsatz};
use rng::ONDRng;
use tracing::debug;

/// Block size used for the energy density.
pub const DEFAULT_SITES: usize = 3;

/// Variational ground state: minimizes the energy density of the state
/// ansatz with its environment solved exactly at every step.
#[derive(Clone, Debug)]
pub struct GroundStateOptimizer {
    cost: EnergyCost,
}

impl GroundStateOptimizer {
    pub fn new(hamiltonian: Hamiltonian, ansatz: ShallowAnsatz) -> Self {
        Self::with_sites(hamiltonian, ansatz, DEFAULT_SITES)
    }

    pub fn with_sites(hamiltonian: Hamiltonian, ansatz: ShallowAnsatz, sites: usize) -> Self {
        Self {
            cost: EnergyCost {
                hamiltonian,
                ansatz,
                sites,
            },
        }
    }

    pub fn optimize(
        &self,
        optimizer: &Optimizer,
        initial: &[f64],
        rng: &mut ONDRng,
        record: bool,
    ) -> Result<OptimizationRecord> {
        self.cost.ansatz.check_params(initial)?;
        debug!(terms = ?self.cost.hamiltonian.terms(), "optimizing ground state");
        let minimum = optimizer.minimize(&self.cost, initial, rng, record)?;
        let state = self.cost.ansatz.unitary_at(&minimum.params)?;
        let operands = Operands {
            state,
            target: Some(self.cost.hamiltonian.to_matrix()),
        };
        Ok(OptimizationRecord::new(operands, minimum, record))
    }
}
