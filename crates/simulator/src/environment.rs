use crate::error::Result;
use crate::objective::{EnvironmentCost, EnvironmentObjective};
use crate::optimizer::Optimizer;
use crate::record::{OptimizationRecord, Operands};
use quantum::{AnsatzRole, QuantumError, ShallowAnsatz, Tensor};
use rng::ONDRng;
use tracing::debug;

/// Fits an environment ansatz to the fixed point of a given state tensor.
#[derive(Clone, Debug)]
pub struct EnvironmentOptimizer {
    cost: EnvironmentCost,
}

impl EnvironmentOptimizer {
    /// `v` is the reference environment the trial is compared against.
    /// Both it and `ansatz` must span the `2·(qubits(u) - 1)` environment
    /// qubits of `u`.
    pub fn new(
        u: Tensor,
        v: Tensor,
        ansatz: ShallowAnsatz,
        objective: EnvironmentObjective,
    ) -> Result<Self> {
        ansatz.check_fits(AnsatzRole::Environment, u.qubit_count())?;
        if v.qubit_count() != ansatz.qubits() {
            return Err(QuantumError::Shape(format!(
                "reference environment '{}' has {} qubits, ansatz has {}",
                v.symbol(),
                v.qubit_count(),
                ansatz.qubits()
            ))
            .into());
        }
        let cost = EnvironmentCost {
            u,
            reference: v,
            ansatz,
            objective,
        };
        if let EnvironmentObjective::SwapTest { backend, .. } = &cost.objective {
            backend.validate()?;
        }
        if let EnvironmentObjective::SampledTomography { reps: 0 } = cost.objective {
            return Err(QuantumError::ZeroReps.into());
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> &EnvironmentCost {
        &self.cost
    }

    pub fn optimize(
        &self,
        optimizer: &Optimizer,
        initial: &[f64],
        rng: &mut ONDRng,
        record: bool,
    ) -> Result<OptimizationRecord> {
        self.cost.ansatz.check_params(initial)?;
        debug!(objective = ?self.cost.objective, "optimizing environment");
        let minimum = optimizer.minimize(&self.cost, initial, rng, record)?;
        let operands = Operands {
            state: self.cost.u.unitary(),
            target: Some(self.cost.reference.unitary()),
        };
        Ok(OptimizationRecord::new(operands, minimum, record))
    }
}
