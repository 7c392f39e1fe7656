use crate::compose::{physical_range, state_circuit};
use crate::environment::exact_environment;
use crate::error::{QuantumError, Result};
use crate::hamiltonian::Hamiltonian;
use crate::statevector::StateVector;
use crate::tensor::Tensor;

/// Energy per bond `Tr(ρ H_block)/(sites - 1)` of `State(u, v, sites)`.
pub fn energy_density(u: &Tensor, v: &Tensor, h: &Hamiltonian, sites: usize) -> Result<f64> {
    if sites < 2 {
        return Err(QuantumError::Shape(format!(
            "energy density needs a block of at least 2 sites, got {}",
            sites
        )));
    }
    let circuit = state_circuit(u, v, sites)?;
    let b = u.qubit_count() - 1;
    let physical: Vec<usize> = physical_range(b, sites).collect();
    let rho = StateVector::from_circuit(&circuit).reduced_density_matrix(&physical);
    let e = rho.matmul(&h.block(sites)).trace().re;
    Ok(e / (sites - 1) as f64)
}

/// Energy density with the environment solved exactly for `u`.
pub fn exact_energy_density(u: &Tensor, h: &Hamiltonian, sites: usize) -> Result<f64> {
    let v = exact_environment(u)?;
    energy_density(u, &v, h, sites)
}
