//! Exact environment tensors for a given state tensor.

use crate::ansatz::bond_qubits;
use crate::error::{QuantumError, Result};
use crate::tensor::Tensor;
use tn::linalg::unitary_with_first_column;
use tn::mps::UniformMps;

/// The uniform MPS encoded by a state tensor on `b + 1` qubits.
pub fn state_mps(u: &Tensor) -> Result<UniformMps> {
    let k = u.qubit_count();
    if k < 2 {
        return Err(QuantumError::Shape(format!(
            "state tensor '{}' acts on {} qubit(s), needs at least 2",
            u.symbol(),
            k
        )));
    }
    let bond_dim = 1usize << (k - 1);
    bond_qubits(bond_dim)?;
    Ok(UniformMps::from_state_unitary(&u.unitary(), bond_dim))
}

/// Environment unitary `V` with `V|0…0> = vec(sqrt r)`, `r` the right fixed
/// point of the transfer channel of `u`.
pub fn exact_environment(u: &Tensor) -> Result<Tensor> {
    let mps = state_mps(u)?;
    let column = mps.environment_state();
    Tensor::fixed(unitary_with_first_column(&column), "V")
}
