//! Shallow alternating-layer ansatz.
//!
//! Each layer applies `X^β` on every qubit and then `ZZ^γ` on every adjacent
//! pair. Parameters are laid out `[β0, γ0, β1, γ1, …]`, so a `p`-layer ansatz
//! has `2p` trainable angles regardless of the register size.

use crate::circuit::{CircuitBuilder, ComposedCircuit};
use crate::error::{QuantumError, Result};
use crate::gates::{x_pow, zz_pow};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use tn::{exact_log2, CMatrix};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnsatzRole {
    /// `log2(D) + 1` qubits: fresh qubit plus bond in, bond plus physical out.
    State,
    /// `2·log2(D)` qubits: bond plus purification.
    Environment,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShallowAnsatz {
    role: AnsatzRole,
    bond_dim: usize,
    layers: usize,
    qubits: usize,
}

/// `log2(bond_dim)`, rejecting anything that is not a power of two ≥ 2.
pub fn bond_qubits(bond_dim: usize) -> Result<usize> {
    match exact_log2(bond_dim) {
        Some(b) if b >= 1 => Ok(b),
        _ => Err(QuantumError::BondDimension(bond_dim)),
    }
}

impl ShallowAnsatz {
    pub fn state(bond_dim: usize, layers: usize) -> Result<Self> {
        let b = bond_qubits(bond_dim)?;
        Ok(Self {
            role: AnsatzRole::State,
            bond_dim,
            layers,
            qubits: b + 1,
        })
    }

    pub fn environment(bond_dim: usize, layers: usize) -> Result<Self> {
        let b = bond_qubits(bond_dim)?;
        Ok(Self {
            role: AnsatzRole::Environment,
            bond_dim,
            layers,
            qubits: 2 * b,
        })
    }

    pub fn role(&self) -> AnsatzRole {
        self.role
    }

    pub fn bond_dim(&self) -> usize {
        self.bond_dim
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    pub fn qubits(&self) -> usize {
        self.qubits
    }

    pub fn param_count(&self) -> usize {
        2 * self.layers
    }

    pub fn symbol(&self) -> &'static str {
        match self.role {
            AnsatzRole::State => "U",
            AnsatzRole::Environment => "V",
        }
    }

    /// Fails unless this ansatz can play `role` next to a state tensor on
    /// `state_qubits` qubits.
    pub fn check_fits(&self, role: AnsatzRole, state_qubits: usize) -> Result<()> {
        let expected = match role {
            AnsatzRole::State => state_qubits,
            AnsatzRole::Environment => 2 * state_qubits.saturating_sub(1),
        };
        if self.role != role || state_qubits < 2 || self.qubits != expected {
            return Err(QuantumError::Shape(format!(
                "{:?} ansatz on {} qubits cannot act as the {:?} tensor of a {}-qubit state",
                self.role, self.qubits, role, state_qubits
            )));
        }
        Ok(())
    }

    pub fn check_params(&self, params: &[f64]) -> Result<()> {
        if params.len() != self.param_count() {
            return Err(QuantumError::ParameterCount {
                expected: self.param_count(),
                got: params.len(),
            });
        }
        Ok(())
    }

    /// Gate-level decomposition on a register of exactly `qubits()` qubits.
    pub fn circuit(&self, params: &[f64]) -> Result<ComposedCircuit> {
        self.check_params(params)?;
        Ok(self.layer_circuit(params))
    }

    fn layer_circuit(&self, params: &[f64]) -> ComposedCircuit {
        let mut builder = CircuitBuilder::new(self.qubits);
        for layer in params.chunks_exact(2) {
            let (beta, gamma) = (layer[0], layer[1]);
            for q in 0..self.qubits {
                builder.push(x_pow(beta), vec![q], "X^β");
            }
            for q in 0..self.qubits.saturating_sub(1) {
                builder.push(zz_pow(gamma), vec![q, q + 1], "ZZ^γ");
            }
        }
        builder.build()
    }

    pub fn unitary_at(&self, params: &[f64]) -> Result<CMatrix> {
        self.check_params(params)?;
        Ok(self.build_unitary(params))
    }

    pub(crate) fn build_unitary(&self, params: &[f64]) -> CMatrix {
        self.layer_circuit(params).unitary()
    }

    pub fn tensor(&self, params: &[f64]) -> Result<Tensor> {
        self.check_params(params)?;
        Ok(Tensor::Shallow {
            ansatz: self.clone(),
            params: params.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::{x_pow, zz_pow};

    #[test]
    fn qubit_counts_follow_bond_dimension() {
        assert_eq!(ShallowAnsatz::state(2, 1).unwrap().qubits(), 2);
        assert_eq!(ShallowAnsatz::state(4, 1).unwrap().qubits(), 3);
        assert_eq!(ShallowAnsatz::environment(2, 1).unwrap().qubits(), 2);
        assert_eq!(ShallowAnsatz::environment(4, 1).unwrap().qubits(), 4);
        assert!(matches!(
            ShallowAnsatz::state(3, 1),
            Err(QuantumError::BondDimension(3))
        ));
        assert!(ShallowAnsatz::state(1, 1).is_err());
    }

    #[test]
    fn parameter_count_is_checked() {
        let a = ShallowAnsatz::state(2, 2).unwrap();
        assert_eq!(a.param_count(), 4);
        assert!(matches!(
            a.unitary_at(&[0.1, 0.2, 0.3]),
            Err(QuantumError::ParameterCount { expected: 4, got: 3 })
        ));
    }

    #[test]
    fn roles_must_fit_the_state_tensor() {
        let env2 = ShallowAnsatz::environment(2, 1).unwrap();
        let env4 = ShallowAnsatz::environment(4, 1).unwrap();
        let state2 = ShallowAnsatz::state(2, 1).unwrap();
        assert!(env2.check_fits(AnsatzRole::Environment, 2).is_ok());
        assert!(env4.check_fits(AnsatzRole::Environment, 3).is_ok());
        assert!(state2.check_fits(AnsatzRole::State, 2).is_ok());
        assert!(matches!(
            env4.check_fits(AnsatzRole::Environment, 2),
            Err(QuantumError::Shape(_))
        ));
        assert!(matches!(
            state2.check_fits(AnsatzRole::Environment, 2),
            Err(QuantumError::Shape(_))
        ));
        assert!(env2.check_fits(AnsatzRole::Environment, 1).is_err());
    }

    #[test]
    fn one_layer_matches_hand_built_product() {
        let a = ShallowAnsatz::environment(2, 1).unwrap();
        let (beta, gamma) = (0.37, -0.81);
        let u = a.unitary_at(&[beta, gamma]).unwrap();
        let expected = zz_pow(gamma).matmul(&x_pow(beta).kron(&x_pow(beta)));
        assert!(u.approx_eq(&expected, 1e-12));
        assert!(u.is_unitary(1e-12));
    }

    #[test]
    fn zero_layers_is_identity() {
        let a = ShallowAnsatz::state(4, 0).unwrap();
        assert!(a.unitary_at(&[]).unwrap().approx_eq(&CMatrix::identity(8), 1e-14));
    }
}
