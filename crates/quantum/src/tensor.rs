//! State and environment tensors as placeable unitary gates.

use crate::ansatz::ShallowAnsatz;
use crate::compose::PowerCircuit;
use crate::error::{QuantumError, Result};
use tn::{exact_log2, CMatrix};

/// A fixed unitary on `log2(dim)` qubits with a display symbol.
///
/// Unitarity is the caller's contract and is not re-checked here; only the
/// shape is validated.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitaryTensor {
    matrix: CMatrix,
    qubits: usize,
    symbol: String,
}

impl UnitaryTensor {
    pub fn new(matrix: CMatrix, symbol: impl Into<String>) -> Result<Self> {
        let qubits = match exact_log2(matrix.rows) {
            Some(q) if matrix.is_square() && q > 0 => q,
            _ => {
                return Err(QuantumError::NotAGate {
                    rows: matrix.rows,
                    cols: matrix.cols,
                })
            }
        };
        Ok(Self {
            matrix,
            qubits,
            symbol: symbol.into(),
        })
    }

    pub fn matrix(&self) -> &CMatrix {
        &self.matrix
    }

    pub fn qubits(&self) -> usize {
        self.qubits
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Conjugate transpose. Exact, because inputs are unitary by contract.
    pub fn inverse(&self) -> Self {
        Self {
            matrix: self.matrix.dagger(),
            qubits: self.qubits,
            symbol: format!("{}†", self.symbol),
        }
    }

    /// `k > 0`: k-fold product. `k < 0`: the inverse raised to `|k|`.
    pub fn power(&self, k: i32) -> Result<Self> {
        match k {
            0 => Err(QuantumError::InvalidPower(0)),
            1 => Ok(self.clone()),
            -1 => Ok(self.inverse()),
            k if k > 0 => Ok(Self {
                matrix: self.matrix.pow(k as u32),
                qubits: self.qubits,
                symbol: format!("{}^{}", self.symbol, k),
            }),
            k => self.inverse().power(-k),
        }
    }
}

/// Closed set of tensors the composer knows how to place.
#[derive(Clone, Debug, PartialEq)]
pub enum Tensor {
    Fixed(UnitaryTensor),
    /// An ansatz evaluated at a parameter vector already checked against it.
    Shallow {
        ansatz: ShallowAnsatz,
        params: Vec<f64>,
    },
}

impl Tensor {
    pub fn fixed(matrix: CMatrix, symbol: impl Into<String>) -> Result<Self> {
        Ok(Self::Fixed(UnitaryTensor::new(matrix, symbol)?))
    }

    pub fn qubit_count(&self) -> usize {
        match self {
            Tensor::Fixed(t) => t.qubits(),
            Tensor::Shallow { ansatz, .. } => ansatz.qubits(),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Tensor::Fixed(t) => t.symbol(),
            Tensor::Shallow { ansatz, .. } => ansatz.symbol(),
        }
    }

    pub fn unitary(&self) -> CMatrix {
        match self {
            Tensor::Fixed(t) => t.matrix().clone(),
            Tensor::Shallow { ansatz, params } => ansatz.build_unitary(params),
        }
    }

    /// Freeze into a fixed unitary, evaluating an ansatz if needed.
    pub fn materialize(&self) -> UnitaryTensor {
        match self {
            Tensor::Fixed(t) => t.clone(),
            Tensor::Shallow { .. } => UnitaryTensor {
                matrix: self.unitary(),
                qubits: self.qubit_count(),
                symbol: self.symbol().to_string(),
            },
        }
    }

    pub fn power(&self, k: i32) -> Result<Tensor> {
        Ok(Tensor::Fixed(self.materialize().power(k)?))
    }

    pub fn inverse(&self) -> Tensor {
        Tensor::Fixed(self.materialize().inverse())
    }

    /// `power` copies of this state tensor laid along the chain.
    pub fn raise_power(&self, power: usize) -> PowerCircuit {
        PowerCircuit::new(self.clone(), power)
    }
}
