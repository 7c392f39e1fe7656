//! Layouts that turn state and environment tensors into circuits.
//!
//! With `b = log2(D)` bond qubits, a state circuit over `n` sites has width
//! `n + 2b`: bond qubits `[0, b)`, physical qubits `[b, b + n)` and the
//! environment's purification qubits after them.

use crate::circuit::{CircuitBuilder, ComposedCircuit};
use crate::error::{QuantumError, Result};
use crate::gates::{cnot, hadamard};
use crate::tensor::Tensor;
use std::ops::Range;

fn bond_width(u: &Tensor) -> Result<usize> {
    match u.qubit_count() {
        0 | 1 => Err(QuantumError::Shape(format!(
            "state tensor '{}' acts on {} qubit(s), needs at least 2",
            u.symbol(),
            u.qubit_count()
        ))),
        k => Ok(k - 1),
    }
}

/// Width of `State(U, V, n)` for a state tensor with `b` bond qubits.
pub fn state_width(bond_qubits: usize, sites: usize) -> usize {
    sites + 2 * bond_qubits
}

pub fn bond_range(bond_qubits: usize) -> Range<usize> {
    0..bond_qubits
}

pub fn physical_range(bond_qubits: usize, sites: usize) -> Range<usize> {
    bond_qubits..bond_qubits + sites
}

/// `sites` copies of `u` capped on the right by `v`.
pub fn state_circuit(u: &Tensor, v: &Tensor, sites: usize) -> Result<ComposedCircuit> {
    let b = bond_width(u)?;
    if v.qubit_count() != 2 * b {
        return Err(QuantumError::Shape(format!(
            "environment '{}' has {} qubits, state '{}' needs {}",
            v.symbol(),
            v.qubit_count(),
            u.symbol(),
            2 * b
        )));
    }
    if sites == 0 {
        return Err(QuantumError::Shape("state circuit needs at least one site".into()));
    }
    let mut builder = CircuitBuilder::new(state_width(b, sites));
    builder.place_tensor(v, sites)?;
    for i in (0..sites).rev() {
        builder.place_tensor(u, i)?;
    }
    Ok(builder.build())
}

/// `v` alone on the first `2b` qubits of a `width`-qubit register.
pub fn environment_circuit(v: &Tensor, width: usize) -> Result<ComposedCircuit> {
    if v.qubit_count() > width {
        return Err(QuantumError::Shape(format!(
            "environment '{}' has {} qubits, register only {}",
            v.symbol(),
            v.qubit_count(),
            width
        )));
    }
    let mut builder = CircuitBuilder::new(width);
    builder.place_tensor(v, 0)?;
    Ok(builder.build())
}

/// Repeated state tensor along the chain, without an environment.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerCircuit {
    state: Tensor,
    power: usize,
}

impl PowerCircuit {
    pub fn new(state: Tensor, power: usize) -> Self {
        Self { state, power }
    }

    pub fn state(&self) -> &Tensor {
        &self.state
    }

    pub fn power(&self) -> usize {
        self.power
    }

    pub fn with_power(&self, power: usize) -> Self {
        Self {
            state: self.state.clone(),
            power,
        }
    }

    pub fn num_qubits(&self) -> usize {
        match self.power {
            0 => 0,
            k => self.state.qubit_count() + k - 1,
        }
    }

    pub fn circuit(&self) -> Result<ComposedCircuit> {
        if self.power == 0 {
            return Err(QuantumError::Shape("power circuit needs at least one copy".into()));
        }
        let mut builder = CircuitBuilder::new(self.num_qubits());
        for i in (0..self.power).rev() {
            builder.place_tensor(&self.state, i)?;
        }
        Ok(builder.build())
    }
}

/// Destructive swap test: `a` on `[0, w)`, `b` on `[w, 2w)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SwapTest {
    circuit: ComposedCircuit,
    pairs: Vec<(usize, usize)>,
}

impl SwapTest {
    pub fn circuit(&self) -> &ComposedCircuit {
        &self.circuit
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Measured qubits, pair by pair: `[a0, b0, a1, b1, …]`.
    pub fn measured_qubits(&self) -> Vec<usize> {
        self.pairs.iter().flat_map(|&(a, b)| [a, b]).collect()
    }

    /// `Tr ρσ` from a distribution over `measured_qubits()`: each pair seen
    /// as `11` flips the sign of the outcome.
    pub fn overlap(&self, probabilities: &[f64]) -> f64 {
        let k = self.pairs.len();
        probabilities
            .iter()
            .enumerate()
            .map(|(outcome, p)| {
                let flips = (0..k)
                    .filter(|i| (outcome >> (2 * (k - 1 - i))) & 0b11 == 0b11)
                    .count();
                if flips % 2 == 0 {
                    *p
                } else {
                    -*p
                }
            })
            .sum()
    }
}

/// Pair qubit `q` of `a` with qubit `q` of `b` for every `q` in `probes`.
pub fn swap_test(a: &ComposedCircuit, b: &ComposedCircuit, probes: &[usize]) -> Result<SwapTest> {
    let w = a.width();
    if b.width() != w {
        return Err(QuantumError::Shape(format!(
            "swap test operands have widths {} and {}",
            w,
            b.width()
        )));
    }
    if probes.is_empty() {
        return Err(QuantumError::Shape("swap test needs at least one probe".into()));
    }
    let mut builder = CircuitBuilder::new(2 * w);
    builder.append(a, 0)?.append(b, w)?;
    let mut pairs = Vec::with_capacity(probes.len());
    for &q in probes {
        builder.place(cnot(), &[q, q + w], "CX")?;
        builder.place(hadamard(), &[q], "H")?;
        pairs.push((q, q + w));
    }
    Ok(SwapTest {
        circuit: builder.build(),
        pairs,
    })
}
