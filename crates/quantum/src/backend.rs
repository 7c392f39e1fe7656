//! Exact and sampled evaluation behind one call.

use crate::circuit::ComposedCircuit;
use crate::error::{QuantumError, Result};
use crate::gates::{hadamard, s_dagger};
use crate::measurement::{frequencies, sample_counts};
use crate::statevector::StateVector;
use rng::ONDRng;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Exact,
    Sampled { reps: usize },
}

/// Outcome distribution over `qubits`, `qubits[0]` as the most significant
/// bit. `counts` is only present for sampled runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub qubits: Vec<usize>,
    pub probabilities: Vec<f64>,
    pub counts: Option<Vec<usize>>,
}

impl Measurement {
    pub fn probability(&self, outcome: usize) -> f64 {
        self.probabilities.get(outcome).copied().unwrap_or(0.0)
    }

    /// `<Z>` of the `i`-th measured qubit.
    pub fn z_expectation(&self, i: usize) -> f64 {
        let shift = self.qubits.len() - 1 - i;
        self.probabilities
            .iter()
            .enumerate()
            .map(|(k, p)| if (k >> shift) & 1 == 0 { *p } else { -*p })
            .sum()
    }
}

impl Backend {
    pub fn validate(&self) -> Result<()> {
        match self {
            Backend::Sampled { reps: 0 } => Err(QuantumError::ZeroReps),
            _ => Ok(()),
        }
    }

    /// Run `circuit` from `|0…0>` and measure `qubits` in the Z basis.
    /// Exact mode never touches `rng`.
    pub fn run(
        &self,
        circuit: &ComposedCircuit,
        qubits: &[usize],
        rng: &mut ONDRng,
    ) -> Result<Measurement> {
        self.validate()?;
        for &q in qubits {
            if q >= circuit.width() {
                return Err(QuantumError::QubitOutOfRange {
                    qubit: q,
                    width: circuit.width(),
                });
            }
        }
        let exact = StateVector::from_circuit(circuit).probabilities(qubits);
        match *self {
            Backend::Exact => Ok(Measurement {
                qubits: qubits.to_vec(),
                probabilities: exact,
                counts: None,
            }),
            Backend::Sampled { reps } => {
                let counts = sample_counts(&exact, reps, rng);
                trace!(reps, outcomes = counts.len(), "sampled circuit");
                Ok(Measurement {
                    qubits: qubits.to_vec(),
                    probabilities: frequencies(&counts),
                    counts: Some(counts),
                })
            }
        }
    }

    /// Bloch vector `(<X>, <Y>, <Z>)` of one qubit from three basis-rotated
    /// runs.
    pub fn bloch_vector(
        &self,
        circuit: &ComposedCircuit,
        qubit: usize,
        rng: &mut ONDRng,
    ) -> Result<[f64; 3]> {
        let z = self.run(circuit, &[qubit], rng)?.z_expectation(0);

        let mut bx = circuit.to_builder();
        bx.place(hadamard(), &[qubit], "H")?;
        let x = self.run(&bx.build(), &[qubit], rng)?.z_expectation(0);

        let mut by = circuit.to_builder();
        by.place(s_dagger(), &[qubit], "S†")?
            .place(hadamard(), &[qubit], "H")?;
        let y = self.run(&by.build(), &[qubit], rng)?.z_expectation(0);

        Ok([x, y, z])
    }
}
