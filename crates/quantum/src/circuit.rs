//! Immutable gate lists over a fixed-width register.

use crate::error::{QuantumError, Result};
use crate::statevector::StateVector;
use crate::tensor::Tensor;
use std::fmt;
use tn::{exact_log2, CMatrix};

/// One gate acting on an ordered list of qubits. `qubits[0]` is the most
/// significant index of `matrix`.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub matrix: CMatrix,
    pub qubits: Vec<usize>,
    pub symbol: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComposedCircuit {
    width: usize,
    placements: Vec<Placement>,
}

#[derive(Clone, Debug)]
pub struct CircuitBuilder {
    width: usize,
    placements: Vec<Placement>,
}

impl CircuitBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            placements: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Checked placement of an arbitrary gate.
    pub fn place(
        &mut self,
        matrix: CMatrix,
        qubits: &[usize],
        symbol: impl Into<String>,
    ) -> Result<&mut Self> {
        let arity = match exact_log2(matrix.rows) {
            Some(k) if matrix.is_square() && k > 0 => k,
            _ => {
                return Err(QuantumError::NotAGate {
                    rows: matrix.rows,
                    cols: matrix.cols,
                })
            }
        };
        if arity != qubits.len() {
            return Err(QuantumError::Shape(format!(
                "{}-qubit gate placed on {} qubits",
                arity,
                qubits.len()
            )));
        }
        for (i, &q) in qubits.iter().enumerate() {
            if q >= self.width {
                return Err(QuantumError::QubitOutOfRange {
                    qubit: q,
                    width: self.width,
                });
            }
            if qubits[..i].contains(&q) {
                return Err(QuantumError::DuplicateQubit(q));
            }
        }
        self.push(matrix, qubits.to_vec(), symbol);
        Ok(self)
    }

    /// Place a tensor on the contiguous block `offset..offset + qubit_count`.
    pub fn place_tensor(&mut self, tensor: &Tensor, offset: usize) -> Result<&mut Self> {
        let qubits: Vec<usize> = (offset..offset + tensor.qubit_count()).collect();
        self.place(tensor.unitary(), &qubits, tensor.symbol())
    }

    /// Splice another circuit in, shifting its qubits by `offset`.
    pub fn append(&mut self, other: &ComposedCircuit, offset: usize) -> Result<&mut Self> {
        if offset + other.width > self.width {
            return Err(QuantumError::Shape(format!(
                "{}-qubit circuit at offset {} overflows width {}",
                other.width, offset, self.width
            )));
        }
        for p in &other.placements {
            let qubits = p.qubits.iter().map(|q| q + offset).collect();
            self.push(p.matrix.clone(), qubits, p.symbol.clone());
        }
        Ok(self)
    }

    pub(crate) fn push(&mut self, matrix: CMatrix, qubits: Vec<usize>, symbol: impl Into<String>) {
        self.placements.push(Placement {
            matrix,
            qubits,
            symbol: symbol.into(),
        });
    }

    pub fn build(self) -> ComposedCircuit {
        ComposedCircuit {
            width: self.width,
            placements: self.placements,
        }
    }
}

impl ComposedCircuit {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Reopen for extension; the original stays untouched.
    pub fn to_builder(&self) -> CircuitBuilder {
        CircuitBuilder {
            width: self.width,
            placements: self.placements.clone(),
        }
    }

    /// Dense unitary, built column by column from basis states.
    pub fn unitary(&self) -> CMatrix {
        let dim = 1usize << self.width;
        let mut u = CMatrix::zeros(dim, dim);
        for col in 0..dim {
            let mut psi = StateVector::basis(self.width, col);
            psi.run(self);
            for (row, amp) in psi.amplitudes().iter().enumerate() {
                u.set(row, col, *amp);
            }
        }
        u
    }
}

impl fmt::Display for ComposedCircuit {
    /// One row per qubit, one column per placement; multi-qubit gates show
    /// their symbol on every qubit they touch.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .placements
            .iter()
            .map(|p| {
                (0..self.width)
                    .map(|q| {
                        if p.qubits.contains(&q) {
                            format!("[{}]", p.symbol)
                        } else {
                            String::new()
                        }
                    })
                    .collect()
            })
            .collect();
        let widths: Vec<usize> = cells
            .iter()
            .map(|col| col.iter().map(|c| c.chars().count()).max().unwrap_or(0))
            .collect();

        for q in 0..self.width {
            write!(f, "q{:<3}", q)?;
            for (col, w) in cells.iter().zip(&widths) {
                let cell = &col[q];
                let pad = w - cell.chars().count();
                if cell.is_empty() {
                    write!(f, "─{}─", "─".repeat(*w))?;
                } else {
                    write!(f, "─{}{}─", cell, "─".repeat(pad))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
